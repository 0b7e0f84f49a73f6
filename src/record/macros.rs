/// Declares a struct and derives [`Record`](crate::Record) for it.
///
/// Fields declared without a visibility qualifier are private: the diff
/// engine skips them and the patch engine refuses to set them. The struct
/// must implement `Default`, which provides [`Record::blank`](crate::Record::blank).
///
/// ```
/// record_diff::record! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct Person {
///         pub name: String,
///         pub age: i64,
///         secret: String,
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Record for $name {
            fn shape(&self) -> &$crate::Shape {
                static SHAPE: ::std::sync::OnceLock<$crate::Shape> = ::std::sync::OnceLock::new();
                SHAPE.get_or_init(|| {
                    $crate::Shape::new(
                        stringify!($name),
                        vec![$(
                            $crate::FieldDef::new(
                                stringify!($field),
                                <$ty as $crate::FieldValue>::field_type(),
                                !stringify!($field_vis).is_empty(),
                            ),
                        )*],
                    )
                })
            }

            fn field(&self, name: &str) -> ::std::option::Option<$crate::Value> {
                $(
                    if name == stringify!($field) {
                        return ::std::option::Option::Some(
                            <$ty as $crate::FieldValue>::to_value(&self.$field),
                        );
                    }
                )*
                ::std::option::Option::None
            }

            fn set_field(&mut self, name: &str, value: $crate::Value) -> $crate::Result<()> {
                $(
                    if name == stringify!($field) {
                        self.$field = <$ty as $crate::FieldValue>::from_value(value)
                            .ok_or_else(|| $crate::Error::Conversion(name.to_string()))?;
                        return ::std::result::Result::Ok(());
                    }
                )*
                let _ = value;
                ::std::result::Result::Err($crate::Error::FieldNotFound(name.to_string()))
            }

            fn blank(&self) -> Self {
                <Self as ::std::default::Default>::default()
            }
        }
    };
}
