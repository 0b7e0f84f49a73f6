mod dynamic;
mod field;
mod macros;

pub use dynamic::DynamicRecord;
pub use field::FieldValue;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{Value, err::Result, value::FieldType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
    #[serde(default = "exported_by_default")]
    pub exported: bool,
}

fn exported_by_default() -> bool {
    true
}

impl FieldDef {
    pub fn new(name: &str, ty: FieldType, exported: bool) -> Self {
        Self {
            name: name.to_string(),
            ty,
            exported,
        }
    }
}

/// Declared field layout of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl Shape {
    pub fn new(name: &str, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.to_string(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|def| def.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|def| def.name == name)
    }

    pub fn exported(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|def| def.exported)
    }

    pub fn same_as(&self, other: &Shape) -> bool {
        std::ptr::eq(self, other) || self == other
    }
}

/// Introspection capability the diff and patch engines are written against.
///
/// Usually derived with [`record!`](crate::record!); [`DynamicRecord`] covers
/// shapes only known at runtime.
pub trait Record: Sized {
    fn shape(&self) -> &Shape;

    /// Current value of a named field, `None` if the shape has no such field.
    fn field(&self, name: &str) -> Option<Value>;

    /// Replaces a named field. The value must already be admitted by the
    /// field's declared type.
    fn set_field(&mut self, name: &str, value: Value) -> Result<()>;

    /// A new instance of the same shape with every field at its zero value.
    fn blank(&self) -> Self;
}

impl<R: Record> Record for Box<R> {
    fn shape(&self) -> &Shape {
        (**self).shape()
    }

    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        (**self).set_field(name, value)
    }

    fn blank(&self) -> Self {
        Box::new((**self).blank())
    }
}

impl<R: Record + Clone> Record for Arc<R> {
    fn shape(&self) -> &Shape {
        (**self).shape()
    }

    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        Arc::make_mut(self).set_field(name, value)
    }

    fn blank(&self) -> Self {
        Arc::new((**self).blank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Account {
            pub owner: String,
            pub balance: f64,
            pub tags: Vec<String>,
            pin: u32,
        }
    }

    #[test]
    fn test_derived_shape() {
        let account = Account::default();
        let shape = account.shape();
        assert_eq!(shape.name, "Account");
        let names: Vec<_> = shape.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["owner", "balance", "tags", "pin"]);
        assert_eq!(shape.field("tags").unwrap().ty, FieldType::List(Box::new(FieldType::Text)));
        assert!(!shape.field("pin").unwrap().exported);
        assert_eq!(shape.exported().count(), 3);
        assert!(std::ptr::eq(shape, Account::default().shape()));
    }

    #[test]
    fn test_derived_get_set() {
        let mut account = Account {
            owner: "Ann".to_string(),
            pin: 1234,
            ..Default::default()
        };
        assert_eq!(account.field("owner"), Some(Value::from("Ann")));
        assert_eq!(account.field("pin"), Some(Value::Int(1234)));
        assert_eq!(account.field("missing"), None);

        account.set_field("balance", Value::Float(9.5)).unwrap();
        assert_eq!(account.balance, 9.5);
        let err = account.set_field("balance", Value::from("x")).unwrap_err();
        assert!(matches!(err, crate::Error::Conversion(f) if f == "balance"));
        let err = account.set_field("nope", Value::Null).unwrap_err();
        assert!(matches!(err, crate::Error::FieldNotFound(_)));
    }

    #[test]
    fn test_wrappers_delegate() {
        let mut boxed = Box::new(Account::default());
        boxed.set_field("owner", Value::from("Bo")).unwrap();
        assert_eq!(boxed.owner, "Bo");
        assert_eq!(boxed.blank(), Box::new(Account::default()));

        let shared = Arc::new(Account::default());
        let mut copy = Arc::clone(&shared);
        copy.set_field("owner", Value::from("Cy")).unwrap();
        assert_eq!(shared.owner, "");
        assert_eq!(copy.owner, "Cy");
    }

    #[test]
    fn test_shape_from_json() {
        let shape: Shape = serde_json::from_str(
            r#"{"name":"Person","fields":[
                {"name":"Name","type":"text"},
                {"name":"secret","type":"int","exported":false}
            ]}"#,
        )
        .unwrap();
        assert!(shape.field("Name").unwrap().exported);
        assert!(!shape.field("secret").unwrap().exported);
        assert_eq!(shape.position("secret"), Some(1));
    }
}
