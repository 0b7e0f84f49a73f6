use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Dynamically typed payload carried by a change.
///
/// `Null` stands for an absent value: an empty optional, or the missing side
/// of a synthetic `Added`/`Deleted` entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Encode, Decode)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Length of a text or container value, `None` for everything else.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Text(s) => Some(s.len()),
            Value::List(items) => Some(items.len()),
            Value::Map(map) => Some(map.len()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Structural equality where floats compare by bit pattern, so a NaN
    /// equals itself.
    pub fn same_as(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_as(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|((ka, va), (kb, vb))| ka == kb && va.same_as(vb))
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "<nil>"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "map[")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}:{}", k, v)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

/// Declared type of a record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Bool,
    Int,
    Float,
    Text,
    List(Box<FieldType>),
    Map(Box<FieldType>),
    Optional(Box<FieldType>),
}

/// How the diff classifier treats a field when its value changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// May be absent: absence on one side means `Added`/`Deleted`.
    Optional,
    /// Ordered sequence or mapping: emptiness on one side means `Added`/`Deleted`.
    Collection,
    /// Empty string on one side means `Added`/`Deleted`.
    Text,
    /// No empty state, always `Modified`.
    Scalar,
}

impl FieldType {
    pub fn category(&self) -> Category {
        match self {
            FieldType::Optional(_) => Category::Optional,
            FieldType::List(_) | FieldType::Map(_) => Category::Collection,
            FieldType::Text => Category::Text,
            FieldType::Bool | FieldType::Int | FieldType::Float => Category::Scalar,
        }
    }

    /// Whether `Null` is an acceptable stand-in for the zero value.
    pub fn admits_absence(&self) -> bool {
        matches!(
            self,
            FieldType::Optional(_) | FieldType::List(_) | FieldType::Map(_)
        )
    }

    pub fn zero(&self) -> Value {
        match self {
            FieldType::Bool => Value::Bool(false),
            FieldType::Int => Value::Int(0),
            FieldType::Float => Value::Float(0.0),
            FieldType::Text => Value::Text(String::new()),
            FieldType::List(_) => Value::List(Vec::new()),
            FieldType::Map(_) => Value::Map(BTreeMap::new()),
            FieldType::Optional(_) => Value::Null,
        }
    }

    /// Exact match between a runtime value and this declared type.
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldType::Bool, Value::Bool(_))
            | (FieldType::Int, Value::Int(_))
            | (FieldType::Float, Value::Float(_))
            | (FieldType::Text, Value::Text(_)) => true,
            (FieldType::List(elem), Value::List(items)) => items.iter().all(|v| elem.admits(v)),
            (FieldType::Map(elem), Value::Map(map)) => map.values().all(|v| elem.admits(v)),
            (FieldType::Optional(_), Value::Null) => true,
            (FieldType::Optional(inner), v) => inner.admits(v),
            _ => false,
        }
    }

    /// Converts `value` into the canonical representation of this type.
    ///
    /// Integers widen to floats; floats narrow to integers only when integral
    /// and in range. Containers convert element-wise.
    pub fn coerce(&self, value: &Value) -> Option<Value> {
        if self.admits(value) {
            return Some(value.clone());
        }
        match (self, value) {
            (FieldType::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),
            (FieldType::Int, Value::Float(x))
                if x.fract() == 0.0 && *x >= i64::MIN as f64 && *x < i64::MAX as f64 =>
            {
                Some(Value::Int(*x as i64))
            }
            (FieldType::List(elem), Value::List(items)) => items
                .iter()
                .map(|v| elem.coerce(v))
                .collect::<Option<Vec<_>>>()
                .map(Value::List),
            (FieldType::Map(elem), Value::Map(map)) => map
                .iter()
                .map(|(k, v)| elem.coerce(v).map(|v| (k.clone(), v)))
                .collect::<Option<BTreeMap<_, _>>>()
                .map(Value::Map),
            (FieldType::Optional(inner), v) => inner.coerce(v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => write!(f, "bool"),
            FieldType::Int => write!(f, "int"),
            FieldType::Float => write!(f, "float"),
            FieldType::Text => write!(f, "text"),
            FieldType::List(elem) => write!(f, "[]{}", elem),
            FieldType::Map(elem) => write!(f, "map[text]{}", elem),
            FieldType::Optional(inner) => write!(f, "?{}", inner),
        }
    }
}
