pub mod algebra;
pub mod compare;
pub mod patch;

pub use algebra::{describe, filter, format, merge, revert, to_map};
pub use compare::compare;
pub use patch::apply;

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Modified,
    Deleted,
}

impl ChangeType {
    /// The change type that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            ChangeType::Added => ChangeType::Deleted,
            ChangeType::Deleted => ChangeType::Added,
            ChangeType::Modified => ChangeType::Modified,
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChangeType::Added => "added",
                ChangeType::Modified => "modified",
                ChangeType::Deleted => "deleted",
            }
        )
    }
}

/// One field-level difference between two records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "PascalCase")]
pub struct Change {
    pub field: String,
    pub change_type: ChangeType,
    #[serde(default)]
    pub old_value: Value,
    #[serde(default)]
    pub new_value: Value,
}

impl Change {
    pub fn new(
        field: &str,
        change_type: ChangeType,
        old_value: impl Into<Value>,
        new_value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.to_string(),
            change_type,
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }

    pub fn added(field: &str, new_value: impl Into<Value>) -> Self {
        Self::new(field, ChangeType::Added, Value::Null, new_value)
    }

    pub fn modified(field: &str, old_value: impl Into<Value>, new_value: impl Into<Value>) -> Self {
        Self::new(field, ChangeType::Modified, old_value, new_value)
    }

    pub fn deleted(field: &str, old_value: impl Into<Value>) -> Self {
        Self::new(field, ChangeType::Deleted, old_value, Value::Null)
    }
}

/// Ordered list of changes; field names are a dedup key only for
/// [`merge`] and [`to_map`].
pub type ChangeSet = Vec<Change>;
