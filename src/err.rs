use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not a record")]
    NotARecord,
    #[error("shape mismatch: {old} vs {new}")]
    ShapeMismatch { old: String, new: String },
    #[error("field {0} not found")]
    FieldNotFound(String),
    #[error("field {0} is not settable")]
    FieldNotSettable(String),
    #[error("cannot convert value for field {0}")]
    Conversion(String),
    #[error("malformed change set: {0}")]
    Format(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Coarse classification of [`Error`], one per failure family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input is not a record, or two records disagree on shape.
    Shape,
    /// Named field is absent from the shape or not writable.
    Field,
    /// Replacement value cannot be coerced to the declared field type.
    Conversion,
    /// Malformed serialized change set.
    Format,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotARecord | Error::ShapeMismatch { .. } => ErrorKind::Shape,
            Error::FieldNotFound(_) | Error::FieldNotSettable(_) => ErrorKind::Field,
            Error::Conversion(_) => ErrorKind::Conversion,
            Error::Format(_) => ErrorKind::Format,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn format<E: ToString>(err: E) -> Self {
        Error::Format(err.to_string())
    }
}
