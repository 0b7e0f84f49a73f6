//! Structural diff and patch for records with named fields.
//!
//! [`compare`] turns two records of one shape into a [`ChangeSet`], [`apply`]
//! replays a change set onto a record, and the functions in
//! [`diff::algebra`] filter, merge, revert and render change sets. [`codec`]
//! moves change sets across process or storage boundaries.

pub mod codec;
pub mod compress;
pub mod config;
pub mod diff;
pub mod err;
pub mod logging;
pub mod record;
pub mod util;
pub mod value;

pub use codec::{deserialize, serialize};
pub use diff::{
    Change, ChangeSet, ChangeType, apply, compare, describe, filter, format, merge, revert, to_map,
};
pub use err::{Error, ErrorKind, Result};
pub use record::{DynamicRecord, FieldDef, FieldValue, Record, Shape};
pub use value::{FieldType, Value};
