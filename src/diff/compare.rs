use rayon::prelude::*;

use super::{Change, ChangeSet, ChangeType};
use crate::{
    Value,
    err::{Error, Result},
    record::{FieldDef, Record},
    value::Category,
};

fn classify(def: &FieldDef, old: &Value, new: &Value) -> ChangeType {
    match def.ty.category() {
        Category::Optional => match (old.is_null(), new.is_null()) {
            (false, true) => ChangeType::Deleted,
            (true, false) => ChangeType::Added,
            _ => ChangeType::Modified,
        },
        Category::Collection | Category::Text => match (old.is_empty(), new.is_empty()) {
            (false, true) => ChangeType::Deleted,
            (true, false) => ChangeType::Added,
            _ => ChangeType::Modified,
        },
        Category::Scalar => ChangeType::Modified,
    }
}

fn compare_field<R: Record>(def: &FieldDef, old: &R, new: &R) -> Result<Option<Change>> {
    let missing = || Error::FieldNotFound(def.name.clone());
    let old_value = old.field(&def.name).ok_or_else(missing)?;
    let new_value = new.field(&def.name).ok_or_else(missing)?;
    if old_value.same_as(&new_value) {
        return Ok(None);
    }
    let change_type = classify(def, &old_value, &new_value);
    log::trace!("field {}: {}", def.name, change_type);
    Ok(Some(Change {
        field: def.name.clone(),
        change_type,
        old_value,
        new_value,
    }))
}

/// Computes the changes that turn `old` into `new`.
///
/// Each exported field is compared as its own rayon task; results are
/// collected by field position, so the change set follows declaration order.
/// Private fields are skipped.
pub fn compare<R: Record + Sync>(old: &R, new: &R) -> Result<ChangeSet> {
    let shape = old.shape();
    if !shape.same_as(new.shape()) {
        return Err(Error::ShapeMismatch {
            old: shape.name.clone(),
            new: new.shape().name.clone(),
        });
    }
    log::debug!("compare(): {} fields of {}", shape.fields.len(), shape.name);
    let slots: Vec<Option<Change>> = shape
        .fields
        .par_iter()
        .filter(|def| def.exported)
        .map(|def| compare_field(def, old, new))
        .collect::<Result<_>>()?;
    let changes: ChangeSet = slots.into_iter().flatten().collect();
    log::debug!("compare(): {} changes", changes.len());
    Ok(changes)
}
