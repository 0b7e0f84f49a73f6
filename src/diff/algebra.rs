use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

use super::{Change, ChangeSet, ChangeType};

/// Keeps the changes whose type is in `types` and whose field is in `fields`;
/// an empty filter matches everything.
///
/// When both filters are empty the input is returned borrowed, not copied.
pub fn filter<'a>(changes: &'a [Change], types: &[ChangeType], fields: &[&str]) -> Cow<'a, [Change]> {
    if types.is_empty() && fields.is_empty() {
        return Cow::Borrowed(changes);
    }
    let types: HashSet<ChangeType> = types.iter().copied().collect();
    let fields: HashSet<&str> = fields.iter().copied().collect();
    let kept = changes
        .iter()
        .filter(|change| types.is_empty() || types.contains(&change.change_type))
        .filter(|change| fields.is_empty() || fields.contains(change.field.as_str()))
        .cloned()
        .collect::<Vec<_>>();
    Cow::Owned(kept)
}

/// Indexes changes by field name; the last entry for a field wins.
pub fn to_map(changes: &[Change]) -> BTreeMap<String, Change> {
    changes
        .iter()
        .map(|change| (change.field.clone(), change.clone()))
        .collect()
}

/// Combines change sets so that, per field, the last entry across all inputs
/// wins. The result is ordered by field name.
pub fn merge(change_sets: &[&[Change]]) -> ChangeSet {
    let mut merged = BTreeMap::new();
    for change in change_sets.iter().flat_map(|changes| changes.iter()) {
        merged.insert(change.field.as_str(), change);
    }
    log::debug!(
        "merge(): {} sets into {} changes",
        change_sets.len(),
        merged.len()
    );
    merged.into_values().cloned().collect()
}

/// The change set that undoes `changes`, entry for entry.
pub fn revert(changes: &[Change]) -> ChangeSet {
    changes
        .iter()
        .map(|change| Change {
            field: change.field.clone(),
            change_type: change.change_type.inverse(),
            old_value: change.new_value.clone(),
            new_value: change.old_value.clone(),
        })
        .collect()
}

fn format_change(change: &Change) -> String {
    match change.change_type {
        ChangeType::Modified => format!(
            "Modified {}: {} → {}",
            change.field, change.old_value, change.new_value
        ),
        ChangeType::Added => format!("Added {}: {}", change.field, change.new_value),
        ChangeType::Deleted => format!("Deleted {} (was {})", change.field, change.old_value),
    }
}

/// One line per change, in input order. Empty input gives empty text.
pub fn format(changes: &[Change]) -> String {
    changes
        .iter()
        .map(format_change)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Report for people reading a change set, with a sentinel for no changes.
pub fn describe(changes: &[Change]) -> String {
    if changes.is_empty() {
        return "No changes detected".to_string();
    }
    let mut lines = vec!["Changes detected:".to_string()];
    for change in changes {
        lines.push(format!("Field: {} ({})", change.field, change.change_type));
        lines.push(format!("  - Old: {}", change.old_value));
        lines.push(format!("  - New: {}", change.new_value));
    }
    lines.join("\n")
}
