use std::collections::HashMap;

use super::{Change, ChangeType};
use crate::{
    Value,
    err::{Error, Result},
    record::{FieldDef, Record},
};

fn replacement(def: &FieldDef, change: &Change) -> Result<Value> {
    match change.change_type {
        ChangeType::Deleted => Ok(def.ty.zero()),
        ChangeType::Added | ChangeType::Modified => {
            if change.new_value.is_null() && def.ty.admits_absence() {
                return Ok(def.ty.zero());
            }
            def.ty
                .coerce(&change.new_value)
                .ok_or_else(|| Error::Conversion(change.field.clone()))
        }
    }
}

/// Applies `changes` in order to a copy of `original`.
///
/// The result starts from a blank instance of the same shape with every
/// exported field copied over; private fields stay at their zero value and
/// cannot be targeted. Later entries for the same field win. `original` is
/// never modified, and a `Box`/`Arc` input yields a `Box`/`Arc` output.
pub fn apply<R: Record>(original: &R, changes: &[Change]) -> Result<R> {
    let shape = original.shape();
    log::debug!("apply(): {} changes to {}", changes.len(), shape.name);

    let mut result = original.blank();
    for def in shape.exported() {
        let value = original
            .field(&def.name)
            .ok_or_else(|| Error::FieldNotFound(def.name.clone()))?;
        result.set_field(&def.name, value)?;
    }

    let mut cache: HashMap<&str, &FieldDef> = HashMap::with_capacity(changes.len());
    for change in changes {
        let def = match cache.get(change.field.as_str()) {
            Some(def) => *def,
            None => {
                let def = shape
                    .field(&change.field)
                    .ok_or_else(|| Error::FieldNotFound(change.field.clone()))?;
                cache.insert(change.field.as_str(), def);
                def
            }
        };
        if !def.exported {
            return Err(Error::FieldNotSettable(change.field.clone()));
        }
        log::trace!("field {}: {}", change.field, change.change_type);
        let value = replacement(def, change)?;
        result.set_field(&def.name, value)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use super::*;
    use crate::{
        ErrorKind,
        diff::compare,
        record,
        util::test::{Person, create_test_people},
    };

    record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Badge {
            pub holder: String,
            pub level: u8,
            pub weight: f32,
            serial: i32,
        }
    }

    fn john() -> Person {
        Person {
            name: "John".to_string(),
            age: 30,
            active: true,
            address: "123 Main St".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_apply_modifies_values() {
        let original = john();
        let changes = vec![
            Change::modified("name", Value::Null, "Jane"),
            Change::modified("age", Value::Null, 31),
            Change::modified("active", Value::Null, false),
        ];
        let modified = apply(&original, &changes).unwrap();
        assert_eq!(modified.name, "Jane");
        assert_eq!(modified.age, 31);
        assert!(!modified.active);
        assert_eq!(modified.address, "123 Main St");
        assert_eq!(original, john());
    }

    #[test]
    fn test_apply_deletes_fields() {
        let original = Person {
            children: vec!["Alice".to_string(), "Bob".to_string()],
            nickname: Some("JD".to_string()),
            ..john()
        };
        let changes = vec![
            Change::deleted("name", "John"),
            Change::deleted("children", vec!["Alice", "Bob"]),
            Change::deleted("nickname", "JD"),
            Change::deleted("age", 30),
        ];
        let modified = apply(&original, &changes).unwrap();
        assert_eq!(modified.name, "");
        assert!(modified.children.is_empty());
        assert_eq!(modified.nickname, None);
        assert_eq!(modified.age, 0);
    }

    #[test]
    fn test_apply_adds_values() {
        let changes = vec![
            Change::added("age", 25),
            Change::added("children", vec!["Child"]),
            Change::added("nickname", "Jo"),
            Change::added(
                "scores",
                Value::Map(BTreeMap::from([("math".to_string(), Value::Int(9))])),
            ),
        ];
        let modified = apply(&Person::default(), &changes).unwrap();
        assert_eq!(modified.age, 25);
        assert_eq!(modified.children, ["Child"]);
        assert_eq!(modified.nickname.as_deref(), Some("Jo"));
        assert_eq!(modified.scores["math"], 9);
    }

    #[test]
    fn test_apply_null_to_absent_capable_fields() {
        let original = Person {
            children: vec!["A".to_string()],
            nickname: Some("n".to_string()),
            ..john()
        };
        let changes = vec![
            Change::modified("children", vec!["A"], Value::Null),
            Change::modified("nickname", "n", Value::Null),
        ];
        let modified = apply(&original, &changes).unwrap();
        assert!(modified.children.is_empty());
        assert_eq!(modified.nickname, None);

        let err = apply(&original, &[Change::modified("age", 30, Value::Null)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
    }

    #[test]
    fn test_apply_converts_values() {
        let badge = Badge::default();
        let changes = vec![
            Change::modified("weight", 0.0, 3),
            Change::modified("level", 0, 7.0),
        ];
        let modified = apply(&badge, &changes).unwrap();
        assert_eq!(modified.weight, 3.0);
        assert_eq!(modified.level, 7);

        let err = apply(&badge, &[Change::modified("level", 0, 300)]).unwrap_err();
        assert!(matches!(err, Error::Conversion(f) if f == "level"));
        let err = apply(&badge, &[Change::modified("holder", "", 1)]).unwrap_err();
        assert!(matches!(err, Error::Conversion(f) if f == "holder"));
    }

    #[test]
    fn test_apply_later_entries_win() {
        let changes = vec![
            Change::modified("age", 30, 31),
            Change::modified("age", 31, 32),
        ];
        assert_eq!(apply(&john(), &changes).unwrap().age, 32);
    }

    #[test]
    fn test_apply_unknown_field() {
        let err = apply(&john(), &[Change::modified("height", 1, 2)]).unwrap_err();
        assert!(matches!(err, Error::FieldNotFound(f) if f == "height"));
    }

    #[test]
    fn test_apply_private_field_fails() {
        let badge = Badge {
            serial: 5,
            ..Default::default()
        };
        for change in [
            Change::modified("serial", 5, 6),
            Change::added("serial", 6),
            Change::deleted("serial", 5),
        ] {
            let err = apply(&badge, &[change]).unwrap_err();
            assert!(matches!(err, Error::FieldNotSettable(f) if f == "serial"));
        }
    }

    #[test]
    fn test_apply_resets_private_fields() {
        let badge = Badge {
            holder: "Ann".to_string(),
            serial: 5,
            ..Default::default()
        };
        let patched = apply(&badge, &[]).unwrap();
        assert_eq!(patched.holder, "Ann");
        assert_eq!(patched.serial, 0);
    }

    #[test]
    fn test_apply_keeps_passing_convention() {
        let boxed = Box::new(john());
        let patched: Box<Person> = apply(&boxed, &[Change::modified("age", 30, 31)]).unwrap();
        assert_eq!(patched.age, 31);
        assert_eq!(boxed.age, 30);

        let shared = Arc::new(john());
        let patched: Arc<Person> = apply(&shared, &[Change::modified("age", 30, 31)]).unwrap();
        assert_eq!(patched.age, 31);
        assert_eq!(shared.age, 30);
        assert!(!Arc::ptr_eq(&shared, &patched));
    }

    #[test]
    fn test_apply_empty_changes() {
        let original = Person {
            children: vec!["x".to_string()],
            ..john()
        };
        assert_eq!(apply(&original, &[]).unwrap(), original);
    }

    #[test]
    fn test_diff_patch_round_trip() {
        let mut old_iter = create_test_people(114514);
        let mut new_iter = create_test_people(1919810);
        for _ in 0..10_000 {
            let old = old_iter.next().unwrap();
            let new = new_iter.next().unwrap();
            let changes = compare(&old, &new).unwrap();
            let patched = apply(&old, &changes).unwrap();
            assert_eq!(patched, new, "old: {:?}; changes: {:?}", old, changes);
        }
    }

    #[test]
    fn test_person_scenario() {
        let old = Person {
            name: "John Doe".to_string(),
            age: 30,
            address: "123 Main St".to_string(),
            active: true,
            ..Default::default()
        };
        let new = Person {
            age: 31,
            address: "456 Oak Ave".to_string(),
            active: false,
            ..old.clone()
        };
        let changes = compare(&old, &new).unwrap();
        assert_eq!(changes.len(), 3);
        assert!(changes.iter().all(|c| c.change_type == ChangeType::Modified));
        assert_eq!(apply(&old, &changes).unwrap(), new);
    }

    #[test]
    fn test_children_deleted_scenario() {
        let old = Person {
            children: vec!["Alice".to_string(), "Bob".to_string()],
            ..john()
        };
        let changes = compare(&old, &john()).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Deleted);
        let other = Person {
            children: vec!["Zed".to_string()],
            ..Default::default()
        };
        assert!(apply(&other, &changes).unwrap().children.is_empty());
    }
}
