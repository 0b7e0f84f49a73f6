use std::sync::Arc;

use super::{Record, Shape};
use crate::{
    Value,
    err::{Error, Result},
};

/// A record whose shape is only known at runtime, e.g. loaded from a file.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicRecord {
    shape: Arc<Shape>,
    values: Vec<Value>,
}

impl DynamicRecord {
    pub fn new(shape: Arc<Shape>) -> Self {
        let values = shape.fields.iter().map(|def| def.ty.zero()).collect();
        Self { shape, values }
    }

    /// Builds a record from a JSON object. Keys missing from the object keep
    /// their zero value.
    pub fn from_json(shape: Arc<Shape>, json: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(object) = json else {
            return Err(Error::NotARecord);
        };
        let mut record = Self::new(shape);
        for (name, raw) in object {
            let i = record
                .shape
                .position(&name)
                .ok_or_else(|| Error::FieldNotFound(name.clone()))?;
            let raw: Value = serde_json::from_value(raw).map_err(Error::format)?;
            let value = record.shape.fields[i]
                .ty
                .coerce(&raw)
                .ok_or_else(|| Error::Conversion(name.clone()))?;
            record.values[i] = value;
        }
        Ok(record)
    }

    /// Renders every field, private ones included, as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        let object = self
            .shape
            .fields
            .iter()
            .zip(&self.values)
            .map(|(def, value)| {
                let json = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
                (def.name.clone(), json)
            })
            .collect();
        serde_json::Value::Object(object)
    }
}

impl Record for DynamicRecord {
    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.shape.position(name).map(|i| self.values[i].clone())
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        let i = self
            .shape
            .position(name)
            .ok_or_else(|| Error::FieldNotFound(name.to_string()))?;
        if !self.shape.fields[i].ty.admits(&value) {
            return Err(Error::Conversion(name.to_string()));
        }
        self.values[i] = value;
        Ok(())
    }

    fn blank(&self) -> Self {
        Self::new(Arc::clone(&self.shape))
    }
}
