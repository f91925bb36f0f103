//! Turns a partial input object into the field assignments of one update.
//!
//! A field is assigned if and only if the input names it, explicit `null`
//! included (an id list cleared with `null` becomes `[]`). Absent fields are
//! left untouched in the stored record. Identity
//! key fields and `createdAt` are never assigned, and an input that names no
//! updatable field is rejected rather than sent as a no-op.

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::item::Item;
use crate::schema::{EntitySchema, FieldKind};

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub field: &'static str,
    pub value: Value,
}

/// Assignments follow the schema's field order, not the input's.
pub fn build_assignments(schema: &EntitySchema, input: &Item) -> Result<Vec<Assignment>> {
    let mut assignments = Vec::new();
    for field in schema.fields {
        let Some(value) = input.get(field.name) else {
            continue;
        };
        if !field.kind.accepts(value) {
            return Err(Error::validation(format!(
                "{} must be {}",
                field.name,
                field.kind.describe()
            )));
        }
        // A cleared id list stays a list so later appends still apply.
        let value = match (field.kind, value) {
            (FieldKind::IdList, Value::Null) => Value::Array(Vec::new()),
            _ => value.clone(),
        };
        assignments.push(Assignment {
            field: field.name,
            value,
        });
    }

    let ignored: Vec<&str> = input
        .keys()
        .map(String::as_str)
        .filter(|name| schema.is_protected(name) || schema.field(name).is_none())
        .collect();
    if !ignored.is_empty() {
        debug!(entity = schema.entity, ?ignored, "ignoring non-updatable fields");
    }

    if assignments.is_empty() {
        return Err(Error::validation(format!(
            "no updatable {} fields in request",
            schema.entity
        )));
    }
    Ok(assignments)
}
