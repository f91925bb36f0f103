use serde_json::Value;

use crate::item::{KeyAttr, RecordKey};

pub const CREATED_AT: &str = "createdAt";

/// Shape a non-null value must have to be stored in a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    IdList,
    OneOf(&'static [&'static str]),
}

impl FieldKind {
    /// Null is accepted by every kind so a caller can clear a field.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (FieldKind::Text, Value::String(_)) => true,
            (FieldKind::Number, Value::Number(_)) => true,
            (FieldKind::IdList, Value::Array(ids)) => ids.iter().all(Value::is_string),
            (FieldKind::OneOf(allowed), Value::String(s)) => allowed.contains(&s.as_str()),
            _ => false,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            FieldKind::Text => "a string".to_string(),
            FieldKind::Number => "a number".to_string(),
            FieldKind::IdList => "a list of ids".to_string(),
            FieldKind::OneOf(allowed) => format!("one of {}", allowed.join(", ")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl Field {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

#[derive(Debug)]
pub struct EntitySchema {
    pub entity: &'static str,
    pub partition_key: &'static str,
    pub sort_key: &'static str,
    pub fields: &'static [Field],
}

impl EntitySchema {
    pub fn partition(&self, value: impl Into<String>) -> KeyAttr {
        KeyAttr::new(self.partition_key, value)
    }

    pub fn key(&self, partition: impl Into<String>, sort: impl Into<String>) -> RecordKey {
        RecordKey::new(self.partition(partition), KeyAttr::new(self.sort_key, sort))
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_protected(&self, name: &str) -> bool {
        name == self.partition_key || name == self.sort_key || name == CREATED_AT
    }
}
