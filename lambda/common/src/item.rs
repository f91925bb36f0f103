use serde_json::{Map, Value};

pub type Item = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyAttr {
    pub name: &'static str,
    pub value: String,
}

impl KeyAttr {
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub partition: KeyAttr,
    pub sort: KeyAttr,
}

impl RecordKey {
    pub fn new(partition: KeyAttr, sort: KeyAttr) -> Self {
        Self { partition, sort }
    }

    pub fn write_into(&self, item: &mut Item) {
        item.insert(
            self.partition.name.to_string(),
            Value::String(self.partition.value.clone()),
        );
        item.insert(
            self.sort.name.to_string(),
            Value::String(self.sort.value.clone()),
        );
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}={}, {}={}",
            self.partition.name, self.partition.value, self.sort.name, self.sort.value
        )
    }
}
