use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::RecordStore;
use crate::error::{Error, Result};
use crate::item::{Item, KeyAttr, RecordKey};
use crate::update::Assignment;

type Collection = BTreeMap<(String, String), Item>;

/// Process-local store with the same single-item semantics as DynamoDB.
/// Every operation holds the lock for its whole duration, so `append` is atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn slot(key: &RecordKey) -> (String, String) {
    (key.partition.value.clone(), key.sort.value.clone())
}

fn missing(collection: &str, key: &RecordKey) -> Error {
    Error::not_found(format!("no record in {collection} for {key}"))
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn put(&self, collection: &str, key: &RecordKey, mut item: Item) -> Result<()> {
        key.write_into(&mut item);
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(slot(key), item);
        Ok(())
    }

    async fn get(&self, collection: &str, key: &RecordKey) -> Result<Option<Item>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|records| records.get(&slot(key)))
            .cloned())
    }

    async fn update(
        &self,
        collection: &str,
        key: &RecordKey,
        assignments: &[Assignment],
    ) -> Result<Item> {
        let mut collections = self.collections.write().await;
        let item = collections
            .get_mut(collection)
            .and_then(|records| records.get_mut(&slot(key)))
            .ok_or_else(|| missing(collection, key))?;
        for assignment in assignments {
            item.insert(assignment.field.to_string(), assignment.value.clone());
        }
        Ok(item.clone())
    }

    async fn append(
        &self,
        collection: &str,
        key: &RecordKey,
        field: &str,
        values: Vec<Value>,
    ) -> Result<Item> {
        let mut collections = self.collections.write().await;
        let item = collections
            .get_mut(collection)
            .and_then(|records| records.get_mut(&slot(key)))
            .ok_or_else(|| missing(collection, key))?;
        // Like `list_append`, a present non-list value (null included) is rejected.
        let list = item
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match list {
            Value::Array(list) => list.extend(values),
            _ => return Err(Error::store(format!("{field} is not a list"))),
        }
        Ok(item.clone())
    }

    async fn query(&self, collection: &str, partition: &KeyAttr) -> Result<Vec<Item>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|((p, _), _)| *p == partition.value)
                    .map(|(_, item)| item.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete(&self, collection: &str, key: &RecordKey) -> Result<()> {
        let mut collections = self.collections.write().await;
        if let Some(records) = collections.get_mut(collection) {
            records.remove(&slot(key));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(p: &str, s: &str) -> RecordKey {
        RecordKey::new(KeyAttr::new("tripId", p), KeyAttr::new("colId", s))
    }

    #[tokio::test]
    async fn put_writes_key_attributes() {
        let store = MemoryStore::new();
        store.put("cols", &key("t1", "c1"), Item::new()).await.unwrap();
        let item = store.get("cols", &key("t1", "c1")).await.unwrap().unwrap();
        assert_eq!(item["tripId"], json!("t1"));
        assert_eq!(item["colId"], json!("c1"));
    }

    #[tokio::test]
    async fn update_of_absent_record_is_not_found() {
        let store = MemoryStore::new();
        let assignment = Assignment {
            field: "name",
            value: json!("x"),
        };
        let err = store
            .update("cols", &key("t1", "c1"), &[assignment])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(store.get("cols", &key("t1", "c1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn append_creates_then_extends_list() {
        let store = MemoryStore::new();
        store.put("cols", &key("t1", "c1"), Item::new()).await.unwrap();
        store
            .append("cols", &key("t1", "c1"), "taskIds", vec![json!("a")])
            .await
            .unwrap();
        let item = store
            .append("cols", &key("t1", "c1"), "taskIds", vec![json!("b")])
            .await
            .unwrap();
        assert_eq!(item["taskIds"], json!(["a", "b"]));
    }

    #[tokio::test]
    async fn append_onto_null_is_rejected() {
        let store = MemoryStore::new();
        let item = json!({"taskIds": null}).as_object().cloned().unwrap();
        store.put("cols", &key("t1", "c1"), item).await.unwrap();
        let err = store
            .append("cols", &key("t1", "c1"), "taskIds", vec![json!("a")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }

    #[tokio::test]
    async fn query_is_scoped_to_partition() {
        let store = MemoryStore::new();
        store.put("cols", &key("t1", "c1"), Item::new()).await.unwrap();
        store.put("cols", &key("t2", "c2"), Item::new()).await.unwrap();
        let items = store
            .query("cols", &KeyAttr::new("tripId", "t1"))
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert!(store
            .query("cols", &KeyAttr::new("tripId", "t3"))
            .await
            .unwrap()
            .is_empty());
    }
}
