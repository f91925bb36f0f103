//! Entity handlers: create, get, list, update, append and delete for one
//! record type, each a single store operation.

pub mod col;
pub mod task;
pub mod trip;

pub use col::{ColService, ColType, NewCol};
pub use task::{NewTask, TaskService, TaskType};
pub use trip::{NewTrip, TripService};

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::config::CollectionConfig;
use crate::error::{Error, Result};
use crate::item::{Item, RecordKey};
use crate::schema::EntitySchema;
use crate::store::RecordStore;
use crate::update::{build_assignments, Assignment};

#[derive(Debug)]
pub struct Records<S> {
    store: S,
    collection: CollectionConfig,
    schema: &'static EntitySchema,
}

impl<S: RecordStore> Records<S> {
    pub fn new(store: S, collection: CollectionConfig, schema: &'static EntitySchema) -> Self {
        Self {
            store,
            collection,
            schema,
        }
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    fn name(&self) -> &str {
        &self.collection.collection_name
    }

    pub async fn insert(&self, key: &RecordKey, item: Item) -> Result<()> {
        self.store.put(self.name(), key, item).await?;
        info!(entity = self.schema.entity, %key, "created");
        Ok(())
    }

    pub async fn get(&self, key: &RecordKey) -> Result<Item> {
        self.store
            .get(self.name(), key)
            .await?
            .ok_or_else(|| Error::not_found(format!("{} not found", self.schema.entity)))
    }

    /// An empty partition is an empty list, not a missing record.
    pub async fn list(&self, partition: &str) -> Result<Vec<Item>> {
        self.store
            .query(self.name(), &self.schema.partition(partition))
            .await
    }

    pub async fn update(&self, key: &RecordKey, input: &Item) -> Result<Item> {
        let assignments = build_assignments(self.schema, input)?;
        self.apply(key, &assignments).await
    }

    pub async fn apply(&self, key: &RecordKey, assignments: &[Assignment]) -> Result<Item> {
        let item = self.store.update(self.name(), key, assignments).await?;
        info!(entity = self.schema.entity, %key, fields = assignments.len(), "updated");
        Ok(item)
    }

    pub async fn append(&self, key: &RecordKey, field: &str, id: String) -> Result<Item> {
        self.store
            .append(self.name(), key, field, vec![Value::String(id)])
            .await
    }

    pub async fn delete(&self, key: &RecordKey) -> Result<()> {
        self.store.delete(self.name(), key).await?;
        info!(entity = self.schema.entity, %key, "deleted");
        Ok(())
    }
}

pub(crate) fn to_item<T: Serialize>(record: &T) -> Result<Item> {
    match serde_json::to_value(record) {
        Ok(Value::Object(item)) => Ok(item),
        Ok(_) => Err(Error::store("record did not encode as an object")),
        Err(e) => Err(Error::store(format!("failed to encode record: {e}"))),
    }
}

pub(crate) fn require_id(name: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::validation(format!("missing {name}")));
    }
    Ok(())
}
