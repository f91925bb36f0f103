//! Uniform access to the external record store.

mod dynamo;
mod memory;

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::item::{Item, KeyAttr, RecordKey};
use crate::update::Assignment;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn put(&self, collection: &str, key: &RecordKey, item: Item) -> Result<()>;

    /// `Ok(None)` when the key does not exist.
    async fn get(&self, collection: &str, key: &RecordKey) -> Result<Option<Item>>;

    /// Fails with `NotFound` when the key does not exist.
    async fn update(
        &self,
        collection: &str,
        key: &RecordKey,
        assignments: &[Assignment],
    ) -> Result<Item>;

    /// One atomic list append, creating the list if absent. Fails with
    /// `NotFound` when the key does not exist.
    async fn append(
        &self,
        collection: &str,
        key: &RecordKey,
        field: &str,
        values: Vec<Value>,
    ) -> Result<Item>;

    /// All records under one partition key; empty is not an error.
    async fn query(&self, collection: &str, partition: &KeyAttr) -> Result<Vec<Item>>;

    async fn delete(&self, collection: &str, key: &RecordKey) -> Result<()>;
}
