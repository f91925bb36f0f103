use serde::{Deserialize, Serialize};

use super::{require_id, to_item, Records};
use crate::config::CollectionConfig;
use crate::error::Result;
use crate::id::{new_id, now_millis};
use crate::item::{Item, RecordKey};
use crate::schema::{EntitySchema, Field, FieldKind};
use crate::store::RecordStore;

pub const TASK_IDS: &str = "taskIds";

/// Wishlists and day columns are stored the same way for now.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColType {
    Wishlist,
    #[default]
    Column,
}

pub static COL_SCHEMA: EntitySchema = EntitySchema {
    entity: "col",
    partition_key: "tripId",
    sort_key: "colId",
    fields: &[
        Field::new("colType", FieldKind::OneOf(&["WISHLIST", "COLUMN"])),
        Field::new("name", FieldKind::Text),
        Field::new("startTime", FieldKind::Text),
        Field::new("endTime", FieldKind::Text),
        Field::new(TASK_IDS, FieldKind::IdList),
        Field::new("notes", FieldKind::Text),
        Field::new("lodging", FieldKind::Text),
    ],
};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCol {
    #[serde(default)]
    pub col_type: ColType,
    pub name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default)]
    pub task_ids: Vec<String>,
    pub notes: Option<String>,
    pub lodging: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ColRecord {
    trip_id: String,
    col_id: String,
    #[serde(flatten)]
    fields: NewCol,
    created_at: u64,
}

#[derive(Debug)]
pub struct ColService<S> {
    records: Records<S>,
}

impl<S: RecordStore> ColService<S> {
    pub fn new(store: S, collection: CollectionConfig) -> Self {
        Self {
            records: Records::new(store, collection, &COL_SCHEMA),
        }
    }

    fn key(trip_id: &str, col_id: &str) -> Result<RecordKey> {
        require_id("tripId", trip_id)?;
        require_id("colId", col_id)?;
        Ok(COL_SCHEMA.key(trip_id, col_id))
    }

    pub async fn create(&self, trip_id: &str, input: NewCol) -> Result<Item> {
        let key = Self::key(trip_id, &new_id(""))?;
        let item = to_item(&ColRecord {
            trip_id: key.partition.value.clone(),
            col_id: key.sort.value.clone(),
            fields: input,
            created_at: now_millis(),
        })?;
        self.records.insert(&key, item.clone()).await?;
        Ok(item)
    }

    pub async fn get(&self, trip_id: &str, col_id: &str) -> Result<Item> {
        self.records.get(&Self::key(trip_id, col_id)?).await
    }

    pub async fn list(&self, trip_id: &str) -> Result<Vec<Item>> {
        require_id("tripId", trip_id)?;
        self.records.list(trip_id).await
    }

    pub async fn update(&self, trip_id: &str, col_id: &str, input: &Item) -> Result<Item> {
        self.records.update(&Self::key(trip_id, col_id)?, input).await
    }

    /// Appends one task id in a single store operation, so concurrent
    /// appends to the same column never lose an id.
    pub async fn append_task(&self, trip_id: &str, col_id: &str, task_id: &str) -> Result<Item> {
        require_id("taskId", task_id)?;
        self.records
            .append(&Self::key(trip_id, col_id)?, TASK_IDS, task_id.to_string())
            .await
    }

    pub async fn delete(&self, trip_id: &str, col_id: &str) -> Result<()> {
        self.records.delete(&Self::key(trip_id, col_id)?).await
    }
}
