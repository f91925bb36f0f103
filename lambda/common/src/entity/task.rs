use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::{require_id, to_item, Records};
use crate::config::CollectionConfig;
use crate::error::{Error, Result};
use crate::id::{new_id, now_millis};
use crate::item::{Item, RecordKey};
use crate::schema::{EntitySchema, Field, FieldKind};
use crate::store::RecordStore;
use crate::update::build_assignments;

const LOCATION_PREFIX: &str = "place_";
const DRIVE_PREFIX: &str = "drive_";

const LOCATION_ONLY: [&str; 3] = ["name", "notes", "attachment"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Location,
    Drive,
}

impl TaskType {
    fn id_prefix(self) -> &'static str {
        match self {
            TaskType::Location => LOCATION_PREFIX,
            TaskType::Drive => DRIVE_PREFIX,
        }
    }

    /// The kind is fixed at creation and recorded in the id prefix.
    pub fn of_task_id(task_id: &str) -> Option<Self> {
        if task_id.starts_with(LOCATION_PREFIX) {
            Some(TaskType::Location)
        } else if task_id.starts_with(DRIVE_PREFIX) {
            Some(TaskType::Drive)
        } else {
            None
        }
    }
}

// `taskType` lives in the task id prefix and is not updatable.
pub static TASK_SCHEMA: EntitySchema = EntitySchema {
    entity: "task",
    partition_key: "tripId",
    sort_key: "taskId",
    fields: &[
        Field::new("name", FieldKind::Text),
        Field::new("duration", FieldKind::Number),
        Field::new("notes", FieldKind::Text),
        Field::new("attachment", FieldKind::Text),
    ],
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub task_type: TaskType,
    pub name: Option<String>,
    pub duration: Option<Number>,
    pub notes: Option<String>,
    pub attachment: Option<String>,
}

impl NewTask {
    // A drive has no name, notes or attachment whatever the caller sent.
    fn normalized(mut self) -> Self {
        if self.task_type == TaskType::Drive {
            self.name = None;
            self.notes = None;
            self.attachment = None;
        }
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    trip_id: String,
    task_id: String,
    #[serde(flatten)]
    fields: NewTask,
    created_at: u64,
}

#[derive(Debug)]
pub struct TaskService<S> {
    records: Records<S>,
}

impl<S: RecordStore> TaskService<S> {
    pub fn new(store: S, collection: CollectionConfig) -> Self {
        Self {
            records: Records::new(store, collection, &TASK_SCHEMA),
        }
    }

    fn key(trip_id: &str, task_id: &str) -> Result<RecordKey> {
        require_id("tripId", trip_id)?;
        require_id("taskId", task_id)?;
        Ok(TASK_SCHEMA.key(trip_id, task_id))
    }

    pub async fn create(&self, trip_id: &str, input: NewTask) -> Result<Item> {
        let input = input.normalized();
        let key = Self::key(trip_id, &new_id(input.task_type.id_prefix()))?;
        let item = to_item(&TaskRecord {
            trip_id: key.partition.value.clone(),
            task_id: key.sort.value.clone(),
            fields: input,
            created_at: now_millis(),
        })?;
        self.records.insert(&key, item.clone()).await?;
        Ok(item)
    }

    pub async fn get(&self, trip_id: &str, task_id: &str) -> Result<Item> {
        self.records.get(&Self::key(trip_id, task_id)?).await
    }

    pub async fn list(&self, trip_id: &str) -> Result<Vec<Item>> {
        require_id("tripId", trip_id)?;
        self.records.list(trip_id).await
    }

    pub async fn update(&self, trip_id: &str, task_id: &str, input: &Item) -> Result<Item> {
        let key = Self::key(trip_id, task_id)?;
        if input.contains_key("taskType") {
            return Err(Error::validation("taskType cannot be changed"));
        }
        let assignments = build_assignments(self.records.schema(), input)?;
        if TaskType::of_task_id(task_id) == Some(TaskType::Drive) {
            if let Some(a) = assignments
                .iter()
                .find(|a| LOCATION_ONLY.contains(&a.field) && !a.value.is_null())
            {
                return Err(Error::validation(format!("a drive task has no {}", a.field)));
            }
        }
        self.records.apply(&key, &assignments).await
    }

    pub async fn delete(&self, trip_id: &str, task_id: &str) -> Result<()> {
        self.records.delete(&Self::key(trip_id, task_id)?).await
    }
}
