use serde::{Deserialize, Serialize};

use super::{require_id, to_item, Records};
use crate::config::CollectionConfig;
use crate::error::Result;
use crate::id::{new_id, now_millis};
use crate::item::{Item, RecordKey};
use crate::schema::{EntitySchema, Field, FieldKind};
use crate::store::RecordStore;

pub const COL_IDS: &str = "colIds";
pub const WISHLIST_IDS: &str = "wishlistIds";

pub static TRIP_SCHEMA: EntitySchema = EntitySchema {
    entity: "trip",
    partition_key: "ownerId",
    sort_key: "tripId",
    fields: &[
        Field::new("name", FieldKind::Text),
        Field::new("startDate", FieldKind::Text),
        Field::new("startTime", FieldKind::Text),
        Field::new("endDate", FieldKind::Text),
        Field::new("endTime", FieldKind::Text),
        Field::new("location", FieldKind::Text),
        Field::new("notes", FieldKind::Text),
        Field::new(COL_IDS, FieldKind::IdList),
        Field::new(WISHLIST_IDS, FieldKind::IdList),
    ],
};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub end_date: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub col_ids: Vec<String>,
    #[serde(default)]
    pub wishlist_ids: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TripRecord {
    owner_id: String,
    trip_id: String,
    #[serde(flatten)]
    fields: NewTrip,
    created_at: u64,
}

#[derive(Debug)]
pub struct TripService<S> {
    records: Records<S>,
}

impl<S: RecordStore> TripService<S> {
    pub fn new(store: S, collection: CollectionConfig) -> Self {
        Self {
            records: Records::new(store, collection, &TRIP_SCHEMA),
        }
    }

    fn key(owner_id: &str, trip_id: &str) -> Result<RecordKey> {
        require_id("ownerId", owner_id)?;
        require_id("tripId", trip_id)?;
        Ok(TRIP_SCHEMA.key(owner_id, trip_id))
    }

    pub async fn create(&self, owner_id: &str, input: NewTrip) -> Result<Item> {
        let key = Self::key(owner_id, &new_id(""))?;
        let item = to_item(&TripRecord {
            owner_id: key.partition.value.clone(),
            trip_id: key.sort.value.clone(),
            fields: input,
            created_at: now_millis(),
        })?;
        self.records.insert(&key, item.clone()).await?;
        Ok(item)
    }

    pub async fn get(&self, owner_id: &str, trip_id: &str) -> Result<Item> {
        self.records.get(&Self::key(owner_id, trip_id)?).await
    }

    pub async fn list(&self, owner_id: &str) -> Result<Vec<Item>> {
        require_id("ownerId", owner_id)?;
        self.records.list(owner_id).await
    }

    pub async fn update(&self, owner_id: &str, trip_id: &str, input: &Item) -> Result<Item> {
        self.records
            .update(&Self::key(owner_id, trip_id)?, input)
            .await
    }

    pub async fn append_col(&self, owner_id: &str, trip_id: &str, col_id: &str) -> Result<Item> {
        require_id("colId", col_id)?;
        self.records
            .append(&Self::key(owner_id, trip_id)?, COL_IDS, col_id.to_string())
            .await
    }

    pub async fn append_wishlist(
        &self,
        owner_id: &str,
        trip_id: &str,
        wishlist_id: &str,
    ) -> Result<Item> {
        require_id("wishlistId", wishlist_id)?;
        self.records
            .append(
                &Self::key(owner_id, trip_id)?,
                WISHLIST_IDS,
                wishlist_id.to_string(),
            )
            .await
    }

    pub async fn delete(&self, owner_id: &str, trip_id: &str) -> Result<()> {
        self.records.delete(&Self::key(owner_id, trip_id)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn service() -> TripService<MemoryStore> {
        TripService::new(MemoryStore::new(), CollectionConfig::new("trips"))
    }

    fn lisbon() -> NewTrip {
        NewTrip {
            name: Some("Lisbon".into()),
            start_date: Some("2026-05-01".into()),
            location: Some("Portugal".into()),
            notes: Some("pack light".into()),
            col_ids: vec!["c1".into()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_the_created_record() {
        let trips = service();
        let created = trips.create("owner-1", lisbon()).await.unwrap();

        assert_eq!(created["ownerId"], json!("owner-1"));
        assert_eq!(created["name"], json!("Lisbon"));
        assert_eq!(created["endDate"], json!(null));
        assert_eq!(created["wishlistIds"], json!([]));
        assert!(created["createdAt"].as_u64().unwrap() > 0);

        let trip_id = created["tripId"].as_str().unwrap();
        let fetched = trips.get("owner-1", trip_id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn partial_update_leaves_other_fields_alone() {
        let trips = service();
        let created = trips.create("owner-1", lisbon()).await.unwrap();
        let trip_id = created["tripId"].as_str().unwrap();

        let input = json!({"name": "Porto", "createdAt": 0, "tripId": "other"});
        let updated = trips
            .update("owner-1", trip_id, input.as_object().unwrap())
            .await
            .unwrap();

        assert_eq!(updated["name"], json!("Porto"));
        assert_eq!(updated["tripId"], created["tripId"]);
        assert_eq!(updated["createdAt"], created["createdAt"]);
        for field in ["startDate", "location", "notes", "colIds", "wishlistIds"] {
            assert_eq!(updated[field], created[field], "{field} changed");
        }
    }

    #[tokio::test]
    async fn update_without_fields_is_a_validation_error() {
        let trips = service();
        let created = trips.create("owner-1", lisbon()).await.unwrap();
        let trip_id = created["tripId"].as_str().unwrap();

        let err = trips
            .update("owner-1", trip_id, &Item::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn update_of_missing_trip_is_not_found() {
        let input = json!({"name": "Porto"});
        let err = service()
            .update("owner-1", "nope", input.as_object().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let trips = service();
        let created = trips.create("owner-1", lisbon()).await.unwrap();
        let trip_id = created["tripId"].as_str().unwrap();

        trips.delete("owner-1", trip_id).await.unwrap();
        trips.delete("owner-1", trip_id).await.unwrap();
        let err = trips.get("owner-1", trip_id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn list_is_scoped_to_owner_and_empty_is_ok() {
        let trips = service();
        trips.create("owner-1", lisbon()).await.unwrap();
        trips.create("owner-1", NewTrip::default()).await.unwrap();

        assert_eq!(trips.list("owner-1").await.unwrap().len(), 2);
        assert!(trips.list("owner-2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn appends_extend_id_lists() {
        let trips = service();
        let created = trips.create("owner-1", lisbon()).await.unwrap();
        let trip_id = created["tripId"].as_str().unwrap();

        trips.append_col("owner-1", trip_id, "c2").await.unwrap();
        let trip = trips.append_wishlist("owner-1", trip_id, "w1").await.unwrap();
        assert_eq!(trip["colIds"], json!(["c1", "c2"]));
        assert_eq!(trip["wishlistIds"], json!(["w1"]));
    }

    #[tokio::test]
    async fn missing_owner_is_rejected() {
        let err = service().create("", lisbon()).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
