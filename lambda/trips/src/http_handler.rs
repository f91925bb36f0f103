use lambda_http::{Body, Error, Request, Response};
use serde::Deserialize;
use tracing::info;
use tripboard_common::entity::{NewTrip, TripService};
use tripboard_common::request::{
    caller_identity, parse_body, parse_object, path_param, resource_path,
};
use tripboard_common::response::{failure, respond, route_not_found, Status, OK};
use tripboard_common::store::RecordStore;
use tripboard_common::Item;

#[derive(Deserialize)]
struct AppendColRequest {
    #[serde(rename = "colId")]
    col_id: String,
}

#[derive(Deserialize)]
struct AppendWishlistRequest {
    #[serde(rename = "wishlistId")]
    wishlist_id: String,
}

async fn create_trip<S: RecordStore>(
    trips: &TripService<S>,
    owner_id: &str,
    event: &Request,
) -> tripboard_common::Result<Item> {
    let input: NewTrip = parse_body(event)?;
    trips.create(owner_id, input).await
}

async fn get_trip<S: RecordStore>(
    trips: &TripService<S>,
    owner_id: &str,
    event: &Request,
) -> tripboard_common::Result<Item> {
    let trip_id = path_param(event, "tripId")?;
    trips.get(owner_id, &trip_id).await
}

async fn update_trip<S: RecordStore>(
    trips: &TripService<S>,
    owner_id: &str,
    event: &Request,
) -> tripboard_common::Result<Item> {
    let trip_id = path_param(event, "tripId")?;
    let input = parse_object(event)?;
    trips.update(owner_id, &trip_id, &input).await
}

async fn delete_trip<S: RecordStore>(
    trips: &TripService<S>,
    owner_id: &str,
    event: &Request,
) -> tripboard_common::Result<Status> {
    let trip_id = path_param(event, "tripId")?;
    trips.delete(owner_id, &trip_id).await?;
    Ok(OK)
}

async fn append_col<S: RecordStore>(
    trips: &TripService<S>,
    owner_id: &str,
    event: &Request,
) -> tripboard_common::Result<Status> {
    let trip_id = path_param(event, "tripId")?;
    let req: AppendColRequest = parse_body(event)?;
    trips.append_col(owner_id, &trip_id, &req.col_id).await?;
    Ok(OK)
}

async fn append_wishlist<S: RecordStore>(
    trips: &TripService<S>,
    owner_id: &str,
    event: &Request,
) -> tripboard_common::Result<Status> {
    let trip_id = path_param(event, "tripId")?;
    let req: AppendWishlistRequest = parse_body(event)?;
    trips
        .append_wishlist(owner_id, &trip_id, &req.wishlist_id)
        .await?;
    Ok(OK)
}

pub(crate) async fn function_handler<S: RecordStore>(
    trips: &TripService<S>,
    event: Request,
) -> Result<Response<Body>, Error> {
    let method = event.method().as_str();
    let resource = resource_path(&event);
    info!(method, ?resource, path = event.uri().path(), "trips request");

    let owner_id = match caller_identity(&event) {
        Ok(id) => id,
        Err(e) => return failure(&e),
    };

    match (method, resource) {
        ("POST", Some("/trips")) => respond(create_trip(trips, &owner_id, &event).await),
        ("GET", Some("/trips")) => respond(trips.list(&owner_id).await),
        ("GET", Some("/trips/{tripId}")) => respond(get_trip(trips, &owner_id, &event).await),
        ("PUT", Some("/trips/{tripId}")) => {
            respond(update_trip(trips, &owner_id, &event).await)
        }
        ("DELETE", Some("/trips/{tripId}")) => {
            respond(delete_trip(trips, &owner_id, &event).await)
        }
        ("POST", Some("/trips/{tripId}/colIds")) => {
            respond(append_col(trips, &owner_id, &event).await)
        }
        ("POST", Some("/trips/{tripId}/wishlistIds")) => {
            respond(append_wishlist(trips, &owner_id, &event).await)
        }
        _ => route_not_found(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tripboard_common::store::MemoryStore;
    use tripboard_common::testing::RestEvent;
    use tripboard_common::CollectionConfig;

    fn service() -> TripService<MemoryStore> {
        TripService::new(MemoryStore::new(), CollectionConfig::new("trips"))
    }

    fn trips_event(method: &str, resource: &str) -> RestEvent {
        RestEvent::new(method, resource).identity("owner-1")
    }

    fn trip_event(method: &str, resource: &str, trip_id: &str) -> RestEvent {
        trips_event(method, resource).param("tripId", trip_id)
    }

    async fn call(trips: &TripService<MemoryStore>, event: RestEvent) -> (u16, Value) {
        let response = function_handler(trips, event.build()).await.unwrap();
        let body = serde_json::from_slice(response.body().as_ref()).unwrap();
        (response.status().as_u16(), body)
    }

    #[tokio::test]
    async fn staged_rest_events_are_routed() {
        let trips = service();
        let event = trips_event("POST", "/trips").body(json!({"name": "Lisbon"}));
        assert!(event.clone().build().uri().path().starts_with("/prod/"));

        let (status, created) = call(&trips, event).await;
        assert_eq!(status, 200);
        assert_eq!(created["ownerId"], json!("owner-1"));
    }

    #[tokio::test]
    async fn create_get_update_delete() {
        let trips = service();
        let (status, created) = call(
            &trips,
            trips_event("POST", "/trips").body(json!({"name": "Lisbon", "notes": "n"})),
        )
        .await;
        assert_eq!(status, 200);
        let trip_id = created["tripId"].as_str().unwrap();

        let (status, fetched) = call(&trips, trip_event("GET", "/trips/{tripId}", trip_id)).await;
        assert_eq!(status, 200);
        assert_eq!(fetched, created);

        let (status, updated) = call(
            &trips,
            trip_event("PUT", "/trips/{tripId}", trip_id).body(json!({"name": "Porto"})),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(updated["name"], json!("Porto"));
        assert_eq!(updated["notes"], json!("n"));

        for _ in 0..2 {
            let (status, body) =
                call(&trips, trip_event("DELETE", "/trips/{tripId}", trip_id)).await;
            assert_eq!((status, body), (200, json!({"status": true})));
        }

        let (status, body) = call(&trips, trip_event("GET", "/trips/{tripId}", trip_id)).await;
        assert_eq!(status, 404);
        assert_eq!(body["status"], json!(false));
    }

    #[tokio::test]
    async fn empty_list_is_success() {
        let (status, body) = call(&service(), trips_event("GET", "/trips")).await;
        assert_eq!((status, body), (200, json!([])));
    }

    #[tokio::test]
    async fn empty_update_is_bad_request() {
        let trips = service();
        let (_, created) = call(&trips, trips_event("POST", "/trips").body(json!({}))).await;
        let trip_id = created["tripId"].as_str().unwrap();

        let (status, body) = call(
            &trips,
            trip_event("PUT", "/trips/{tripId}", trip_id).body(json!({"createdAt": 1})),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["status"], json!(false));
    }

    #[tokio::test]
    async fn append_col_and_wishlist_ids() {
        let trips = service();
        let (_, created) = call(&trips, trips_event("POST", "/trips").body(json!({}))).await;
        let trip_id = created["tripId"].as_str().unwrap();

        let (status, _) = call(
            &trips,
            trip_event("POST", "/trips/{tripId}/colIds", trip_id).body(json!({"colId": "c1"})),
        )
        .await;
        assert_eq!(status, 200);
        let (status, _) = call(
            &trips,
            trip_event("POST", "/trips/{tripId}/wishlistIds", trip_id)
                .body(json!({"wishlistId": "w1"})),
        )
        .await;
        assert_eq!(status, 200);

        let (_, trip) = call(&trips, trip_event("GET", "/trips/{tripId}", trip_id)).await;
        assert_eq!(trip["colIds"], json!(["c1"]));
        assert_eq!(trip["wishlistIds"], json!(["w1"]));
    }

    #[tokio::test]
    async fn request_without_identity_is_rejected() {
        let (status, body) = call(&service(), RestEvent::new("GET", "/trips")).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], json!("missing caller identity"));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, _) = call(&service(), trips_event("PATCH", "/trips")).await;
        assert_eq!(status, 404);
    }
}
