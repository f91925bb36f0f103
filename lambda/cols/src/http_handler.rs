use lambda_http::{Body, Error, Request, Response};
use serde::Deserialize;
use tracing::info;
use tripboard_common::entity::{ColService, NewCol};
use tripboard_common::request::{parse_body, parse_object, path_param, resource_path};
use tripboard_common::response::{respond, route_not_found, Status, OK};
use tripboard_common::store::RecordStore;
use tripboard_common::Item;

#[derive(Deserialize)]
struct AppendTaskRequest {
    #[serde(rename = "taskId")]
    task_id: String,
}

async fn create_col<S: RecordStore>(
    cols: &ColService<S>,
    event: &Request,
) -> tripboard_common::Result<Item> {
    let trip_id = path_param(event, "tripId")?;
    let input: NewCol = parse_body(event)?;
    cols.create(&trip_id, input).await
}

async fn list_cols<S: RecordStore>(
    cols: &ColService<S>,
    event: &Request,
) -> tripboard_common::Result<Vec<Item>> {
    let trip_id = path_param(event, "tripId")?;
    cols.list(&trip_id).await
}

async fn get_col<S: RecordStore>(
    cols: &ColService<S>,
    event: &Request,
) -> tripboard_common::Result<Item> {
    let trip_id = path_param(event, "tripId")?;
    let col_id = path_param(event, "colId")?;
    cols.get(&trip_id, &col_id).await
}

async fn update_col<S: RecordStore>(
    cols: &ColService<S>,
    event: &Request,
) -> tripboard_common::Result<Item> {
    let trip_id = path_param(event, "tripId")?;
    let col_id = path_param(event, "colId")?;
    let input = parse_object(event)?;
    cols.update(&trip_id, &col_id, &input).await
}

async fn delete_col<S: RecordStore>(
    cols: &ColService<S>,
    event: &Request,
) -> tripboard_common::Result<Status> {
    let trip_id = path_param(event, "tripId")?;
    let col_id = path_param(event, "colId")?;
    cols.delete(&trip_id, &col_id).await?;
    Ok(OK)
}

async fn append_task<S: RecordStore>(
    cols: &ColService<S>,
    event: &Request,
) -> tripboard_common::Result<Status> {
    let trip_id = path_param(event, "tripId")?;
    let col_id = path_param(event, "colId")?;
    let req: AppendTaskRequest = parse_body(event)?;
    cols.append_task(&trip_id, &col_id, &req.task_id).await?;
    Ok(OK)
}

pub(crate) async fn function_handler<S: RecordStore>(
    cols: &ColService<S>,
    event: Request,
) -> Result<Response<Body>, Error> {
    let method = event.method().as_str();
    let resource = resource_path(&event);
    info!(method, ?resource, path = event.uri().path(), "cols request");

    match (method, resource) {
        ("POST", Some("/cols/{tripId}")) => respond(create_col(cols, &event).await),
        ("GET", Some("/cols/{tripId}")) => respond(list_cols(cols, &event).await),
        ("GET", Some("/cols/{tripId}/{colId}")) => respond(get_col(cols, &event).await),
        ("PUT", Some("/cols/{tripId}/{colId}")) => respond(update_col(cols, &event).await),
        ("DELETE", Some("/cols/{tripId}/{colId}")) => respond(delete_col(cols, &event).await),
        ("POST", Some("/cols/{tripId}/{colId}/taskIds")) => {
            respond(append_task(cols, &event).await)
        }
        _ => route_not_found(),
    }
}
