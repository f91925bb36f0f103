use lambda_http::{Body, Error, Request, Response};
use tracing::info;
use tripboard_common::entity::{NewTask, TaskService};
use tripboard_common::request::{parse_body, parse_object, path_param, resource_path};
use tripboard_common::response::{respond, route_not_found, Status, OK};
use tripboard_common::store::RecordStore;
use tripboard_common::Item;

async fn create_task<S: RecordStore>(
    tasks: &TaskService<S>,
    event: &Request,
) -> tripboard_common::Result<Item> {
    let trip_id = path_param(event, "tripId")?;
    let input: NewTask = parse_body(event)?;
    tasks.create(&trip_id, input).await
}

async fn list_tasks<S: RecordStore>(
    tasks: &TaskService<S>,
    event: &Request,
) -> tripboard_common::Result<Vec<Item>> {
    let trip_id = path_param(event, "tripId")?;
    tasks.list(&trip_id).await
}

async fn get_task<S: RecordStore>(
    tasks: &TaskService<S>,
    event: &Request,
) -> tripboard_common::Result<Item> {
    let trip_id = path_param(event, "tripId")?;
    let task_id = path_param(event, "taskId")?;
    tasks.get(&trip_id, &task_id).await
}

async fn update_task<S: RecordStore>(
    tasks: &TaskService<S>,
    event: &Request,
) -> tripboard_common::Result<Item> {
    let trip_id = path_param(event, "tripId")?;
    let task_id = path_param(event, "taskId")?;
    let input = parse_object(event)?;
    tasks.update(&trip_id, &task_id, &input).await
}

async fn delete_task<S: RecordStore>(
    tasks: &TaskService<S>,
    event: &Request,
) -> tripboard_common::Result<Status> {
    let trip_id = path_param(event, "tripId")?;
    let task_id = path_param(event, "taskId")?;
    tasks.delete(&trip_id, &task_id).await?;
    Ok(OK)
}

pub(crate) async fn function_handler<S: RecordStore>(
    tasks: &TaskService<S>,
    event: Request,
) -> Result<Response<Body>, Error> {
    let method = event.method().as_str();
    let resource = resource_path(&event);
    info!(method, ?resource, path = event.uri().path(), "tasks request");

    match (method, resource) {
        ("POST", Some("/tasks/{tripId}")) => respond(create_task(tasks, &event).await),
        ("GET", Some("/tasks/{tripId}")) => respond(list_tasks(tasks, &event).await),
        ("GET", Some("/tasks/{tripId}/{taskId}")) => respond(get_task(tasks, &event).await),
        ("PUT", Some("/tasks/{tripId}/{taskId}")) => respond(update_task(tasks, &event).await),
        ("DELETE", Some("/tasks/{tripId}/{taskId}")) => {
            respond(delete_task(tasks, &event).await)
        }
        _ => route_not_found(),
    }
}
