use lambda_http::{run, service_fn, tracing, Error};
use tripboard_common::entity::TaskService;
use tripboard_common::store::DynamoStore;
use tripboard_common::CollectionConfig;
mod http_handler;
use http_handler::function_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let client = aws_sdk_dynamodb::Client::new(&config);
    let tasks_table = CollectionConfig::from_env("TASKS_TABLE")?;
    let tasks = TaskService::new(DynamoStore::new(client), tasks_table);

    run(service_fn(|event| function_handler(&tasks, event))).await
}
