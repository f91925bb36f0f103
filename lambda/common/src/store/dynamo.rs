use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use base64::{engine::general_purpose, Engine as _};
use serde_json::{Map, Number, Value};
use tracing::debug;

use super::RecordStore;
use crate::error::{Error, Result};
use crate::item::{Item, KeyAttr, RecordKey};
use crate::update::Assignment;

type AttributeMap = HashMap<String, AttributeValue>;

#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
}

impl DynamoStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn key_map(key: &RecordKey) -> AttributeMap {
    let mut map = HashMap::new();
    map.insert(
        key.partition.name.to_string(),
        AttributeValue::S(key.partition.value.clone()),
    );
    map.insert(
        key.sort.name.to_string(),
        AttributeValue::S(key.sort.value.clone()),
    );
    map
}

fn store_err(op: &str, err: impl std::error::Error) -> Error {
    Error::store(format!("DynamoDB {op} failed: {}", DisplayErrorContext(err)))
}

fn missing(collection: &str, key: &RecordKey) -> Error {
    Error::not_found(format!("no record in {collection} for {key}"))
}

pub(crate) fn to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(to_attribute).collect()),
        Value::Object(fields) => AttributeValue::M(to_attribute_map(fields)),
    }
}

pub(crate) fn to_attribute_map(item: &Item) -> AttributeMap {
    item.iter()
        .map(|(name, value)| (name.clone(), to_attribute(value)))
        .collect()
}

fn number(n: &str) -> Value {
    if let Ok(i) = n.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(u) = n.parse::<u64>() {
        return Value::Number(u.into());
    }
    n.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(n.to_string()))
}

fn blob(b: &Blob) -> Value {
    Value::String(general_purpose::STANDARD.encode(b.as_ref()))
}

pub(crate) fn from_attribute(attr: &AttributeValue) -> Value {
    match attr {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::N(n) => number(n),
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::B(b) => blob(b),
        AttributeValue::L(values) => Value::Array(values.iter().map(from_attribute).collect()),
        AttributeValue::M(fields) => Value::Object(from_attribute_map(fields)),
        AttributeValue::Ss(values) => {
            Value::Array(values.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(values) => Value::Array(values.iter().map(|n| number(n)).collect()),
        AttributeValue::Bs(values) => Value::Array(values.iter().map(blob).collect()),
        _ => Value::Null,
    }
}

pub(crate) fn from_attribute_map(map: &AttributeMap) -> Item {
    map.iter()
        .map(|(name, attr)| (name.clone(), from_attribute(attr)))
        .collect::<Map<String, Value>>()
}

#[async_trait]
impl RecordStore for DynamoStore {
    async fn put(&self, collection: &str, key: &RecordKey, mut item: Item) -> Result<()> {
        debug!(collection, %key, "PutItem");
        key.write_into(&mut item);
        self.client
            .put_item()
            .table_name(collection)
            .set_item(Some(to_attribute_map(&item)))
            .send()
            .await
            .map_err(|e| store_err("PutItem", e))?;
        Ok(())
    }

    async fn get(&self, collection: &str, key: &RecordKey) -> Result<Option<Item>> {
        debug!(collection, %key, "GetItem");
        let result = self
            .client
            .get_item()
            .table_name(collection)
            .set_key(Some(key_map(key)))
            .send()
            .await
            .map_err(|e| store_err("GetItem", e))?;
        Ok(result.item().map(from_attribute_map))
    }

    async fn update(
        &self,
        collection: &str,
        key: &RecordKey,
        assignments: &[Assignment],
    ) -> Result<Item> {
        debug!(collection, %key, fields = assignments.len(), "UpdateItem");
        // Placeholders for every name: `name`, `duration` and friends are reserved words.
        let expression = assignments
            .iter()
            .enumerate()
            .map(|(i, _)| format!("#f{i} = :v{i}"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut request = self
            .client
            .update_item()
            .table_name(collection)
            .set_key(Some(key_map(key)))
            .update_expression(format!("SET {expression}"))
            .condition_expression("attribute_exists(#pk)")
            .expression_attribute_names("#pk", key.partition.name)
            .return_values(ReturnValue::AllNew);
        for (i, assignment) in assignments.iter().enumerate() {
            request = request
                .expression_attribute_names(format!("#f{i}"), assignment.field)
                .expression_attribute_values(format!(":v{i}"), to_attribute(&assignment.value));
        }

        match request.send().await {
            Ok(output) => Ok(output
                .attributes()
                .map(from_attribute_map)
                .unwrap_or_default()),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                Err(missing(collection, key))
            }
            Err(e) => Err(store_err("UpdateItem", e)),
        }
    }

    async fn append(
        &self,
        collection: &str,
        key: &RecordKey,
        field: &str,
        values: Vec<Value>,
    ) -> Result<Item> {
        debug!(collection, %key, field, count = values.len(), "UpdateItem list_append");
        let result = self
            .client
            .update_item()
            .table_name(collection)
            .set_key(Some(key_map(key)))
            .update_expression("SET #f = list_append(if_not_exists(#f, :empty), :values)")
            .condition_expression("attribute_exists(#pk)")
            .expression_attribute_names("#pk", key.partition.name)
            .expression_attribute_names("#f", field)
            .expression_attribute_values(":empty", AttributeValue::L(Vec::new()))
            .expression_attribute_values(
                ":values",
                AttributeValue::L(values.iter().map(to_attribute).collect()),
            )
            .return_values(ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => Ok(output
                .attributes()
                .map(from_attribute_map)
                .unwrap_or_default()),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                Err(missing(collection, key))
            }
            Err(e) => Err(store_err("UpdateItem", e)),
        }
    }

    async fn query(&self, collection: &str, partition: &KeyAttr) -> Result<Vec<Item>> {
        debug!(collection, partition = %partition.value, "Query");
        let mut items = Vec::new();
        let mut last_evaluated_key = None;

        loop {
            let mut request = self
                .client
                .query()
                .table_name(collection)
                .key_condition_expression("#pk = :pk")
                .expression_attribute_names("#pk", partition.name)
                .expression_attribute_values(":pk", AttributeValue::S(partition.value.clone()));
            if let Some(start) = last_evaluated_key.take() {
                request = request.set_exclusive_start_key(Some(start));
            }

            let output = request.send().await.map_err(|e| store_err("Query", e))?;
            items.extend(output.items().iter().map(from_attribute_map));

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => last_evaluated_key = Some(key.clone()),
                _ => break,
            }
        }

        Ok(items)
    }

    async fn delete(&self, collection: &str, key: &RecordKey) -> Result<()> {
        debug!(collection, %key, "DeleteItem");
        self.client
            .delete_item()
            .table_name(collection)
            .set_key(Some(key_map(key)))
            .send()
            .await
            .map_err(|e| store_err("DeleteItem", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_values_map_onto_attributes() {
        let item = json!({
            "name": "Museum",
            "duration": 30,
            "notes": null,
            "taskIds": ["a", "b"],
            "lodging": {"nights": 2, "paid": true}
        });
        let attrs = to_attribute_map(item.as_object().unwrap());
        assert_eq!(attrs["name"], AttributeValue::S("Museum".into()));
        assert_eq!(attrs["duration"], AttributeValue::N("30".into()));
        assert_eq!(attrs["notes"], AttributeValue::Null(true));
        assert_eq!(
            attrs["taskIds"],
            AttributeValue::L(vec![
                AttributeValue::S("a".into()),
                AttributeValue::S("b".into())
            ])
        );
        assert_eq!(Value::Object(from_attribute_map(&attrs)), item);
    }

    #[test]
    fn numbers_keep_their_shape() {
        assert_eq!(from_attribute(&AttributeValue::N("-4".into())), json!(-4));
        assert_eq!(from_attribute(&AttributeValue::N("1.5".into())), json!(1.5));
        assert_eq!(
            from_attribute(&AttributeValue::N("18446744073709551615".into())),
            json!(u64::MAX)
        );
    }

    #[test]
    fn sets_and_binaries_become_arrays_and_base64() {
        let ss = AttributeValue::Ss(vec!["x".into(), "y".into()]);
        assert_eq!(from_attribute(&ss), json!(["x", "y"]));
        let b = AttributeValue::B(Blob::new(b"hi".to_vec()));
        assert_eq!(from_attribute(&b), json!("aGk="));
    }
}
