//! API Gateway REST events for handler tests, deserialized through the same
//! path the runtime uses so stage prefixes and path parameters are real.

use lambda_http::Request;
use serde_json::{json, Map, Value};

pub const STAGE: &str = "prod";

#[derive(Debug, Clone)]
pub struct RestEvent {
    method: String,
    resource: String,
    params: Map<String, Value>,
    identity: Option<String>,
    body: Option<String>,
}

impl RestEvent {
    pub fn new(method: &str, resource: &str) -> Self {
        Self {
            method: method.to_string(),
            resource: resource.to_string(),
            params: Map::new(),
            identity: None,
            body: None,
        }
    }

    pub fn param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), json!(value));
        self
    }

    pub fn identity(mut self, cognito_identity_id: &str) -> Self {
        self.identity = Some(cognito_identity_id.to_string());
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body.to_string());
        self
    }

    pub fn build(self) -> Request {
        let mut path = self.resource.clone();
        for (name, value) in &self.params {
            path = path.replace(&format!("{{{name}}}"), value.as_str().unwrap_or_default());
        }
        let event = json!({
            "resource": self.resource,
            "path": path,
            "httpMethod": self.method,
            "headers": {"content-type": "application/json"},
            "pathParameters": self.params,
            "requestContext": {
                "stage": STAGE,
                "httpMethod": self.method,
                "resourcePath": self.resource,
                "path": format!("/{STAGE}{path}"),
                "identity": {"cognitoIdentityId": self.identity},
            },
            "body": self.body,
            "isBase64Encoded": false,
        });
        lambda_http::request::from_str(&event.to_string()).expect("valid API Gateway REST event")
    }
}
