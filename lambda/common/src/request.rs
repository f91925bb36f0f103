use lambda_http::request::RequestContext;
use lambda_http::{Request, RequestExt};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::item::Item;

pub fn caller_identity(event: &Request) -> Result<String> {
    let identity = match event.request_context_ref() {
        Some(RequestContext::ApiGatewayV1(ctx)) => ctx.identity.cognito_identity_id.clone(),
        _ => None,
    };
    identity
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::validation("missing caller identity"))
}

/// Route template API Gateway matched, e.g. `/trips/{tripId}`. Unlike the
/// request uri it never carries the stage name.
pub fn resource_path(event: &Request) -> Option<&str> {
    match event.request_context_ref() {
        Some(RequestContext::ApiGatewayV1(ctx)) => ctx.resource_path.as_deref(),
        _ => None,
    }
}

pub fn path_param(event: &Request, name: &str) -> Result<String> {
    event
        .path_parameters_ref()
        .and_then(|params| params.first(name))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::validation(format!("missing {name}")))
}

/// Deserializes the JSON body. An empty body reads as `{}`.
pub fn parse_body<T: DeserializeOwned>(event: &Request) -> Result<T> {
    let body: &[u8] = event.body().as_ref();
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|e| Error::validation(format!("Invalid JSON: {e}")))
}

pub fn parse_object(event: &Request) -> Result<Item> {
    parse_body(event)
}
