//! Uniform response envelope: 200 with the JSON payload on success,
//! `{status: false, error}` with the error's status code on failure.

use lambda_http::{Body, Error as LambdaError, Response};
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Status {
    pub status: bool,
}

pub const OK: Status = Status { status: true };

fn envelope(status: u16, body: String) -> Result<Response<Body>, LambdaError> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Credentials", "true")
        .body(Body::Text(body))?)
}

pub fn success<T: Serialize>(payload: &T) -> Result<Response<Body>, LambdaError> {
    envelope(200, serde_json::to_string(payload)?)
}

pub fn failure(err: &Error) -> Result<Response<Body>, LambdaError> {
    match err {
        Error::Store(_) => error!(error = %err, "request failed"),
        _ => warn!(error = %err, "request rejected"),
    }
    let body = json!({ "status": false, "error": err.to_string() });
    envelope(err.status_code(), body.to_string())
}

pub fn respond<T: Serialize>(result: Result<T>) -> Result<Response<Body>, LambdaError> {
    match result {
        Ok(payload) => success(&payload),
        Err(err) => failure(&err),
    }
}

pub fn route_not_found() -> Result<Response<Body>, LambdaError> {
    let body = json!({ "status": false, "error": "Not found" });
    envelope(404, body.to_string())
}
