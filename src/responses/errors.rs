use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};
use serde_json::json;

/// Convert a ServerError into the `{success:false, error, details}`
/// envelope the frontend expects. Nothing here is fatal: a failed request
/// leaves the server ready for the next one.
pub fn error_to_response(err: ServerError) -> Response {
    let (status, label) = match &err {
        ServerError::NotFound => (404, "Not Found"),
        ServerError::BadRequest(_) => (400, "Bad Request"),
        ServerError::NotConfigured(_) => (400, "Not Configured"),
        ServerError::Upstream(_) => (500, "Upstream Error"),
        ServerError::StoreError(_) => (500, "Store Error"),
        ServerError::InternalError => (500, "Internal Server Error"),
    };

    let body = json!({
        "success": false,
        "error": label,
        "details": err.to_string(),
    });

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8")
        .body(Body::from(body.to_string()))
        .unwrap()
}
