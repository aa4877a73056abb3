use crate::errors::ResultResp;
use astra::{Body, Response, ResponseBuilder};
use serde::Serialize;

pub fn json_response<T: Serialize>(status: u16, value: &T) -> ResultResp {
    let body = serde_json::to_string(value).map_err(|_| crate::errors::ServerError::InternalError)?;

    let resp = ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8")
        .body(Body::from(body))
        .unwrap();

    Ok(resp)
}

/// Stamp the configured browser origin onto an outgoing response. The
/// original deployment served its SPA from a different host, so every
/// JSON answer needs the header.
pub fn apply_cors(mut resp: Response, allowed_origin: Option<&str>) -> Response {
    if let Some(origin) = allowed_origin {
        if let Ok(value) = origin.parse() {
            resp.headers_mut()
                .insert("Access-Control-Allow-Origin", value);
        }
    }
    resp
}

/// Answer an OPTIONS preflight for the JSON API.
pub fn preflight_response(allowed_origin: Option<&str>) -> ResultResp {
    let resp = ResponseBuilder::new()
        .status(204)
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::from(String::new()))
        .unwrap();

    Ok(apply_cors(resp, allowed_origin))
}
