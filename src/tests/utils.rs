use crate::config::{Config, RelayConfig, StoreConfig};
use crate::router::AppContext;
use astra::{Body, Request, Response};
use std::io::Read;

/// Context with nothing configured: exercises the NotConfigured paths
/// and the pure routes without touching the network.
pub fn unconfigured_ctx() -> AppContext {
    AppContext {
        config: Config::unconfigured(),
    }
}

/// Context with a relay wired up (unreachable host, which is fine for
/// chat branches that never leave the process).
pub fn relay_ctx() -> AppContext {
    let mut config = Config::unconfigured();
    config.relay = Some(RelayConfig {
        base_url: "http://langflow.invalid".to_string(),
        api_key: "test-key".to_string(),
        push_flow: Some("push-flow".to_string()),
        chat_flow: Some("chat-flow".to_string()),
        health_flow: Some("health-flow".to_string()),
        chat_input_node: "ChatInput-Gksmq".to_string(),
    });
    AppContext { config }
}

/// Context with only the store group present (also unreachable).
pub fn store_ctx() -> AppContext {
    let mut config = Config::unconfigured();
    config.store = Some(StoreConfig {
        token: "AstraCS:test".to_string(),
        endpoint: "http://astra.invalid".to_string(),
        keyspace: "default_keyspace".to_string(),
    });
    AppContext { config }
}

pub fn get(path: &str) -> Request {
    http::Request::builder()
        .method(http::Method::GET)
        .uri(path)
        .body(Body::from(String::new()))
        .unwrap()
}

pub fn options(path: &str) -> Request {
    http::Request::builder()
        .method(http::Method::OPTIONS)
        .uri(path)
        .body(Body::from(String::new()))
        .unwrap()
}

pub fn post_json(path: &str, body: serde_json::Value) -> Request {
    http::Request::builder()
        .method(http::Method::POST)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Unwrap the error arm of a handler result.
pub fn expect_err(result: crate::errors::ResultResp) -> crate::errors::ServerError {
    match result {
        Err(err) => err,
        Ok(resp) => panic!("expected an error response, got HTTP {}", resp.status()),
    }
}

pub fn read_body(resp: &mut Response) -> String {
    let mut bytes = Vec::new();
    resp.body_mut()
        .reader()
        .read_to_end(&mut bytes)
        .expect("response body should be readable");
    String::from_utf8(bytes).expect("response body should be utf-8")
}

pub fn read_json(resp: &mut Response) -> serde_json::Value {
    serde_json::from_str(&read_body(resp)).expect("response body should be JSON")
}
