use crate::errors::ServerError;
use crate::responses::error_to_response;
use crate::router::handle;
use crate::tests::utils::{
    expect_err, get, options, post_json, read_body, read_json, relay_ctx, unconfigured_ctx,
};
use serde_json::json;

#[test]
fn unknown_route_is_not_found() {
    let ctx = unconfigured_ctx();

    let err = expect_err(handle(get("/nowhere"), &ctx));
    assert!(matches!(err, ServerError::NotFound));

    let resp = error_to_response(err);
    assert_eq!(resp.status(), 404);
}

#[test]
fn dashboard_page_renders_the_shell() {
    let ctx = unconfigured_ctx();

    let mut resp = handle(get("/"), &ctx).unwrap();
    assert_eq!(resp.status(), 200);

    let body = read_body(&mut resp);
    assert!(body.contains("DFX"));
    assert!(body.contains("policy-table"));
    assert!(body.contains("FireBot"));
}

#[test]
fn diagram_and_stylesheet_are_served() {
    let ctx = unconfigured_ctx();

    let resp = handle(get("/diagram"), &ctx).unwrap();
    assert_eq!(resp.status(), 200);

    let resp = handle(get("/static/main.css"), &ctx).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["Content-Type"],
        "text/css; charset=utf-8"
    );
}

#[test]
fn preflight_carries_the_configured_origin() {
    let mut ctx = unconfigured_ctx();
    ctx.config.allowed_origin = Some("https://dfx.example.net".to_string());

    let resp = handle(options("/api/data"), &ctx).unwrap();
    assert_eq!(resp.status(), 204);
    assert_eq!(
        resp.headers()["Access-Control-Allow-Origin"],
        "https://dfx.example.net"
    );
}

#[test]
fn data_route_answers_400_without_a_store() {
    let ctx = unconfigured_ctx();

    let err = expect_err(handle(get("/api/data"), &ctx));
    assert!(matches!(err, ServerError::NotConfigured(_)));

    let mut resp = error_to_response(err);
    assert_eq!(resp.status(), 400);

    let body = read_json(&mut resp);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Not Configured"));
}

#[test]
fn push_route_answers_400_without_a_relay() {
    let ctx = unconfigured_ctx();

    let err = expect_err(handle(
        post_json("/api/push-firewall", json!({ "metadata": {} })),
        &ctx,
    ));
    assert!(matches!(err, ServerError::NotConfigured(_)));
}

#[test]
fn sync_route_answers_400_without_a_source() {
    let ctx = unconfigured_ctx();

    let err = expect_err(handle(post_json("/api/sync-servicenow", json!({})), &ctx));
    assert!(matches!(err, ServerError::NotConfigured(_)));
}

#[test]
fn health_summary_answers_400_without_a_relay() {
    let ctx = unconfigured_ctx();

    let err = expect_err(handle(
        post_json("/api/health-summary", json!({ "input": "how are we doing" })),
        &ctx,
    ));
    assert!(matches!(err, ServerError::NotConfigured(_)));
}

#[test]
fn push_route_rejects_a_malformed_body() {
    let ctx = relay_ctx();

    let err = expect_err(handle(
        post_json("/api/push-firewall", json!({ "nope": true })),
        &ctx,
    ));
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn policy_route_rejects_a_non_numeric_id() {
    let ctx = unconfigured_ctx();

    let err = expect_err(handle(get("/api/policy/abc"), &ctx));
    assert!(matches!(err, ServerError::BadRequest(_)));
}
