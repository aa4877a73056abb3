use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{expect_err, post_json, read_json, relay_ctx, store_ctx, unconfigured_ctx};
use serde_json::json;

fn chat(input: &str) -> serde_json::Value {
    json!({ "input": input })
}

#[test]
fn chat_answers_400_without_a_relay() {
    let ctx = unconfigured_ctx();

    let err = expect_err(handle(post_json("/api/chat", chat("hello")), &ctx));
    assert!(matches!(err, ServerError::NotConfigured(_)));
}

#[test]
fn sync_status_is_answered_without_a_backend_call() {
    let ctx = relay_ctx();

    let mut resp = handle(post_json("/api/chat", chat("what's the sync status?")), &ctx).unwrap();
    assert_eq!(resp.status(), 200);

    let body = read_json(&mut resp);
    assert_eq!(body["success"], json!(true));
    assert!(body["message"].as_str().unwrap().contains("sync"));
}

#[test]
fn change_modeling_echoes_the_change_id() {
    let ctx = relay_ctx();

    let mut resp = handle(
        post_json("/api/chat", chat("please model change CHG0040012")),
        &ctx,
    )
    .unwrap();
    let body = read_json(&mut resp);

    assert_eq!(body["success"], json!(true));
    assert!(body["message"].as_str().unwrap().contains("CHG0040012"));
}

#[test]
fn change_modeling_asks_for_an_id_when_none_is_given() {
    let ctx = relay_ctx();

    let mut resp = handle(post_json("/api/chat", chat("validate the change")), &ctx).unwrap();
    let body = read_json(&mut resp);

    assert!(body["message"].as_str().unwrap().contains("change id"));
}

#[test]
fn push_without_a_selected_row_returns_guidance() {
    let ctx = relay_ctx();

    let mut resp = handle(post_json("/api/chat", chat("push 101")), &ctx).unwrap();
    let body = read_json(&mut resp);

    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap().contains("Select a policy row"));
}

#[test]
fn branch_diagram_requests_carry_an_open_url() {
    let ctx = relay_ctx();

    let mut resp = handle(post_json("/api/chat", chat("show branch diagram")), &ctx).unwrap();
    let body = read_json(&mut resp);

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["open_url"], json!("/diagram"));
}

#[test]
fn policy_details_report_a_fetch_error_when_the_store_is_down() {
    // relay present (the route requires it), store absent
    let ctx = relay_ctx();

    let mut resp = handle(
        post_json("/api/chat", chat("show me the policy details of 3")),
        &ctx,
    )
    .unwrap();
    let body = read_json(&mut resp);

    assert_eq!(body["success"], json!(false));
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Failed to fetch policy details"));
}

#[test]
fn selected_rows_ride_along_with_the_chat_turn() {
    // An unreachable relay host: the push attempt fails downstream but
    // the reply must still name the resolved id, not apologize.
    let mut ctx = relay_ctx();
    ctx.config.store = store_ctx().config.store;

    let mut resp = handle(
        post_json(
            "/api/chat",
            json!({
                "input": "push 101",
                "selected": {
                    "policy_id": 7,
                    "metadata": { "u_change_id": "CHG0001" }
                }
            }),
        ),
        &ctx,
    )
    .unwrap();
    let body = read_json(&mut resp);

    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap().contains("101"));
}
