use crate::chat;
use crate::config::{Config, RelayConfig};
use crate::domain::{assign_policy_ids, ChangeRecord};
use crate::errors::{ResultResp, ServerError};
use crate::relay::FlowClient;
use crate::responses::{apply_cors, html_response, json_response, preflight_response};
use crate::store::PolicyStore;
use crate::sync::SyncPipeline;
use crate::templates;
use astra::{Body, Request, ResponseBuilder};
use log::info;
use serde::Deserialize;
use serde_json::json;
use std::io::Read;
use std::sync::Mutex;

/// Serializes sync runs within this process: two concurrent triggers
/// would otherwise both observe the same "not yet present" ids and
/// insert them twice. Cross-process coordination stays with the store
/// owner.
static SYNC_LOCK: Mutex<()> = Mutex::new(());

#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
}

#[derive(Deserialize)]
struct PushRequest {
    metadata: ChangeRecord,
    #[serde(default)]
    policy_id: Option<u32>,
}

#[derive(Deserialize)]
struct FlowInput {
    input: String,
}

#[derive(Deserialize)]
struct ChatRequest {
    input: String,
    #[serde(default)]
    selected: Option<chat::SelectedPolicy>,
}

pub fn handle(mut req: Request, ctx: &AppContext) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    let resp = route(&mut req, ctx, &method, &path)?;
    Ok(apply_cors(resp, ctx.config.allowed_origin.as_deref()))
}

fn route(req: &mut Request, ctx: &AppContext, method: &str, path: &str) -> ResultResp {
    match (method, path) {
        ("OPTIONS", _) => preflight_response(ctx.config.allowed_origin.as_deref()),

        ("GET", "/") => html_response(templates::pages::dashboard_page()),
        ("GET", "/diagram") => html_response(templates::pages::diagram_page()),
        ("GET", "/static/main.css") => css_response(),

        ("GET", "/api/data") => get_data(ctx),
        ("POST", "/api/push-firewall") => push_firewall(req, ctx),
        ("POST", "/api/health-summary") => health_summary(req, ctx),
        ("POST", "/api/chat") => chat_route(req, ctx),
        ("POST", "/api/sync-servicenow") => sync_servicenow(ctx),

        ("GET", _) if path.starts_with("/api/policy/") => get_policy(ctx, path),

        _ => Err(ServerError::NotFound),
    }
}

fn store(ctx: &AppContext) -> Result<PolicyStore, ServerError> {
    let cfg = ctx
        .config
        .store
        .as_ref()
        .ok_or_else(|| ServerError::NotConfigured("Astra DB connection not configured".into()))?;
    Ok(PolicyStore::new(cfg))
}

fn relay(ctx: &AppContext) -> Result<(FlowClient, &RelayConfig), ServerError> {
    let cfg = ctx.config.relay.as_ref().ok_or_else(|| {
        ServerError::NotConfigured("LangFlow URL or API Key not configured".into())
    })?;
    Ok((FlowClient::new(cfg), cfg))
}

fn get_data(ctx: &AppContext) -> ResultResp {
    let documents = store(ctx)?.fetch_all()?;
    json_response(200, &assign_policy_ids(documents))
}

fn get_policy(ctx: &AppContext, path: &str) -> ResultResp {
    let raw = path.trim_start_matches("/api/policy/");
    let policy_id: usize = raw
        .parse()
        .map_err(|_| ServerError::BadRequest(format!("policy id must be a number: {raw}")))?;

    match store(ctx)?.find_by_position(policy_id)? {
        Some(policy) => json_response(200, &policy),
        None => Err(ServerError::NotFound),
    }
}

fn push_firewall(req: &mut Request, ctx: &AppContext) -> ResultResp {
    let (client, relay_cfg) = relay(ctx)?;
    let flow = relay_cfg
        .push_flow
        .as_deref()
        .ok_or_else(|| ServerError::NotConfigured("push flow not configured".into()))?;

    let body: PushRequest = read_json_body(req)?;
    info!("pushing change {} to firewall", body.metadata.u_change_id);

    let policy_id = body.policy_id.map(|id| id.to_string());
    let outcome = client.push_policy(flow, &body.metadata, policy_id.as_deref())?;

    json_response(
        200,
        &json!({
            "success": true,
            "message": outcome.message,
            "response": outcome.raw,
        }),
    )
}

fn health_summary(req: &mut Request, ctx: &AppContext) -> ResultResp {
    let (client, relay_cfg) = relay(ctx)?;
    let flow = relay_cfg
        .health_flow
        .as_deref()
        .ok_or_else(|| ServerError::NotConfigured("health summary flow not configured".into()))?;

    let body: FlowInput = read_json_body(req)?;
    let reply = client.converse(flow, &body.input)?;

    json_response(200, &json!({ "success": true, "message": reply }))
}

fn chat_route(req: &mut Request, ctx: &AppContext) -> ResultResp {
    // The widget is useless without the relay behind it, so an
    // unconfigured deployment answers 400 before interpreting anything.
    if ctx.config.relay.is_none() {
        return Err(ServerError::NotConfigured(
            "LangFlow URL or API Key not configured".into(),
        ));
    }

    let body: ChatRequest = read_json_body(req)?;
    let reply = chat::respond(&ctx.config, &body.input, body.selected.as_ref())?;

    json_response(200, &reply)
}

fn sync_servicenow(ctx: &AppContext) -> ResultResp {
    let pipeline = SyncPipeline::from_config(&ctx.config).map_err(ServerError::from)?;

    let guard = SYNC_LOCK.lock().map_err(|_| ServerError::InternalError)?;
    let report = pipeline.run().map_err(ServerError::from)?;
    drop(guard);

    let message = format!(
        "Sync complete: {} new of {} unique records",
        report.new_records_inserted, report.unique_records
    );

    let mut body = serde_json::to_value(&report).map_err(|_| ServerError::InternalError)?;
    body["success"] = json!(true);
    body["message"] = json!(message);

    json_response(200, &body)
}

fn css_response() -> ResultResp {
    let resp = ResponseBuilder::new()
        .status(200)
        .header("Content-Type", "text/css; charset=utf-8")
        .body(Body::from(include_str!("../assets/main.css").to_string()))
        .unwrap();

    Ok(resp)
}

fn read_json_body<T: serde::de::DeserializeOwned>(req: &mut Request) -> Result<T, ServerError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("failed to read request body: {e}")))?;

    serde_json::from_slice(&buf)
        .map_err(|e| ServerError::BadRequest(format!("invalid JSON body: {e}")))
}
