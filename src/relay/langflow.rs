use crate::config::RelayConfig;
use crate::domain::ChangeRecord;
use crate::errors::ServerError;
use crate::relay::extract;
use log::debug;
use reqwest::blocking::Client;
use serde_json::{json, Value};
use uuid::Uuid;

pub struct PushOutcome {
    pub message: String,
    pub raw: Value,
}

/// Client for the LangFlow automation endpoint. All flows share one
/// envelope shape; only the target flow, the output type and the value
/// dropped on the chat-input node differ per call.
pub struct FlowClient {
    client: Client,
    base_url: String,
    api_key: String,
    chat_input_node: String,
}

impl FlowClient {
    pub fn new(cfg: &RelayConfig) -> FlowClient {
        FlowClient {
            client: Client::new(),
            base_url: cfg.base_url.clone(),
            api_key: cfg.api_key.clone(),
            chat_input_node: cfg.chat_input_node.clone(),
        }
    }

    fn run_url(&self, flow_id: &str) -> String {
        format!("{}/api/v1/run/{}", self.base_url, flow_id)
    }

    fn run_flow(
        &self,
        flow_id: &str,
        output_type: &str,
        input_value: String,
    ) -> Result<Value, ServerError> {
        let mut tweaks = serde_json::Map::new();
        tweaks.insert(
            self.chat_input_node.clone(),
            json!({ "input_value": input_value }),
        );

        let payload = json!({
            "input_type": "chat",
            "output_type": output_type,
            "tweaks": tweaks,
            "session_id": Uuid::new_v4().to_string(),
        });

        debug!("LangFlow payload for flow {flow_id}: {payload}");

        let resp = self
            .client
            .post(self.run_url(flow_id))
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .json(&payload)
            .send()
            .map_err(|e| ServerError::Upstream(format!("LangFlow request failed: {e}")))?;

        let status = resp.status();
        let body: Value = resp.json().map_err(|e| {
            ServerError::Upstream(format!("LangFlow returned non-JSON (HTTP {status}): {e}"))
        })?;

        if !status.is_success() {
            return Err(ServerError::Upstream(format!(
                "LangFlow HTTP {status}: {body}"
            )));
        }

        Ok(body)
    }

    /// Forward an approved policy to the firewall flow. The record rides
    /// the chat-input node as a JSON string, the way the flow's Firewall
    /// API Generator expects it.
    pub fn push_policy(
        &self,
        flow_id: &str,
        metadata: &ChangeRecord,
        policy_id: Option<&str>,
    ) -> Result<PushOutcome, ServerError> {
        let input_value = push_input_value(metadata, policy_id).to_string();

        let raw = self.run_flow(flow_id, "text", input_value)?;

        Ok(PushOutcome {
            message: "Policy pushed successfully to firewall".to_string(),
            raw,
        })
    }

    /// One conversational turn against a flow. Always produces some
    /// text: unrecognized response shapes degrade to the fixed
    /// placeholder instead of failing.
    pub fn converse(&self, flow_id: &str, input: &str) -> Result<String, ServerError> {
        let raw = self.run_flow(flow_id, "chat", input.to_string())?;
        Ok(extract::reply_or_fallback(&raw))
    }
}

/// What lands on the chat-input node for a push. The table UI pushes a
/// bare record; the chat path also carries the resolved policy id.
fn push_input_value(metadata: &ChangeRecord, policy_id: Option<&str>) -> Value {
    let mut body = json!({
        "metadata_json": metadata,
        "push_to_firewall": true,
    });
    if let Some(id) = policy_id {
        body["policyId"] = json!(id);
    }
    body
}
