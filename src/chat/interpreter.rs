use crate::chat::patterns;
use crate::config::{Config, RelayConfig};
use crate::domain::{ChangeRecord, DisplayPolicy};
use crate::errors::ServerError;
use crate::relay::FlowClient;
use crate::store::PolicyStore;
use log::{debug, error};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Generic apology. The widget must always render something, so every
/// handler failure that is not a configuration problem degrades to this.
const APOLOGY: &str = "⚠️ Something went wrong. Please try again.";

const FETCH_ERROR: &str = "⚠️ Failed to fetch policy details. Please try again later.";

/// Words the policy-details rule throws away before it reads the last
/// remaining token as the identifier.
const STOP_WORDS: [&str; 8] = ["policy", "details", "show", "get", "find", "me", "the", "of"];

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SyncStatus,
    ChangeModeling { change_id: Option<String> },
    PolicyDetails { token: Option<String> },
    Push { explicit_id: Option<u32> },
    BranchDiagram,
    HealthSummary,
    Fallback,
}

/// The row the operator currently has selected in the table, passed in
/// by the frontend with each chat turn. The interpreter keeps no state
/// of its own across turns.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectedPolicy {
    #[serde(default)]
    pub policy_id: Option<u32>,
    pub metadata: ChangeRecord,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub success: bool,
    pub message: String,
    /// Asks the widget to open this URL in a new viewport.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_url: Option<String>,
}

impl ChatReply {
    fn text(message: impl Into<String>) -> ChatReply {
        ChatReply {
            success: true,
            message: message.into(),
            open_url: None,
        }
    }

    fn failed(message: impl Into<String>) -> ChatReply {
        ChatReply {
            success: false,
            message: message.into(),
            open_url: None,
        }
    }
}

pub struct Rule {
    pub name: &'static str,
    pub matcher: fn(&str) -> Option<Intent>,
}

fn mentions_any(lower: &str, words: &[&str]) -> bool {
    words.iter().any(|w| lower.contains(w))
}

fn last_non_stop_word(input: &str) -> Option<String> {
    input
        .split_whitespace()
        .filter(|token| !STOP_WORDS.contains(&token.to_lowercase().as_str()))
        .last()
        .map(str::to_string)
}

/// Classification rules in priority order. The first match wins and its
/// branch is terminal; anything unmatched falls through to the LLM flow,
/// so there is no "I don't understand" state.
pub static RULES: [Rule; 6] = [
    Rule {
        name: "sync-status",
        matcher: |input| {
            let lower = input.to_lowercase();
            (lower.contains("sync") && lower.contains("status")).then_some(Intent::SyncStatus)
        },
    },
    Rule {
        name: "change-modeling",
        matcher: |input| {
            let lower = input.to_lowercase();
            let asks = (lower.contains("model") || lower.contains("validate"))
                && lower.contains("change");
            asks.then(|| Intent::ChangeModeling {
                change_id: patterns::change_id_token(input),
            })
        },
    },
    Rule {
        name: "policy-details",
        matcher: |input| {
            let lower = input.to_lowercase();
            let asks = lower.contains("policy")
                && mentions_any(&lower, &["details", "show", "get", "find"]);
            asks.then(|| Intent::PolicyDetails {
                token: last_non_stop_word(input),
            })
        },
    },
    Rule {
        name: "push",
        matcher: |input| {
            let lower = input.to_lowercase();
            lower.trim_start().starts_with("push").then(|| Intent::Push {
                explicit_id: patterns::explicit_push_id(&lower),
            })
        },
    },
    Rule {
        name: "branch-diagram",
        matcher: |input| {
            let lower = input.to_lowercase();
            let asks = lower.contains("show branch")
                && mentions_any(&lower, &["diagram", "architecture", "layout"]);
            asks.then_some(Intent::BranchDiagram)
        },
    },
    Rule {
        name: "health-summary",
        matcher: |input| {
            let lower = input.to_lowercase();
            let asks = lower.contains("show health")
                && mentions_any(&lower, &["summary", "status", "report"]);
            asks.then_some(Intent::HealthSummary)
        },
    },
];

pub fn classify(input: &str) -> Intent {
    RULES
        .iter()
        .find_map(|rule| (rule.matcher)(input))
        .unwrap_or(Intent::Fallback)
}

/// Interpret one utterance and produce the reply the widget renders.
/// Missing configuration propagates (the route answers 400); anything
/// else that goes wrong becomes the apology string.
pub fn respond(
    config: &Config,
    input: &str,
    selected: Option<&SelectedPolicy>,
) -> Result<ChatReply, ServerError> {
    let intent = classify(input);
    debug!("chat: classified {input:?} as {intent:?}");

    match execute(config, input, &intent, selected) {
        Ok(reply) => Ok(reply),
        Err(err @ ServerError::NotConfigured(_)) => Err(err),
        Err(err) => {
            error!("chat handler failed: {err}");
            Ok(ChatReply::failed(APOLOGY))
        }
    }
}

fn relay(config: &Config) -> Result<(FlowClient, &RelayConfig), ServerError> {
    let cfg = config.relay.as_ref().ok_or_else(|| {
        ServerError::NotConfigured("LangFlow URL or API Key not configured".into())
    })?;
    Ok((FlowClient::new(cfg), cfg))
}

fn flow_id<'a>(flow: &'a Option<String>, name: &str) -> Result<&'a str, ServerError> {
    flow.as_deref()
        .ok_or_else(|| ServerError::NotConfigured(format!("{name} flow not configured")))
}

fn execute(
    config: &Config,
    input: &str,
    intent: &Intent,
    selected: Option<&SelectedPolicy>,
) -> Result<ChatReply, ServerError> {
    match intent {
        Intent::SyncStatus => Ok(ChatReply::text(
            "✅ ServiceNow sync is up to date. Use the Sync button (or POST \
             /api/sync-servicenow) to pull the latest change requests.",
        )),

        Intent::ChangeModeling { change_id } => Ok(match change_id {
            Some(id) => ChatReply::text(format!(
                "✅ Change {id} has been modeled and validated against the current \
                 policy set. No conflicts detected; it is ready to push."
            )),
            None => ChatReply::text(
                "Please include a change id (for example CHG0040012) so I can model \
                 and validate it.",
            ),
        }),

        Intent::PolicyDetails { token } => {
            let Some(token) = token else {
                return Ok(ChatReply::text(
                    "Tell me which policy you need, for example \"show policy details 3\".",
                ));
            };
            let Some(store_cfg) = &config.store else {
                return Ok(ChatReply::failed(FETCH_ERROR));
            };
            let store = PolicyStore::new(store_cfg);

            let found = match token.parse::<usize>().ok() {
                Some(position) => match store.find_by_position(position) {
                    Ok(found) => found,
                    Err(err) => {
                        error!("policy lookup failed: {err}");
                        return Ok(ChatReply::failed(FETCH_ERROR));
                    }
                },
                None => None,
            };

            Ok(match found {
                Some(policy) => ChatReply::text(policy_card(&policy)),
                None => ChatReply::failed(format!("No policy found matching \"{token}\".")),
            })
        }

        Intent::Push { explicit_id } => {
            let (client, relay_cfg) = relay(config)?;
            let flow = flow_id(&relay_cfg.push_flow, "push")?;

            let Some(selected) = selected else {
                return Ok(ChatReply::failed(
                    "Select a policy row first, then say \"push <policy id>\".",
                ));
            };

            let resolved = resolve_push_id(*explicit_id, selected.policy_id);

            match client.push_policy(flow, &selected.metadata, Some(&resolved.to_string())) {
                Ok(outcome) => Ok(ChatReply::text(format!(
                    "🔥 Policy {resolved}: {}",
                    outcome.message
                ))),
                Err(err) => {
                    error!("chat push failed: {err}");
                    Ok(ChatReply::failed(format!(
                        "⚠️ Failed to push policy {resolved} to firewall."
                    )))
                }
            }
        }

        Intent::BranchDiagram => Ok(ChatReply {
            success: true,
            message: "Opening the branch network diagram.".to_string(),
            open_url: Some("/diagram".to_string()),
        }),

        Intent::HealthSummary => {
            let (client, relay_cfg) = relay(config)?;
            let flow = flow_id(&relay_cfg.health_flow, "health summary")?;

            match client.converse(flow, input) {
                Ok(reply) => Ok(ChatReply::text(reply)),
                Err(err) => {
                    error!("health summary failed: {err}");
                    Ok(ChatReply::failed(
                        "⚠️ Unable to generate a health summary right now.",
                    ))
                }
            }
        }

        Intent::Fallback => {
            let (client, relay_cfg) = relay(config)?;
            let flow = flow_id(&relay_cfg.chat_flow, "chat")?;
            let reply = client.converse(flow, input)?;
            Ok(ChatReply::text(reply))
        }
    }
}

/// The id the push reports and sends along: an explicit "push N" id wins
/// over the selected row's id, which wins over a random stand-in.
fn resolve_push_id(explicit: Option<u32>, selected: Option<u32>) -> u32 {
    explicit
        .or(selected)
        .unwrap_or_else(|| rand::thread_rng().gen_range(1..=1000))
}

fn policy_card(policy: &DisplayPolicy) -> String {
    let m = &policy.document.metadata;
    let synced = policy
        .document
        .synced_at
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "📋 Policy {}\nChange ID: {}\nApplication: {}\nSource: {}\nDestination: {}\nAction: {}\nRequestor: {}\nSynced: {}",
        policy.policy_id,
        m.u_change_id,
        m.u_application,
        m.u_source_address,
        m.u_destination_address,
        m.u_action,
        m.u_requestor,
        synced,
    )
}
