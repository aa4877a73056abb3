// config.rs
use crate::errors::ServerError;
use std::env;
use url::Url;

/// Default LangFlow chat-input node. The flow passes whatever lands on
/// this node to the Firewall API Generator.
const DEFAULT_CHAT_INPUT_NODE: &str = "ChatInput-Gksmq";
const DEFAULT_KEYSPACE: &str = "default_keyspace";
const DEFAULT_PORT: u16 = 5000;

/// Astra DB Data API coordinates.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub token: String,
    pub endpoint: String,
    pub keyspace: String,
}

/// LangFlow relay coordinates. Flow ids are optional so a deployment can
/// run with only the flows it actually wires up.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub base_url: String,
    pub api_key: String,
    pub push_flow: Option<String>,
    pub chat_flow: Option<String>,
    pub health_flow: Option<String>,
    pub chat_input_node: String,
}

/// ServiceNow change-request source.
#[derive(Debug, Clone)]
pub struct TicketingConfig {
    pub url: String,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub allowed_origin: Option<String>,
    pub store: Option<StoreConfig>,
    pub relay: Option<RelayConfig>,
    pub ticketing: Option<TicketingConfig>,
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Read everything from the environment. A missing group leaves that
    /// collaborator unconfigured; the routes that need it answer 400.
    pub fn from_env() -> Result<Config, ServerError> {
        let store = match (
            var("ASTRA_DB_APPLICATION_TOKEN"),
            var("ASTRA_DB_ID"),
            var("ASTRA_DB_REGION"),
        ) {
            (Some(token), Some(id), Some(region)) => Some(StoreConfig {
                token,
                // Same endpoint shape the Node backend built by hand.
                endpoint: format!("https://{id}-{region}.apps.astra.datastax.com"),
                keyspace: var("ASTRA_DB_KEYSPACE").unwrap_or_else(|| DEFAULT_KEYSPACE.into()),
            }),
            _ => None,
        };

        let relay = match (var("LANGFLOW_URL"), var("LANGFLOW_API_KEY")) {
            (Some(base_url), Some(api_key)) => {
                Url::parse(&base_url).map_err(|e| {
                    ServerError::BadRequest(format!("LANGFLOW_URL is not a valid URL: {e}"))
                })?;
                Some(RelayConfig {
                    base_url: base_url.trim_end_matches('/').to_string(),
                    api_key,
                    push_flow: var("LANGFLOW_PUSH_FLOW"),
                    chat_flow: var("LANGFLOW_CHAT_FLOW"),
                    health_flow: var("LANGFLOW_HEALTH_FLOW"),
                    chat_input_node: var("LANGFLOW_CHAT_INPUT_NODE")
                        .unwrap_or_else(|| DEFAULT_CHAT_INPUT_NODE.into()),
                })
            }
            _ => None,
        };

        let ticketing = match (var("SERVICENOW_URL"), var("SERVICENOW_TOKEN")) {
            (Some(url), Some(token)) => Some(TicketingConfig { url, token }),
            _ => None,
        };

        let port = match var("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ServerError::BadRequest(format!("PORT is not a number: {raw}")))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            port,
            allowed_origin: var("ALLOWED_ORIGIN"),
            store,
            relay,
            ticketing,
        })
    }

    /// An empty configuration, useful for tests exercising the
    /// NotConfigured paths without touching the environment.
    pub fn unconfigured() -> Config {
        Config {
            port: DEFAULT_PORT,
            allowed_origin: None,
            store: None,
            relay: None,
            ticketing: None,
        }
    }
}
