use crate::config::TicketingConfig;
use crate::sync::SyncError;
use reqwest::blocking::Client;
use serde_json::Value;

/// Pulls open firewall change requests from the ServiceNow table API.
pub struct ServiceNowClient {
    client: Client,
    url: String,
    token: String,
}

impl ServiceNowClient {
    pub fn new(cfg: &TicketingConfig) -> ServiceNowClient {
        ServiceNowClient {
            client: Client::new(),
            url: cfg.url.clone(),
            token: cfg.token.clone(),
        }
    }

    /// Fetch raw change rows. The table API wraps rows in
    /// `{"result": [...]}`; a bare top-level array is accepted too since
    /// some proxies in front of ServiceNow unwrap it.
    pub fn fetch_change_requests(&self) -> Result<Vec<Value>, SyncError> {
        let resp = self
            .client
            .get(&self.url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .send()
            .map_err(|e| SyncError::SourceUnavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(SyncError::SourceUnavailable(format!(
                "ServiceNow HTTP {status}: {text}"
            )));
        }

        let value: Value = resp
            .json()
            .map_err(|e| SyncError::UnexpectedShape(format!("not JSON: {e}")))?;

        match value {
            Value::Array(rows) => Ok(rows),
            Value::Object(_) => match value.get("result") {
                Some(Value::Array(rows)) => Ok(rows.clone()),
                _ => Err(SyncError::UnexpectedShape(
                    "expected a result array of change rows".to_string(),
                )),
            },
            _ => Err(SyncError::UnexpectedShape(
                "expected a result array of change rows".to_string(),
            )),
        }
    }
}
