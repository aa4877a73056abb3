use crate::config::StoreConfig;
use crate::errors::ServerError;
use reqwest::blocking::Client;
use serde_json::Value;

/// Thin client for the Astra DB Data API. One collection command per
/// call, no connection state worth pooling beyond what reqwest keeps.
pub struct DataApiClient {
    client: Client,
    endpoint: String,
    token: String,
    keyspace: String,
}

impl DataApiClient {
    pub fn new(cfg: &StoreConfig) -> DataApiClient {
        DataApiClient {
            client: Client::new(),
            endpoint: cfg.endpoint.clone(),
            token: cfg.token.clone(),
            keyspace: cfg.keyspace.clone(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/api/json/v1/{}/{}",
            self.endpoint, self.keyspace, collection
        )
    }

    /// Single choke point for Data API commands. The API reports command
    /// failures inside a 200 body as an `errors` array, so both the HTTP
    /// status and the body are checked here.
    pub fn command(&self, collection: &str, body: &Value) -> Result<Value, ServerError> {
        let resp = self
            .client
            .post(self.collection_url(collection))
            .header("Token", &self.token)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .map_err(|e| ServerError::StoreError(format!("Data API request failed: {e}")))?;

        let status = resp.status();
        let value: Value = resp
            .json()
            .map_err(|e| ServerError::StoreError(format!("Data API returned non-JSON: {e}")))?;

        if !status.is_success() {
            return Err(ServerError::StoreError(format!(
                "Data API HTTP {status}: {value}"
            )));
        }

        if let Some(errors) = value.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                return Err(ServerError::StoreError(format!(
                    "Data API command error: {}",
                    errors[0]
                )));
            }
        }

        Ok(value)
    }
}
