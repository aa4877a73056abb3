use crate::config::StoreConfig;
use crate::domain::{assign_policy_ids, DisplayPolicy, PolicyDocument};
use crate::errors::ServerError;
use crate::store::DataApiClient;
use log::warn;
use serde_json::{json, Value};
use std::collections::HashSet;

const COLLECTION: &str = "service_requests";

/// Collection operations for the policy store. Every read is a full
/// collection scan (the Data API pages at ~20 documents, so reads walk
/// `nextPageState` to the end); there is no local cache.
pub struct PolicyStore {
    api: DataApiClient,
}

impl PolicyStore {
    pub fn new(cfg: &StoreConfig) -> PolicyStore {
        PolicyStore {
            api: DataApiClient::new(cfg),
        }
    }

    fn scan(&self, find: Value) -> Result<Vec<Value>, ServerError> {
        let mut documents = Vec::new();
        let mut page_state: Option<String> = None;

        loop {
            let mut command = json!({ "find": find });
            if let Some(state) = &page_state {
                command["find"]["options"] = json!({ "pageState": state });
            }

            let value = self.api.command(COLLECTION, &command)?;

            if let Some(page) = value["data"]["documents"].as_array() {
                documents.extend(page.iter().cloned());
            }

            page_state = value["data"]["nextPageState"]
                .as_str()
                .map(str::to_string);
            if page_state.is_none() {
                break;
            }
        }

        Ok(documents)
    }

    pub fn fetch_all(&self) -> Result<Vec<PolicyDocument>, ServerError> {
        let mut out = Vec::new();
        for raw in self.scan(json!({}))? {
            match serde_json::from_value::<PolicyDocument>(raw) {
                Ok(doc) => out.push(doc),
                // A document someone hand-edited out of shape should not
                // take the whole table down.
                Err(e) => warn!("skipping malformed store document: {e}"),
            }
        }
        Ok(out)
    }

    /// The change ids already persisted, as a full-collection projection.
    pub fn existing_change_ids(&self) -> Result<HashSet<String>, ServerError> {
        let raw = self.scan(json!({ "projection": { "metadata.u_change_id": 1 } }))?;

        let mut ids = HashSet::new();
        for doc in &raw {
            if let Some(id) = doc.pointer("/metadata/u_change_id").and_then(Value::as_str) {
                // Blank ids count too: a stored blank-key record keeps the
                // sync diff from re-inserting blank rows every run.
                ids.insert(id.to_string());
            }
        }
        Ok(ids)
    }

    /// Batch-append new documents. Partial failures surface exactly as
    /// the Data API reports them; there is no rollback and no retry.
    pub fn insert_many(&self, documents: &[PolicyDocument]) -> Result<Vec<String>, ServerError> {
        let command = json!({
            "insertMany": {
                "documents": documents,
                "options": { "ordered": false }
            }
        });

        let value = self.api.command(COLLECTION, &command)?;

        let inserted = value["status"]["insertedIds"]
            .as_array()
            .map(|ids| {
                ids.iter()
                    .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(inserted)
    }

    /// Positional lookup: the policy whose 1-based enumeration position in
    /// the current result set is `policy_id`. If the set changes between a
    /// list fetch and this lookup the operator can land on a different
    /// record than the one they saw; the store-assigned `_id` on each
    /// document is the stable handle a future revision should key on.
    pub fn find_by_position(&self, policy_id: usize) -> Result<Option<DisplayPolicy>, ServerError> {
        if policy_id == 0 {
            return Ok(None);
        }
        let policies = assign_policy_ids(self.fetch_all()?);
        Ok(policies.into_iter().nth(policy_id - 1))
    }
}
