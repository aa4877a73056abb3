use crate::config::Config;
use crate::domain::{ChangeRecord, PolicyDocument};
use crate::store::PolicyStore;
use crate::sync::dedup;
use crate::sync::{ServiceNowClient, SyncError};
use chrono::Utc;
use log::info;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// What one sync run did. Serialized straight into the route response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub total_fetched: usize,
    pub unique_records: usize,
    pub new_records_inserted: usize,
    pub inserted_ids: Vec<String>,
}

/// ServiceNow → store ingestion.
///
/// Steps 1-6 are read-only and safe to repeat; only the final batch
/// insert mutates persisted state. Running twice against an unchanged
/// source inserts nothing the second time.
pub struct SyncPipeline {
    source: ServiceNowClient,
    store: PolicyStore,
}

impl SyncPipeline {
    pub fn from_config(config: &Config) -> Result<SyncPipeline, SyncError> {
        let ticketing = config
            .ticketing
            .as_ref()
            .ok_or_else(|| SyncError::Unconfigured("ServiceNow URL or token not set".into()))?;
        let store = config
            .store
            .as_ref()
            .ok_or_else(|| SyncError::Unconfigured("Astra DB connection not set".into()))?;

        Ok(SyncPipeline {
            source: ServiceNowClient::new(ticketing),
            store: PolicyStore::new(store),
        })
    }

    pub fn run(&self) -> Result<SyncReport, SyncError> {
        // 1. Fetch raw rows from the ticketing source
        let raw = self.source.fetch_change_requests()?;
        let total_fetched = raw.len();
        info!("sync: fetched {total_fetched} change rows from ServiceNow");

        // 2. Project onto the record field set (missing fields -> "")
        //    before dedup so key comparisons are stable
        let records = project_records(&raw);

        // 3. Collapse duplicates, last occurrence wins
        let unique = dedup::resolve(records);
        let unique_records = unique.len();

        // 4. Full projection of the change ids already stored
        let existing = self
            .store
            .existing_change_ids()
            .map_err(|e| SyncError::Store(e.to_string()))?;

        // 5. Set difference by change id
        let fresh = diff_new_records(unique, &existing);

        // 6. Nothing new: succeed without touching the store
        if fresh.is_empty() {
            info!("sync: {unique_records} unique records, all already present");
            return Ok(SyncReport {
                total_fetched,
                unique_records,
                new_records_inserted: 0,
                inserted_ids: Vec::new(),
            });
        }

        // 7. Stamp and insert as one batch; partial failures surface
        //    exactly as the store adapter reports them
        let now = Utc::now();
        let documents: Vec<PolicyDocument> = fresh
            .into_iter()
            .map(|metadata| PolicyDocument::new(metadata, now))
            .collect();

        let inserted_ids = self
            .store
            .insert_many(&documents)
            .map_err(|e| SyncError::Store(e.to_string()))?;

        info!(
            "sync: inserted {} new records ({} ids reported)",
            documents.len(),
            inserted_ids.len()
        );

        Ok(SyncReport {
            total_fetched,
            unique_records,
            new_records_inserted: documents.len(),
            inserted_ids,
        })
    }
}

fn project_records(raw: &[Value]) -> Vec<ChangeRecord> {
    raw.iter().map(ChangeRecord::from_source).collect()
}

/// Step 5: `unique − existing`, keyed by change id.
fn diff_new_records(unique: Vec<ChangeRecord>, existing: &HashSet<String>) -> Vec<ChangeRecord> {
    unique
        .into_iter()
        .filter(|record| !existing.contains(&record.u_change_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(change_id: &str) -> ChangeRecord {
        ChangeRecord::from_source(&json!({ "u_change_id": change_id }))
    }

    #[test]
    fn projection_normalizes_before_dedup() {
        let raw = vec![
            json!({ "u_change_id": "C1", "u_application": "app" }),
            json!({ "u_requestor": "alice" }),
        ];

        let records = project_records(&raw);
        assert_eq!(records[0].u_change_id, "C1");
        assert_eq!(records[1].u_change_id, "");
        assert_eq!(records[1].u_requestor, "alice");
    }

    #[test]
    fn diff_keeps_only_unseen_change_ids() {
        let unique = vec![record("C1"), record("C2"), record("C3")];
        let existing: HashSet<String> = ["C2".to_string()].into_iter().collect();

        let fresh = diff_new_records(unique, &existing);
        let ids: Vec<&str> = fresh.iter().map(|r| r.u_change_id.as_str()).collect();
        assert_eq!(ids, vec!["C1", "C3"]);
    }

    #[test]
    fn diff_partitions_the_unique_set() {
        // |new| + |S ∩ U| == |U|
        let unique = vec![record("C1"), record("C2"), record("C3"), record("C4")];
        let existing: HashSet<String> =
            ["C2".to_string(), "C4".to_string(), "C9".to_string()].into_iter().collect();

        let total = unique.len();
        let overlap = unique
            .iter()
            .filter(|r| existing.contains(&r.u_change_id))
            .count();
        let fresh = diff_new_records(unique, &existing);

        assert_eq!(fresh.len() + overlap, total);
    }

    #[test]
    fn second_run_against_unchanged_source_finds_nothing() {
        let unique = vec![record("C1"), record("C2")];

        // After a first successful run the store projection contains
        // exactly these ids.
        let existing: HashSet<String> = unique
            .iter()
            .map(|r| r.u_change_id.clone())
            .collect();

        let fresh = diff_new_records(unique, &existing);
        assert!(fresh.is_empty());
    }
}
