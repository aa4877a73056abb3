use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// document
//  ├── _id                  (store-assigned)
//  ├── metadata
//  │    ├── u_change_id     (business key)
//  │    ├── u_source_address
//  │    ├── u_destination_address
//  │    ├── u_application
//  │    ├── u_action        (permit/deny token)
//  │    └── u_requestor
//  └── synced_at            (ingestion timestamp)

/// One firewall change request as it travels from ServiceNow through the
/// store to the table UI. Every field is a plain string; anything the
/// source omits is an empty string, never null, so key comparisons in the
/// dedup pass stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    #[serde(default)]
    pub u_change_id: String,
    #[serde(default)]
    pub u_source_address: String,
    #[serde(default)]
    pub u_destination_address: String,
    #[serde(default)]
    pub u_application: String,
    #[serde(default)]
    pub u_action: String,
    #[serde(default)]
    pub u_requestor: String,
}

fn field(raw: &Value, key: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

impl ChangeRecord {
    /// Project a raw ticketing row onto the record field set. This runs
    /// before dedup: null and absent both become "".
    pub fn from_source(raw: &Value) -> ChangeRecord {
        ChangeRecord {
            u_change_id: field(raw, "u_change_id"),
            u_source_address: field(raw, "u_source_address"),
            u_destination_address: field(raw, "u_destination_address"),
            u_application: field(raw, "u_application"),
            u_action: field(raw, "u_action"),
            u_requestor: field(raw, "u_requestor"),
        }
    }
}

/// The persisted shape, matching what the table UI reads
/// (`item.metadata.u_change_id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub metadata: ChangeRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<DateTime<Utc>>,
}

impl PolicyDocument {
    pub fn new(metadata: ChangeRecord, synced_at: DateTime<Utc>) -> PolicyDocument {
        PolicyDocument {
            id: None,
            metadata,
            synced_at: Some(synced_at),
        }
    }
}

/// A stored document decorated with its 1-based position in the current
/// result set. Recomputed on every fetch: the same change id is NOT
/// guaranteed to keep its policy_id across fetches if the underlying set
/// or order changes. Known fragility, kept on purpose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayPolicy {
    pub policy_id: usize,
    #[serde(flatten)]
    pub document: PolicyDocument,
}

/// Decorate a result set by enumeration order.
pub fn assign_policy_ids(documents: Vec<PolicyDocument>) -> Vec<DisplayPolicy> {
    documents
        .into_iter()
        .enumerate()
        .map(|(i, document)| DisplayPolicy {
            policy_id: i + 1,
            document,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn projection_fills_missing_fields_with_empty_strings() {
        let raw = json!({
            "u_change_id": "CHG0001",
            "u_application": "web-portal",
            "u_action": null,
            "sys_id": "ignored"
        });

        let record = ChangeRecord::from_source(&raw);
        assert_eq!(record.u_change_id, "CHG0001");
        assert_eq!(record.u_application, "web-portal");
        assert_eq!(record.u_action, "");
        assert_eq!(record.u_source_address, "");
        assert_eq!(record.u_requestor, "");
    }

    #[test]
    fn positional_lookup_matches_enumeration_order() {
        let docs: Vec<PolicyDocument> = (1..=5)
            .map(|i| {
                PolicyDocument::new(
                    ChangeRecord::from_source(&json!({ "u_change_id": format!("CHG{i:04}") })),
                    Utc::now(),
                )
            })
            .collect();

        let policies = assign_policy_ids(docs);

        let third = policies.clone().into_iter().nth(2).unwrap();
        assert_eq!(third.policy_id, 3);
        assert_eq!(third.document.metadata.u_change_id, "CHG0003");

        // past the end of a 5-record set
        assert!(policies.into_iter().nth(7).is_none());
    }

    #[test]
    fn policy_ids_are_one_based_enumeration_order() {
        let docs = vec![
            PolicyDocument::new(ChangeRecord::from_source(&json!({"u_change_id": "A"})), Utc::now()),
            PolicyDocument::new(ChangeRecord::from_source(&json!({"u_change_id": "B"})), Utc::now()),
        ];

        let policies = assign_policy_ids(docs);
        assert_eq!(policies[0].policy_id, 1);
        assert_eq!(policies[1].policy_id, 2);
        assert_eq!(policies[1].document.metadata.u_change_id, "B");
    }
}
