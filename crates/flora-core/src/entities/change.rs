use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An append-only record of one field edit made during review.
///
/// `previous_value` and `new_value` are `null` when the field was (or became)
/// absent.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ChangeEntry {
    pub id: String,
    pub species_id: String,
    pub field: String,
    pub previous_value: serde_json::Value,
    pub new_value: serde_json::Value,
    pub changed_by: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
