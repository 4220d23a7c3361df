use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ActivityAction;

/// An append-only activity entry recording a lifecycle event on a record.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ActivityEntry {
    pub id: String,
    pub species_id: String,
    pub actor_id: String,
    pub action: ActivityAction,
    pub detail: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
