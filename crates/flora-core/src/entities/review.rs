use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ReviewDecision;

/// A reviewer's live vote on a record. One per (species, reviewer).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReviewEntry {
    pub species_id: String,
    pub reviewer_id: String,
    pub decision: ReviewDecision,
    pub comments: Option<String>,
    pub reviewed_at: DateTime<Utc>,
}
