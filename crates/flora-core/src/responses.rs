//! Response types returned as JSON by `flora` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::ReviewEntry;
use crate::enums::SpeciesStatus;

/// Live vote tally for a record, from `flora reviews`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReviewStatus {
    pub species_id: String,
    pub status: SpeciesStatus,
    pub approval_count: u32,
    pub rejection_count: u32,
    pub quorum: u32,
    pub entries: Vec<ReviewEntry>,
}
