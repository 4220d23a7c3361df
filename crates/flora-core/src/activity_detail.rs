//! Typed activity detail payloads.
//!
//! Each activity entry can carry a structured `detail` JSON blob. These types
//! give the common shapes a schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ReviewDecision, SpeciesStatus};
use crate::transitions::EditTarget;

/// Detail for submit, publish, reject, resubmit and revision entries.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: SpeciesStatus,
    pub to: SpeciesStatus,
    pub reason: Option<String>,
}

/// Detail for `ActivityAction::Voted`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VoteDetail {
    pub decision: ReviewDecision,
    pub approvals: u32,
    pub rejections: u32,
}

/// Detail for `ActivityAction::Edited` and `ActivityAction::DraftUpdated`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EditDetail {
    /// Changed field names, in ledger order.
    pub fields: Vec<String>,
    pub target: EditTarget,
    pub reason: Option<String>,
}
