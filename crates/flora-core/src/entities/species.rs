use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ReviewContext, SpeciesStatus};
use crate::errors::CoreError;
use crate::fields::SpeciesFields;
use crate::overlay::DraftOverlay;

/// Who contested a published record, why, and when.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RevisionMarker {
    pub requested_by: String,
    pub reason: String,
    pub requested_at: DateTime<Utc>,
}

/// A species record moving through the review lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Species {
    pub id: String,
    pub status: SpeciesStatus,
    pub review_context: ReviewContext,
    pub fields: SpeciesFields,
    pub draft_overlay: DraftOverlay,
    pub revision: Option<RevisionMarker>,
    pub created_by: String,
    pub submitted_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    /// Incremented on every persisted mutation.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Value object handed to notifiers. Carries no transactional state.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SpeciesSummary {
    pub id: String,
    pub name: String,
    pub scientific_name: Option<String>,
    pub status: SpeciesStatus,
    pub created_by: String,
}

impl Species {
    #[must_use]
    pub fn summary(&self) -> SpeciesSummary {
        SpeciesSummary {
            id: self.id.clone(),
            name: self.fields.display_name().unwrap_or_default().to_string(),
            scientific_name: self.fields.scientific_name.clone(),
            status: self.status,
            created_by: self.created_by.clone(),
        }
    }

    #[must_use]
    pub fn is_author(&self, user_id: &str) -> bool {
        self.created_by == user_id
    }

    /// Verify the status, review context, revision marker and overlay agree.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` describing the first inconsistency.
    pub fn check_invariants(&self) -> Result<(), CoreError> {
        if !self.review_context.fits(self.status) {
            return Err(CoreError::Validation(format!(
                "species {} has review context {} while {}",
                self.id, self.review_context, self.status
            )));
        }
        let revising = self.review_context == ReviewContext::RevisionRequest;
        if revising != self.revision.is_some() {
            return Err(CoreError::Validation(format!(
                "species {} revision marker does not match context {}",
                self.id, self.review_context
            )));
        }
        if !revising && !self.draft_overlay.is_empty() {
            return Err(CoreError::Validation(format!(
                "species {} carries a draft overlay outside a revision request",
                self.id
            )));
        }
        Ok(())
    }
}
