//! Pure lifecycle transitions on `Species`.
//!
//! Each method checks the current status and review context, mutates the
//! record in memory, and bumps `version`/`updated_at`. Persistence, vote
//! counting, authorization and side effects are the storage layer's job; this
//! module only knows the state machine.
//!
//! Rejection and reviewer edits dispatch on `ReviewContext`: a
//! `NewSubmission` works on canonical fields, a `RevisionRequest` works on
//! the draft overlay and leaves canonical fields alone until publish.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::diff::{FieldChange, changes_to_patch};
use crate::entities::{RevisionMarker, Species};
use crate::enums::{ReviewContext, ReviewOutcome, SpeciesStatus};
use crate::errors::CoreError;
use crate::fields::FieldMap;
use crate::overlay::DraftOverlay;

/// Where a reviewer edit was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EditTarget {
    Canonical,
    Overlay,
}

/// How a rejecting vote closed a review cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A new submission was turned down.
    Rejected,
    /// A revision request was turned down and its overlay dropped.
    RevisionDiscarded,
}

impl From<Rejection> for ReviewOutcome {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Rejected => Self::Rejected,
            Rejection::RevisionDiscarded => Self::RevisionDiscarded,
        }
    }
}

impl Species {
    /// Record a persisted mutation.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = now;
    }

    /// `draft` → `in_review` as a new submission.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the record is a draft.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.move_to(
            SpeciesStatus::Draft,
            SpeciesStatus::InReview,
            ReviewContext::NewSubmission,
        )?;
        self.submitted_at = Some(now);
        self.touch(now);
        Ok(())
    }

    /// `rejected` → `in_review` as a new submission.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the record was rejected.
    pub fn resubmit(&mut self, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.move_to(
            SpeciesStatus::Rejected,
            SpeciesStatus::InReview,
            ReviewContext::NewSubmission,
        )?;
        self.submitted_at = Some(now);
        self.touch(now);
        Ok(())
    }

    /// `published` → `in_review` as a revision request with an empty overlay.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the record is published.
    pub fn request_revision(
        &mut self,
        marker: RevisionMarker,
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        self.move_to(
            SpeciesStatus::Published,
            SpeciesStatus::InReview,
            ReviewContext::RevisionRequest,
        )?;
        self.revision = Some(marker);
        self.draft_overlay = DraftOverlay::None;
        self.touch(now);
        Ok(())
    }

    /// `in_review` → `published`, merging any overlay into canonical fields.
    ///
    /// Returns the overlay keys that were dropped by the allow-list.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the record is under
    /// review, or `CoreError::Validation` if the merged fields are invalid.
    pub fn publish(&mut self, now: DateTime<Utc>) -> Result<Vec<String>, CoreError> {
        let merge = self.draft_overlay.merge_into(&self.fields)?;
        merge.fields.require_name()?;
        self.move_to(
            SpeciesStatus::InReview,
            SpeciesStatus::Published,
            ReviewContext::None,
        )?;
        self.fields = merge.fields;
        self.draft_overlay = DraftOverlay::None;
        self.revision = None;
        self.published_at = Some(now);
        self.touch(now);
        Ok(merge.dropped)
    }

    /// Close the review cycle after a rejecting vote.
    ///
    /// A new submission becomes `rejected`. A revision request goes back to
    /// `published` with its overlay discarded and canonical fields untouched.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the record is under review.
    pub fn close_rejected(&mut self, now: DateTime<Utc>) -> Result<Rejection, CoreError> {
        let outcome = match self.review_context {
            ReviewContext::NewSubmission => {
                self.move_to(
                    SpeciesStatus::InReview,
                    SpeciesStatus::Rejected,
                    ReviewContext::None,
                )?;
                Rejection::Rejected
            }
            ReviewContext::RevisionRequest => {
                self.move_to(
                    SpeciesStatus::InReview,
                    SpeciesStatus::Published,
                    ReviewContext::None,
                )?;
                self.draft_overlay = DraftOverlay::None;
                self.revision = None;
                Rejection::RevisionDiscarded
            }
            ReviewContext::None => return Err(self.invalid_transition(SpeciesStatus::Rejected)),
        };
        self.touch(now);
        Ok(outcome)
    }

    /// The values a reviewer edit is diffed against.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the record is under review.
    pub fn edit_baseline(&self) -> Result<FieldMap, CoreError> {
        match (self.status, self.review_context) {
            (SpeciesStatus::InReview, ReviewContext::NewSubmission) => {
                Ok(self.fields.to_field_map())
            }
            (SpeciesStatus::InReview, ReviewContext::RevisionRequest) => {
                Ok(self.draft_overlay.overlay_on(&self.fields))
            }
            _ => Err(self.invalid_transition(SpeciesStatus::InReview)),
        }
    }

    /// Apply already-diffed reviewer changes to the right place.
    ///
    /// Callers skip this entirely when the diff is empty.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the record is under
    /// review, or `CoreError::Validation` if the edit leaves invalid fields.
    pub fn apply_review_edit(
        &mut self,
        changes: &[FieldChange],
        now: DateTime<Utc>,
    ) -> Result<EditTarget, CoreError> {
        let target = match (self.status, self.review_context) {
            (SpeciesStatus::InReview, ReviewContext::NewSubmission) => {
                let fields = self.fields.with_patch(&changes_to_patch(changes))?;
                fields.require_name()?;
                self.fields = fields;
                EditTarget::Canonical
            }
            (SpeciesStatus::InReview, ReviewContext::RevisionRequest) => {
                let overlay = self.draft_overlay.with_changes(changes);
                overlay.merge_into(&self.fields)?.fields.require_name()?;
                self.draft_overlay = overlay;
                EditTarget::Overlay
            }
            _ => return Err(self.invalid_transition(SpeciesStatus::InReview)),
        };
        self.touch(now);
        Ok(target)
    }

    /// Apply an author's changes to a draft.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the record is a draft, or
    /// `CoreError::Validation` if the edit leaves invalid fields.
    pub fn apply_draft_edit(
        &mut self,
        changes: &[FieldChange],
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        if self.status != SpeciesStatus::Draft {
            return Err(self.invalid_transition(SpeciesStatus::Draft));
        }
        let fields = self.fields.with_patch(&changes_to_patch(changes))?;
        fields.require_name()?;
        self.fields = fields;
        self.touch(now);
        Ok(())
    }

    fn move_to(
        &mut self,
        from: SpeciesStatus,
        to: SpeciesStatus,
        context: ReviewContext,
    ) -> Result<(), CoreError> {
        if self.status != from || !self.status.can_transition_to(to) {
            return Err(self.invalid_transition(to));
        }
        self.status = to;
        self.review_context = context;
        Ok(())
    }

    fn invalid_transition(&self, to: SpeciesStatus) -> CoreError {
        CoreError::InvalidTransition {
            entity_type: "species".into(),
            id: self.id.clone(),
            from: format!("{} ({})", self.status, self.review_context),
            to: to.to_string(),
        }
    }
}
