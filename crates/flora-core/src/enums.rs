//! Status enums, review axes, roles, and actions for Flora.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `SpeciesStatus` provides `allowed_next_states()` to enforce valid transitions
//! at the application layer; `ReviewContext` is the second axis of the review
//! state and says which kind of review cycle a record is in.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// SpeciesStatus
// ---------------------------------------------------------------------------

/// Publication status of a species record.
///
/// ```text
/// draft → in_review → published → in_review (revision request)
///                   → rejected  → in_review (resubmit)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpeciesStatus {
    Draft,
    InReview,
    Published,
    Rejected,
}

impl SpeciesStatus {
    /// Valid next states from the current state.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::InReview],
            Self::InReview => &[Self::Published, Self::Rejected],
            Self::Published => &[Self::InReview],
            Self::Rejected => &[Self::InReview],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InReview => "in_review",
            Self::Published => "published",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for SpeciesStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ReviewContext
// ---------------------------------------------------------------------------

/// Which kind of review cycle a record is in.
///
/// `None` outside of review. While `in_review`, a record is either a
/// `NewSubmission` (never published, edits land on canonical fields) or a
/// `RevisionRequest` (already published, edits land in the draft overlay).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewContext {
    None,
    NewSubmission,
    RevisionRequest,
}

impl ReviewContext {
    /// Whether this context may accompany `status`.
    #[must_use]
    pub const fn fits(self, status: SpeciesStatus) -> bool {
        match status {
            SpeciesStatus::InReview => !matches!(self, Self::None),
            SpeciesStatus::Draft | SpeciesStatus::Published | SpeciesStatus::Rejected => {
                matches!(self, Self::None)
            }
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::NewSubmission => "new_submission",
            Self::RevisionRequest => "revision_request",
        }
    }
}

impl fmt::Display for ReviewContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ReviewDecision
// ---------------------------------------------------------------------------

/// A reviewer's vote on a record under review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ReviewOutcome
// ---------------------------------------------------------------------------

/// How a review cycle ended, as reported to the record's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    /// Quorum reached; the record (and any overlay) is live.
    Published,
    /// A new submission was turned down.
    Rejected,
    /// A revision request was turned down; the published data stands.
    RevisionDiscarded,
}

impl ReviewOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Rejected => "rejected",
            Self::RevisionDiscarded => "revision_discarded",
        }
    }
}

impl fmt::Display for ReviewOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UserRole
// ---------------------------------------------------------------------------

/// Role of a user in the reviewer roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Contributor,
    Reviewer,
    Admin,
}

impl UserRole {
    /// Reviewers and admins may vote and edit records under review.
    #[must_use]
    pub const fn can_review(self) -> bool {
        matches!(self, Self::Reviewer | Self::Admin)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contributor => "contributor",
            Self::Reviewer => "reviewer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PhotoStatus
// ---------------------------------------------------------------------------

/// Moderation status of an uploaded photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhotoStatus {
    Pending,
    Approved,
}

impl PhotoStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }
}

impl fmt::Display for PhotoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ActivityAction
// ---------------------------------------------------------------------------

/// Action recorded in the species activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Created,
    DraftUpdated,
    Submitted,
    Voted,
    Edited,
    Published,
    Rejected,
    RevisionDiscarded,
    Resubmitted,
    RevisionRequested,
}

impl ActivityAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::DraftUpdated => "draft_updated",
            Self::Submitted => "submitted",
            Self::Voted => "voted",
            Self::Edited => "edited",
            Self::Published => "published",
            Self::Rejected => "rejected",
            Self::RevisionDiscarded => "revision_discarded",
            Self::Resubmitted => "resubmitted",
            Self::RevisionRequested => "revision_requested",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// XpAction
// ---------------------------------------------------------------------------

/// Kind of contribution that earns experience points.
///
/// Badge rules belong to the reward service; the engine only reports which
/// action happened and to whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum XpAction {
    Submitted,
    Resubmitted,
    Published,
    IssueReported,
    ReviewCast,
}

impl XpAction {
    /// Points awarded for the action.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn points(self) -> u32 {
        match self {
            Self::Submitted => 10,
            Self::Resubmitted => 5,
            Self::Published => 50,
            Self::IssueReported => 5,
            Self::ReviewCast => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Resubmitted => "resubmitted",
            Self::Published => "published",
            Self::IssueReported => "issue_reported",
            Self::ReviewCast => "review_cast",
        }
    }
}

impl fmt::Display for XpAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(
        status_in_review,
        SpeciesStatus,
        SpeciesStatus::InReview,
        "in_review"
    );
    test_serde_roundtrip!(
        context_revision_request,
        ReviewContext,
        ReviewContext::RevisionRequest,
        "revision_request"
    );
    test_serde_roundtrip!(
        decision_approved,
        ReviewDecision,
        ReviewDecision::Approved,
        "approved"
    );
    test_serde_roundtrip!(
        outcome_revision_discarded,
        ReviewOutcome,
        ReviewOutcome::RevisionDiscarded,
        "revision_discarded"
    );
    test_serde_roundtrip!(role_admin, UserRole, UserRole::Admin, "admin");
    test_serde_roundtrip!(
        activity_revision_requested,
        ActivityAction,
        ActivityAction::RevisionRequested,
        "revision_requested"
    );
    test_serde_roundtrip!(
        xp_issue_reported,
        XpAction,
        XpAction::IssueReported,
        "issue_reported"
    );

    #[test]
    fn status_valid_transitions() {
        assert!(SpeciesStatus::Draft.can_transition_to(SpeciesStatus::InReview));
        assert!(SpeciesStatus::InReview.can_transition_to(SpeciesStatus::Published));
        assert!(SpeciesStatus::InReview.can_transition_to(SpeciesStatus::Rejected));
        assert!(SpeciesStatus::Rejected.can_transition_to(SpeciesStatus::InReview));
        assert!(SpeciesStatus::Published.can_transition_to(SpeciesStatus::InReview));
    }

    #[test]
    fn status_invalid_transitions() {
        assert!(!SpeciesStatus::Draft.can_transition_to(SpeciesStatus::Published));
        assert!(!SpeciesStatus::Rejected.can_transition_to(SpeciesStatus::Published));
        assert!(!SpeciesStatus::Published.can_transition_to(SpeciesStatus::Rejected));
        assert!(!SpeciesStatus::InReview.can_transition_to(SpeciesStatus::Draft));
    }

    #[test]
    fn context_fits_status() {
        assert!(ReviewContext::None.fits(SpeciesStatus::Draft));
        assert!(ReviewContext::None.fits(SpeciesStatus::Published));
        assert!(ReviewContext::NewSubmission.fits(SpeciesStatus::InReview));
        assert!(ReviewContext::RevisionRequest.fits(SpeciesStatus::InReview));
        assert!(!ReviewContext::None.fits(SpeciesStatus::InReview));
        assert!(!ReviewContext::RevisionRequest.fits(SpeciesStatus::Published));
    }

    #[test]
    fn only_reviewers_and_admins_review() {
        assert!(UserRole::Reviewer.can_review());
        assert!(UserRole::Admin.can_review());
        assert!(!UserRole::Contributor.can_review());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", SpeciesStatus::InReview), "in_review");
        assert_eq!(format!("{}", ReviewContext::NewSubmission), "new_submission");
        assert_eq!(format!("{}", ReviewDecision::Rejected), "rejected");
        assert_eq!(format!("{}", PhotoStatus::Pending), "pending");
        assert_eq!(format!("{}", ActivityAction::DraftUpdated), "draft_updated");
        assert_eq!(format!("{}", XpAction::ReviewCast), "review_cast");
    }
}
