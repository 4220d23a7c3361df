//! Side effects as data.
//!
//! Lifecycle operations describe what should happen after commit; the
//! interpreter executes them against a [`crate::Dispatcher`]. Every payload
//! is an owned value object, so nothing transactional leaks past commit.

use flora_core::entities::{ReviewerContact, SpeciesSummary};
use flora_core::enums::{ReviewOutcome, XpAction};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum SideEffect {
    /// Tell reviewers a record is waiting for them.
    NotifyReviewers {
        summary: SpeciesSummary,
        reviewers: Vec<ReviewerContact>,
    },

    /// Tell the author how a review cycle ended.
    NotifyAuthor {
        summary: SpeciesSummary,
        outcome: ReviewOutcome,
    },

    AwardXp { user_id: String, action: XpAction },

    CheckBadges { user_id: String },
}

impl SideEffect {
    /// An XP award followed by the badge check it implies.
    #[must_use]
    pub fn reward(user_id: &str, action: XpAction) -> [Self; 2] {
        [
            Self::AwardXp {
                user_id: user_id.to_string(),
                action,
            },
            Self::CheckBadges {
                user_id: user_id.to_string(),
            },
        ]
    }

    /// Short name used in log lines.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotifyReviewers { .. } => "notify_reviewers",
            Self::NotifyAuthor { .. } => "notify_author",
            Self::AwardXp { .. } => "award_xp",
            Self::CheckBadges { .. } => "check_badges",
        }
    }
}
