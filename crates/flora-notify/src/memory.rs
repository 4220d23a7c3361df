//! In-process dispatchers for embedding and tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use flora_core::entities::{ReviewerContact, SpeciesSummary};
use flora_core::enums::{ReviewOutcome, XpAction};

use crate::dispatcher::Dispatcher;
use crate::effect::SideEffect;
use crate::error::DispatchError;

/// Remembers every effect it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    seen: Mutex<Vec<SideEffect>>,
}

impl RecordingDispatcher {
    /// Snapshot of the effects received so far.
    #[must_use]
    pub fn effects(&self) -> Vec<SideEffect> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, effect: SideEffect) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(effect);
    }
}

#[async_trait]
impl Dispatcher for RecordingDispatcher {
    async fn notify_reviewers(
        &self,
        summary: &SpeciesSummary,
        reviewers: &[ReviewerContact],
    ) -> Result<(), DispatchError> {
        self.push(SideEffect::NotifyReviewers {
            summary: summary.clone(),
            reviewers: reviewers.to_vec(),
        });
        Ok(())
    }

    async fn notify_author(
        &self,
        summary: &SpeciesSummary,
        outcome: ReviewOutcome,
    ) -> Result<(), DispatchError> {
        self.push(SideEffect::NotifyAuthor {
            summary: summary.clone(),
            outcome,
        });
        Ok(())
    }

    async fn award_xp(&self, user_id: &str, action: XpAction) -> Result<(), DispatchError> {
        self.push(SideEffect::AwardXp {
            user_id: user_id.to_string(),
            action,
        });
        Ok(())
    }

    async fn check_badges(&self, user_id: &str) -> Result<(), DispatchError> {
        self.push(SideEffect::CheckBadges {
            user_id: user_id.to_string(),
        });
        Ok(())
    }
}

/// Fails every call, as if the downstream services were down.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingDispatcher;

fn unavailable(service: &str) -> DispatchError {
    DispatchError::Unavailable {
        service: service.into(),
        reason: "connection refused".into(),
    }
}

#[async_trait]
impl Dispatcher for FailingDispatcher {
    async fn notify_reviewers(
        &self,
        _summary: &SpeciesSummary,
        _reviewers: &[ReviewerContact],
    ) -> Result<(), DispatchError> {
        Err(unavailable("mailer"))
    }

    async fn notify_author(
        &self,
        _summary: &SpeciesSummary,
        _outcome: ReviewOutcome,
    ) -> Result<(), DispatchError> {
        Err(unavailable("mailer"))
    }

    async fn award_xp(&self, _user_id: &str, _action: XpAction) -> Result<(), DispatchError> {
        Err(unavailable("rewards"))
    }

    async fn check_badges(&self, _user_id: &str) -> Result<(), DispatchError> {
        Err(unavailable("rewards"))
    }
}
