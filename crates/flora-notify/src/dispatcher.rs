use async_trait::async_trait;
use flora_core::entities::{ReviewerContact, SpeciesSummary};
use flora_core::enums::{ReviewOutcome, XpAction};
use tracing::info;

use crate::error::DispatchError;

/// Outbound notification and reward services.
///
/// Implementations are best-effort. Callers log and drop every error.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn notify_reviewers(
        &self,
        summary: &SpeciesSummary,
        reviewers: &[ReviewerContact],
    ) -> Result<(), DispatchError>;

    async fn notify_author(
        &self,
        summary: &SpeciesSummary,
        outcome: ReviewOutcome,
    ) -> Result<(), DispatchError>;

    async fn award_xp(&self, user_id: &str, action: XpAction) -> Result<(), DispatchError>;

    async fn check_badges(&self, user_id: &str) -> Result<(), DispatchError>;
}

/// Writes every effect to the `tracing` log and always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDispatcher;

#[async_trait]
impl Dispatcher for TracingDispatcher {
    async fn notify_reviewers(
        &self,
        summary: &SpeciesSummary,
        reviewers: &[ReviewerContact],
    ) -> Result<(), DispatchError> {
        info!(
            species_id = %summary.id,
            name = %summary.name,
            reviewers = reviewers.len(),
            "notify reviewers"
        );
        Ok(())
    }

    async fn notify_author(
        &self,
        summary: &SpeciesSummary,
        outcome: ReviewOutcome,
    ) -> Result<(), DispatchError> {
        info!(
            species_id = %summary.id,
            author = %summary.created_by,
            %outcome,
            "notify author"
        );
        Ok(())
    }

    async fn award_xp(&self, user_id: &str, action: XpAction) -> Result<(), DispatchError> {
        info!(user_id, %action, points = action.points(), "award xp");
        Ok(())
    }

    async fn check_badges(&self, user_id: &str) -> Result<(), DispatchError> {
        info!(user_id, "check badges");
        Ok(())
    }
}
