//! Executes side effects against a dispatcher.

use tracing::{debug, warn};

use crate::dispatcher::Dispatcher;
use crate::effect::SideEffect;
use crate::error::DispatchError;

/// What happened when a batch of effects ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub attempted: usize,
    pub failed: usize,
}

/// Execute effects sequentially.
///
/// A failed effect is logged and execution continues with the rest.
pub async fn run_effects(dispatcher: &dyn Dispatcher, effects: Vec<SideEffect>) -> DispatchReport {
    let mut report = DispatchReport::default();

    for effect in effects {
        report.attempted += 1;
        let kind = effect.kind();
        match execute_effect(dispatcher, effect).await {
            Ok(()) => debug!(effect = kind, "side effect dispatched"),
            Err(e) => {
                report.failed += 1;
                warn!(effect = kind, error = %e, "side effect failed; continuing");
            }
        }
    }

    report
}

async fn execute_effect(dispatcher: &dyn Dispatcher, effect: SideEffect) -> Result<(), DispatchError> {
    match effect {
        SideEffect::NotifyReviewers { summary, reviewers } => {
            dispatcher.notify_reviewers(&summary, &reviewers).await
        }
        SideEffect::NotifyAuthor { summary, outcome } => {
            dispatcher.notify_author(&summary, outcome).await
        }
        SideEffect::AwardXp { user_id, action } => dispatcher.award_xp(&user_id, action).await,
        SideEffect::CheckBadges { user_id } => dispatcher.check_badges(&user_id).await,
    }
}
