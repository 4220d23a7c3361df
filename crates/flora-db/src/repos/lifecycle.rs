//! Lifecycle engine: submission, voting, reviewer edits, resubmission and
//! revision requests.
//!
//! Each operation loads the record inside a `BEGIN IMMEDIATE` transaction,
//! applies the pure transition from `flora_core::transitions`, writes the
//! ledgers and the activity log, and collects `SideEffect`s. Effects are
//! dispatched only after commit and after the connection lock is released.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use flora_core::APPROVAL_QUORUM;
use flora_core::activity_detail::{EditDetail, StatusChangedDetail, VoteDetail};
use flora_core::diff::diff_fields;
use flora_core::entities::{ReviewEntry, RevisionMarker, Species};
use flora_core::enums::{
    ActivityAction, ReviewDecision, ReviewOutcome, SpeciesStatus, XpAction,
};
use flora_core::fields::FieldMap;
use flora_core::transitions::Rejection;
use flora_notify::SideEffect;

use crate::error::DatabaseError;
use crate::repos::activity::{detail_value, record_activity};
use crate::repos::changes::append_changes;
use crate::repos::photos::approve_pending_photos;
use crate::repos::reviews::{clear_reviews, count_decisions, upsert_review};
use crate::repos::species::{load_species, store_species};
use crate::repos::users::{require_reviewer, reviewer_roster};
use crate::service::CatalogService;
use crate::{begin, finish};

type Effects = Vec<SideEffect>;

impl CatalogService {
    /// `draft` → `in_review`. Notifies reviewers and rewards the author.
    ///
    /// # Errors
    ///
    /// `Forbidden` for anyone but the author, `InvalidState` unless the
    /// record is a draft, `NotFound`.
    pub async fn submit(&self, species_id: &str, author_id: &str) -> Result<Species, DatabaseError> {
        let conn = self.db().lock().await;
        let tx = begin(&conn).await?;
        let result = submit_in(&tx, species_id, author_id, Utc::now()).await;
        let (species, effects) = finish(tx, result).await?;
        drop(conn);

        info!(species_id, author = author_id, "species submitted for review");
        self.dispatch(effects).await;
        Ok(species)
    }

    /// Record or replace a reviewer's vote and apply the quorum rule.
    ///
    /// The vote that brings live approvals to the quorum publishes the
    /// record. Any rejecting vote closes the review cycle.
    ///
    /// # Errors
    ///
    /// `Forbidden` for the author or a user without a reviewing role,
    /// `InvalidState` unless the record is under review, `NotFound`.
    pub async fn cast_vote(
        &self,
        species_id: &str,
        reviewer_id: &str,
        decision: ReviewDecision,
        comments: Option<&str>,
    ) -> Result<ReviewEntry, DatabaseError> {
        let comments = comments.map(str::trim).filter(|c| !c.is_empty());

        let conn = self.db().lock().await;
        let tx = begin(&conn).await?;
        let result = cast_vote_in(&tx, species_id, reviewer_id, decision, comments, Utc::now()).await;
        let (entry, effects) = finish(tx, result).await?;
        drop(conn);

        info!(species_id, reviewer = reviewer_id, %decision, "vote recorded");
        self.dispatch(effects).await;
        Ok(entry)
    }

    /// Edit a record under review.
    ///
    /// New submissions are edited in place. Revision requests collect edits
    /// in the draft overlay until publish. Fields whose normalized value is
    /// unchanged are ignored; if nothing changes the record is returned as is.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank reason or bad fields, `Forbidden` for a user
    /// without a reviewing role, `InvalidState` unless the record is under
    /// review, `NotFound`.
    pub async fn reviewer_edit(
        &self,
        species_id: &str,
        reviewer_id: &str,
        fields: &FieldMap,
        reason: &str,
    ) -> Result<Species, DatabaseError> {
        let reason = require_reason(reason)?;
        let patch = self.prepare_patch(fields)?;

        let conn = self.db().lock().await;
        let tx = begin(&conn).await?;
        let result = reviewer_edit_in(&tx, species_id, reviewer_id, &patch, reason, Utc::now()).await;
        finish(tx, result).await
    }

    /// `rejected` → `in_review`, dropping every previous vote.
    ///
    /// # Errors
    ///
    /// `Forbidden` for anyone but the author, `InvalidState` unless the
    /// record was rejected, `NotFound`.
    pub async fn resubmit(&self, species_id: &str, author_id: &str) -> Result<Species, DatabaseError> {
        let conn = self.db().lock().await;
        let tx = begin(&conn).await?;
        let result = resubmit_in(&tx, species_id, author_id, Utc::now()).await;
        let (species, effects) = finish(tx, result).await?;
        drop(conn);

        info!(species_id, author = author_id, "species resubmitted");
        self.dispatch(effects).await;
        Ok(species)
    }

    /// `published` → `in_review` as a revision request.
    ///
    /// Any user may ask for a revision. Canonical fields stay visible and
    /// untouched until the revision is approved.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank reason, `InvalidState` unless the record is
    /// published, `NotFound`.
    pub async fn request_revision(
        &self,
        species_id: &str,
        requester_id: &str,
        reason: &str,
    ) -> Result<Species, DatabaseError> {
        let reason = require_reason(reason)?;

        let conn = self.db().lock().await;
        let tx = begin(&conn).await?;
        let result = request_revision_in(&tx, species_id, requester_id, reason, Utc::now()).await;
        let (species, effects) = finish(tx, result).await?;
        drop(conn);

        info!(species_id, requester = requester_id, "revision requested");
        self.dispatch(effects).await;
        Ok(species)
    }
}

fn require_reason(reason: &str) -> Result<&str, DatabaseError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(DatabaseError::Validation("a reason is required".into()));
    }
    Ok(reason)
}

fn require_author(species: &Species, user_id: &str, action: &str) -> Result<(), DatabaseError> {
    if species.is_author(user_id) {
        Ok(())
    } else {
        Err(DatabaseError::Forbidden(format!(
            "only the author may {action} species {}",
            species.id
        )))
    }
}

fn status_change(from: SpeciesStatus, to: SpeciesStatus, reason: Option<&str>) -> StatusChangedDetail {
    StatusChangedDetail {
        from,
        to,
        reason: reason.map(str::to_string),
    }
}

async fn status_activity(
    conn: &libsql::Connection,
    species: &Species,
    actor_id: &str,
    action: ActivityAction,
    detail: &StatusChangedDetail,
    now: DateTime<Utc>,
) -> Result<(), DatabaseError> {
    record_activity(conn, &species.id, actor_id, action, Some(detail_value(detail)?), now).await?;
    Ok(())
}

async fn submit_in(
    conn: &libsql::Connection,
    species_id: &str,
    author_id: &str,
    now: DateTime<Utc>,
) -> Result<(Species, Effects), DatabaseError> {
    let mut species = load_species(conn, species_id).await?;
    require_author(&species, author_id, "submit")?;
    let from = species.status;
    species.submit(now)?;
    store_species(conn, &species).await?;
    status_activity(
        conn,
        &species,
        author_id,
        ActivityAction::Submitted,
        &status_change(from, species.status, None),
        now,
    )
    .await?;

    let mut effects = vec![SideEffect::NotifyReviewers {
        summary: species.summary(),
        reviewers: reviewer_roster(conn, &species.created_by).await?,
    }];
    effects.extend(SideEffect::reward(author_id, XpAction::Submitted));
    Ok((species, effects))
}

async fn cast_vote_in(
    conn: &libsql::Connection,
    species_id: &str,
    reviewer_id: &str,
    decision: ReviewDecision,
    comments: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(ReviewEntry, Effects), DatabaseError> {
    let mut species = load_species(conn, species_id).await?;
    if species.is_author(reviewer_id) {
        return Err(DatabaseError::Forbidden(format!(
            "authors cannot review their own species {species_id}"
        )));
    }
    require_reviewer(conn, reviewer_id).await?;
    if species.status != SpeciesStatus::InReview {
        return Err(DatabaseError::InvalidState(format!(
            "species {species_id} is {}, not in_review",
            species.status
        )));
    }

    let entry = ReviewEntry {
        species_id: species_id.to_string(),
        reviewer_id: reviewer_id.to_string(),
        decision,
        comments: comments.map(str::to_string),
        reviewed_at: now,
    };
    upsert_review(conn, &entry).await?;
    let (approvals, rejections) = count_decisions(conn, species_id).await?;

    let detail = VoteDetail {
        decision,
        approvals,
        rejections,
    };
    record_activity(
        conn,
        species_id,
        reviewer_id,
        ActivityAction::Voted,
        Some(detail_value(&detail)?),
        now,
    )
    .await?;

    let mut effects: Effects = SideEffect::reward(reviewer_id, XpAction::ReviewCast).into();

    match decision {
        ReviewDecision::Approved if approvals >= APPROVAL_QUORUM => {
            let dropped = species.publish(now)?;
            if !dropped.is_empty() {
                warn!(species_id, ?dropped, "overlay keys outside the editable set were dropped");
            }
            let photos = approve_pending_photos(conn, species_id).await?;
            store_species(conn, &species).await?;
            status_activity(
                conn,
                &species,
                reviewer_id,
                ActivityAction::Published,
                &status_change(SpeciesStatus::InReview, species.status, None),
                now,
            )
            .await?;
            debug!(species_id, approvals, photos, "quorum reached");

            effects.push(SideEffect::NotifyAuthor {
                summary: species.summary(),
                outcome: ReviewOutcome::Published,
            });
            effects.extend(SideEffect::reward(&species.created_by, XpAction::Published));
        }
        ReviewDecision::Approved => {
            debug!(species_id, approvals, quorum = APPROVAL_QUORUM, "awaiting quorum");
        }
        ReviewDecision::Rejected => {
            let rejection = species.close_rejected(now)?;
            store_species(conn, &species).await?;
            let action = match rejection {
                Rejection::Rejected => ActivityAction::Rejected,
                Rejection::RevisionDiscarded => ActivityAction::RevisionDiscarded,
            };
            status_activity(
                conn,
                &species,
                reviewer_id,
                action,
                &status_change(SpeciesStatus::InReview, species.status, entry.comments.as_deref()),
                now,
            )
            .await?;

            effects.push(SideEffect::NotifyAuthor {
                summary: species.summary(),
                outcome: rejection.into(),
            });
        }
    }

    Ok((entry, effects))
}

async fn reviewer_edit_in(
    conn: &libsql::Connection,
    species_id: &str,
    reviewer_id: &str,
    patch: &FieldMap,
    reason: &str,
    now: DateTime<Utc>,
) -> Result<Species, DatabaseError> {
    let mut species = load_species(conn, species_id).await?;
    require_reviewer(conn, reviewer_id).await?;
    let baseline = species.edit_baseline()?;

    let changes = diff_fields(&baseline, patch);
    if changes.is_empty() {
        debug!(species_id, reviewer = reviewer_id, "reviewer edit with no effective change");
        return Ok(species);
    }

    let target = species.apply_review_edit(&changes, now)?;
    store_species(conn, &species).await?;
    append_changes(conn, species_id, reviewer_id, reason, &changes, now).await?;

    let detail = EditDetail {
        fields: changes.iter().map(|c| c.field.clone()).collect(),
        target,
        reason: Some(reason.to_string()),
    };
    record_activity(
        conn,
        species_id,
        reviewer_id,
        ActivityAction::Edited,
        Some(detail_value(&detail)?),
        now,
    )
    .await?;

    info!(species_id, reviewer = reviewer_id, fields = changes.len(), ?target, "reviewer edit applied");
    Ok(species)
}

async fn resubmit_in(
    conn: &libsql::Connection,
    species_id: &str,
    author_id: &str,
    now: DateTime<Utc>,
) -> Result<(Species, Effects), DatabaseError> {
    let mut species = load_species(conn, species_id).await?;
    require_author(&species, author_id, "resubmit")?;
    let from = species.status;
    species.resubmit(now)?;
    let cleared = clear_reviews(conn, species_id).await?;
    store_species(conn, &species).await?;
    status_activity(
        conn,
        &species,
        author_id,
        ActivityAction::Resubmitted,
        &status_change(from, species.status, None),
        now,
    )
    .await?;
    debug!(species_id, cleared, "previous votes cleared");

    Ok((species, SideEffect::reward(author_id, XpAction::Resubmitted).into()))
}

async fn request_revision_in(
    conn: &libsql::Connection,
    species_id: &str,
    requester_id: &str,
    reason: &str,
    now: DateTime<Utc>,
) -> Result<(Species, Effects), DatabaseError> {
    let mut species = load_species(conn, species_id).await?;
    let from = species.status;
    let marker = RevisionMarker {
        requested_by: requester_id.to_string(),
        reason: reason.to_string(),
        requested_at: now,
    };
    species.request_revision(marker, now)?;
    let cleared = clear_reviews(conn, species_id).await?;
    store_species(conn, &species).await?;
    status_activity(
        conn,
        &species,
        requester_id,
        ActivityAction::RevisionRequested,
        &status_change(from, species.status, Some(reason)),
        now,
    )
    .await?;
    debug!(species_id, cleared, "previous votes cleared");

    let mut effects = vec![SideEffect::NotifyReviewers {
        summary: species.summary(),
        reviewers: reviewer_roster(conn, &species.created_by).await?,
    }];
    effects.extend(SideEffect::reward(requester_id, XpAction::IssueReported));
    Ok((species, effects))
}
