//! Review ledger repository.
//!
//! One live vote per `(species_id, reviewer_id)`; a second vote from the
//! same reviewer overwrites the first.

use flora_core::APPROVAL_QUORUM;
use flora_core::entities::ReviewEntry;
use flora_core::responses::ReviewStatus;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::repos::species::{load_species, require_species};
use crate::service::CatalogService;

fn row_to_review(row: &libsql::Row) -> Result<ReviewEntry, DatabaseError> {
    Ok(ReviewEntry {
        species_id: row.get::<String>(0)?,
        reviewer_id: row.get::<String>(1)?,
        decision: parse_enum(&row.get::<String>(2)?)?,
        comments: get_opt_string(row, 3)?,
        reviewed_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

/// Insert or replace a reviewer's vote.
pub(crate) async fn upsert_review(
    conn: &libsql::Connection,
    entry: &ReviewEntry,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO species_reviews (species_id, reviewer_id, decision, comments, reviewed_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (species_id, reviewer_id) DO UPDATE SET
             decision = excluded.decision,
             comments = excluded.comments,
             reviewed_at = excluded.reviewed_at",
        libsql::params![
            entry.species_id.as_str(),
            entry.reviewer_id.as_str(),
            entry.decision.as_str(),
            entry.comments.as_deref(),
            entry.reviewed_at.to_rfc3339()
        ],
    )
    .await?;
    Ok(())
}

/// Live `(approvals, rejections)` for a record.
pub(crate) async fn count_decisions(
    conn: &libsql::Connection,
    species_id: &str,
) -> Result<(u32, u32), DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT
                 COALESCE(SUM(CASE WHEN decision = 'approved' THEN 1 ELSE 0 END), 0),
                 COALESCE(SUM(CASE WHEN decision = 'rejected' THEN 1 ELSE 0 END), 0)
             FROM species_reviews WHERE species_id = ?1",
            [species_id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    let approvals = u32::try_from(row.get::<i64>(0)?)
        .map_err(|e| DatabaseError::Query(format!("approval count: {e}")))?;
    let rejections = u32::try_from(row.get::<i64>(1)?)
        .map_err(|e| DatabaseError::Query(format!("rejection count: {e}")))?;
    Ok((approvals, rejections))
}

/// Drop every vote on a record. Returns how many were removed.
pub(crate) async fn clear_reviews(
    conn: &libsql::Connection,
    species_id: &str,
) -> Result<u64, DatabaseError> {
    Ok(conn
        .execute("DELETE FROM species_reviews WHERE species_id = ?1", [species_id])
        .await?)
}

pub(crate) async fn list_reviews_in(
    conn: &libsql::Connection,
    species_id: &str,
) -> Result<Vec<ReviewEntry>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT species_id, reviewer_id, decision, comments, reviewed_at
             FROM species_reviews WHERE species_id = ?1 ORDER BY reviewed_at, reviewer_id",
            [species_id],
        )
        .await?;
    let mut entries = Vec::new();
    while let Some(row) = rows.next().await? {
        entries.push(row_to_review(&row)?);
    }
    Ok(entries)
}

impl CatalogService {
    /// Live votes on a record.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the record does not exist.
    pub async fn list_reviews(&self, species_id: &str) -> Result<Vec<ReviewEntry>, DatabaseError> {
        let conn = self.db().lock().await;
        require_species(&conn, species_id).await?;
        list_reviews_in(&conn, species_id).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the record does not exist.
    pub async fn approval_count(&self, species_id: &str) -> Result<u32, DatabaseError> {
        let conn = self.db().lock().await;
        require_species(&conn, species_id).await?;
        Ok(count_decisions(&conn, species_id).await?.0)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the record does not exist.
    pub async fn rejection_count(&self, species_id: &str) -> Result<u32, DatabaseError> {
        let conn = self.db().lock().await;
        require_species(&conn, species_id).await?;
        Ok(count_decisions(&conn, species_id).await?.1)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the record does not exist.
    pub async fn has_voted(&self, species_id: &str, reviewer_id: &str) -> Result<bool, DatabaseError> {
        let conn = self.db().lock().await;
        require_species(&conn, species_id).await?;
        let mut rows = conn
            .query(
                "SELECT 1 FROM species_reviews WHERE species_id = ?1 AND reviewer_id = ?2",
                [species_id, reviewer_id],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }

    /// Status, counts and entries read together under one lock.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the record does not exist.
    pub async fn get_review_status(&self, species_id: &str) -> Result<ReviewStatus, DatabaseError> {
        let conn = self.db().lock().await;
        let species = load_species(&conn, species_id).await?;
        let (approval_count, rejection_count) = count_decisions(&conn, species_id).await?;
        let entries = list_reviews_in(&conn, species_id).await?;
        Ok(ReviewStatus {
            species_id: species.id,
            status: species.status,
            approval_count,
            rejection_count,
            quorum: APPROVAL_QUORUM,
            entries,
        })
    }
}
