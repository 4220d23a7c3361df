//! Change ledger repository.
//!
//! One immutable row per effectively changed field. The table rejects
//! updates and deletes with triggers; rows come back in insertion order.

use chrono::{DateTime, Utc};
use tracing::debug;

use flora_core::diff::FieldChange;
use flora_core::entities::ChangeEntry;
use flora_core::ids::PREFIX_CHANGE;

use crate::error::DatabaseError;
use crate::generate_ledger_id;
use crate::helpers::{parse_datetime, parse_json, to_json_text};
use crate::repos::species::require_species;
use crate::service::CatalogService;

fn row_to_change(row: &libsql::Row) -> Result<ChangeEntry, DatabaseError> {
    Ok(ChangeEntry {
        id: row.get::<String>(0)?,
        species_id: row.get::<String>(1)?,
        field: row.get::<String>(2)?,
        previous_value: parse_json(&row.get::<String>(3)?)?,
        new_value: parse_json(&row.get::<String>(4)?)?,
        changed_by: row.get::<String>(5)?,
        reason: row.get::<String>(6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

/// Append one ledger row per change inside the caller's transaction.
///
/// Values are stored as JSON text, so `null` survives the round trip.
pub(crate) async fn append_changes(
    conn: &libsql::Connection,
    species_id: &str,
    changed_by: &str,
    reason: &str,
    changes: &[FieldChange],
    now: DateTime<Utc>,
) -> Result<Vec<ChangeEntry>, DatabaseError> {
    let mut entries = Vec::with_capacity(changes.len());
    for change in changes {
        let entry = ChangeEntry {
            id: generate_ledger_id(conn, PREFIX_CHANGE).await?,
            species_id: species_id.to_string(),
            field: change.field.clone(),
            previous_value: change.previous_value.clone(),
            new_value: change.new_value.clone(),
            changed_by: changed_by.to_string(),
            reason: reason.to_string(),
            created_at: now,
        };
        conn.execute(
            "INSERT INTO species_changes (id, species_id, field, previous_value, new_value, changed_by, reason, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            libsql::params![
                entry.id.as_str(),
                entry.species_id.as_str(),
                entry.field.as_str(),
                to_json_text(&entry.previous_value)?,
                to_json_text(&entry.new_value)?,
                entry.changed_by.as_str(),
                entry.reason.as_str(),
                entry.created_at.to_rfc3339()
            ],
        )
        .await?;
        entries.push(entry);
    }
    debug!(species_id, count = entries.len(), "change ledger appended");
    Ok(entries)
}

impl CatalogService {
    /// Every recorded field change of a record, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the record does not exist.
    pub async fn get_change_history(
        &self,
        species_id: &str,
    ) -> Result<Vec<ChangeEntry>, DatabaseError> {
        let conn = self.db().lock().await;
        require_species(&conn, species_id).await?;
        let mut rows = conn
            .query(
                "SELECT id, species_id, field, previous_value, new_value, changed_by, reason, created_at
                 FROM species_changes WHERE species_id = ?1 ORDER BY rowid",
                [species_id],
            )
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_change(&row)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{REVIEWER_A, seeded_service, submitted};
    use flora_core::fields::FieldMap;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn null_values_survive_the_ledger() {
        let (svc, _) = seeded_service().await;
        let species = submitted(&svc).await;
        let patch = FieldMap::from([("family".to_string(), json!("Fabaceae"))]);
        svc.reviewer_edit(&species.id, REVIEWER_A, &patch, "classification")
            .await
            .unwrap();

        let history = svc.get_change_history(&species.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].previous_value, Value::Null);
        assert_eq!(history[0].new_value, json!("Fabaceae"));
        assert_eq!(history[0].reason, "classification");
    }

    #[tokio::test]
    async fn history_keeps_insertion_order() {
        let (svc, _) = seeded_service().await;
        let species = submitted(&svc).await;
        for height in [13, 14, 15] {
            let patch = FieldMap::from([("heightMeters".to_string(), json!(height))]);
            svc.reviewer_edit(&species.id, REVIEWER_A, &patch, "measured")
                .await
                .unwrap();
        }

        let values: Vec<Value> = svc
            .get_change_history(&species.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.new_value)
            .collect();
        assert_eq!(values, vec![json!(13), json!(14), json!(15)]);
    }

    #[tokio::test]
    async fn ledger_rows_cannot_be_deleted() {
        let (svc, _) = seeded_service().await;
        let species = submitted(&svc).await;
        let patch = FieldMap::from([("heightMeters".to_string(), json!(15))]);
        svc.reviewer_edit(&species.id, REVIEWER_A, &patch, "measured")
            .await
            .unwrap();

        let conn = svc.db().lock().await;
        assert!(conn.execute("DELETE FROM species_changes", ()).await.is_err());
        assert!(
            conn.execute("UPDATE species_changes SET reason = 'x'", ())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn history_of_missing_record_is_not_found() {
        let (svc, _) = seeded_service().await;
        assert!(matches!(
            svc.get_change_history("spc-00000000").await,
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn history_of_unedited_record_is_empty() {
        let (svc, _) = seeded_service().await;
        let species = submitted(&svc).await;
        assert!(svc.get_change_history(&species.id).await.unwrap().is_empty());
    }
}
