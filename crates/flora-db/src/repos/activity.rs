//! Activity log repository.
//!
//! Append-only lifecycle entries, written inside the transaction of the
//! transition they describe.

use chrono::{DateTime, Utc};
use serde::Serialize;

use flora_core::entities::ActivityEntry;
use flora_core::enums::ActivityAction;
use flora_core::ids::PREFIX_ACTIVITY;

use crate::error::DatabaseError;
use crate::generate_ledger_id;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::repos::species::require_species;
use crate::service::CatalogService;

/// Filter criteria for activity queries.
#[derive(Debug, Default)]
pub struct ActivityFilter {
    pub species_id: Option<String>,
    pub actor_id: Option<String>,
    pub action: Option<ActivityAction>,
    pub limit: Option<u32>,
}

fn row_to_activity(row: &libsql::Row) -> Result<ActivityEntry, DatabaseError> {
    Ok(ActivityEntry {
        id: row.get::<String>(0)?,
        species_id: row.get::<String>(1)?,
        actor_id: row.get::<String>(2)?,
        action: parse_enum(&row.get::<String>(3)?)?,
        detail: parse_optional_json(get_opt_string(row, 4)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

/// Serialize a typed detail payload.
pub(crate) fn detail_value<T: Serialize>(detail: &T) -> Result<serde_json::Value, DatabaseError> {
    serde_json::to_value(detail).map_err(|e| DatabaseError::Other(e.into()))
}

/// Append an activity entry inside the caller's transaction.
pub(crate) async fn record_activity(
    conn: &libsql::Connection,
    species_id: &str,
    actor_id: &str,
    action: ActivityAction,
    detail: Option<serde_json::Value>,
    now: DateTime<Utc>,
) -> Result<ActivityEntry, DatabaseError> {
    let entry = ActivityEntry {
        id: generate_ledger_id(conn, PREFIX_ACTIVITY).await?,
        species_id: species_id.to_string(),
        actor_id: actor_id.to_string(),
        action,
        detail,
        created_at: now,
    };
    conn.execute(
        "INSERT INTO species_activity (id, species_id, actor_id, action, detail, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            entry.id.as_str(),
            entry.species_id.as_str(),
            entry.actor_id.as_str(),
            entry.action.as_str(),
            entry.detail.as_ref().map(std::string::ToString::to_string),
            entry.created_at.to_rfc3339()
        ],
    )
    .await?;
    Ok(entry)
}

impl CatalogService {
    /// Query activity with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_activity(
        &self,
        filter: &ActivityFilter,
    ) -> Result<Vec<ActivityEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref sid) = filter.species_id {
            params.push(libsql::Value::Text(sid.clone()));
            conditions.push(format!("species_id = ?{}", params.len()));
        }
        if let Some(ref actor) = filter.actor_id {
            params.push(libsql::Value::Text(actor.clone()));
            conditions.push(format!("actor_id = ?{}", params.len()));
        }
        if let Some(action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT id, species_id, actor_id, action, detail, created_at
             FROM species_activity {where_clause}
             ORDER BY rowid DESC LIMIT {limit}"
        );

        let conn = self.db().lock().await;
        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_activity(&row)?);
        }
        Ok(entries)
    }

    /// Full activity history of one record, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the record does not exist.
    pub async fn get_activity(&self, species_id: &str) -> Result<Vec<ActivityEntry>, DatabaseError> {
        let conn = self.db().lock().await;
        require_species(&conn, species_id).await?;
        let mut rows = conn
            .query(
                "SELECT id, species_id, actor_id, action, detail, created_at
                 FROM species_activity WHERE species_id = ?1 ORDER BY rowid",
                [species_id],
            )
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_activity(&row)?);
        }
        Ok(entries)
    }
}
