//! Species repository: drafts, record loading and listing.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use flora_core::activity_detail::EditDetail;
use flora_core::diff::diff_fields;
use flora_core::entities::{RevisionMarker, Species};
use flora_core::enums::{ActivityAction, ReviewContext, SpeciesStatus};
use flora_core::fields::{FieldMap, SpeciesFields};
use flora_core::ids::PREFIX_SPECIES;
use flora_core::overlay::DraftOverlay;
use flora_core::transitions::EditTarget;

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, parse_datetime, parse_enum, parse_json, parse_optional_datetime, to_json_text,
};
use crate::repos::activity::{detail_value, record_activity};
use crate::service::CatalogService;
use crate::{begin, finish, generate_id};

const SPECIES_COLS: &str = "id, status, review_context, fields, draft_overlay, created_by, \
     submitted_at, published_at, revision_requested_by, revision_reason, revision_requested_at, \
     version, created_at, updated_at";

/// Filter criteria for species listings.
#[derive(Debug, Default)]
pub struct SpeciesFilter {
    pub status: Option<SpeciesStatus>,
    pub created_by: Option<String>,
    pub limit: Option<u32>,
}

fn row_to_species(row: &libsql::Row) -> Result<Species, DatabaseError> {
    let id = row.get::<String>(0)?;
    let overlay = match get_opt_string(row, 4)? {
        Some(text) => DraftOverlay::from_fields(parse_json::<FieldMap>(&text)?),
        None => DraftOverlay::None,
    };
    let revision = match (
        get_opt_string(row, 8)?,
        get_opt_string(row, 9)?,
        parse_optional_datetime(get_opt_string(row, 10)?.as_deref())?,
    ) {
        (Some(requested_by), Some(reason), Some(requested_at)) => Some(RevisionMarker {
            requested_by,
            reason,
            requested_at,
        }),
        (None, None, None) => None,
        _ => {
            return Err(DatabaseError::Query(format!(
                "species {id} has an incomplete revision marker"
            )));
        }
    };

    Ok(Species {
        status: parse_enum(&row.get::<String>(1)?)?,
        review_context: parse_enum(&row.get::<String>(2)?)?,
        fields: parse_json(&row.get::<String>(3)?)?,
        draft_overlay: overlay,
        revision,
        created_by: row.get::<String>(5)?,
        submitted_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        published_at: parse_optional_datetime(get_opt_string(row, 7)?.as_deref())?,
        version: row.get::<i64>(11)?,
        created_at: parse_datetime(&row.get::<String>(12)?)?,
        updated_at: parse_datetime(&row.get::<String>(13)?)?,
        id,
    })
}

/// Load a record inside the caller's transaction.
pub(crate) async fn load_species(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Species, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SPECIES_COLS} FROM species WHERE id = ?1"),
            [id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::species_not_found(id))?;
    row_to_species(&row)
}

/// Fail with `NotFound` unless the record exists.
pub(crate) async fn require_species(
    conn: &libsql::Connection,
    id: &str,
) -> Result<(), DatabaseError> {
    let mut rows = conn
        .query("SELECT 1 FROM species WHERE id = ?1", [id])
        .await?;
    rows.next()
        .await?
        .map(|_| ())
        .ok_or_else(|| DatabaseError::species_not_found(id))
}

/// Write every mutable column of `species` back.
pub(crate) async fn store_species(
    conn: &libsql::Connection,
    species: &Species,
) -> Result<(), DatabaseError> {
    species.check_invariants()?;
    let overlay = species.draft_overlay.fields().map(to_json_text).transpose()?;
    let revision = species.revision.as_ref();
    let affected = conn
        .execute(
            "UPDATE species SET status = ?2, review_context = ?3, name = ?4, fields = ?5,
                 draft_overlay = ?6, submitted_at = ?7, published_at = ?8,
                 revision_requested_by = ?9, revision_reason = ?10, revision_requested_at = ?11,
                 version = ?12, updated_at = ?13
             WHERE id = ?1",
            libsql::params![
                species.id.as_str(),
                species.status.as_str(),
                species.review_context.as_str(),
                species.fields.display_name().unwrap_or_default(),
                to_json_text(&species.fields)?,
                overlay,
                species.submitted_at.map(|t| t.to_rfc3339()),
                species.published_at.map(|t| t.to_rfc3339()),
                revision.map(|r| r.requested_by.clone()),
                revision.map(|r| r.reason.clone()),
                revision.map(|r| r.requested_at.to_rfc3339()),
                species.version,
                species.updated_at.to_rfc3339()
            ],
        )
        .await?;
    if affected == 0 {
        return Err(DatabaseError::species_not_found(&species.id));
    }
    Ok(())
}

impl CatalogService {
    /// Create a DRAFT record owned by `author_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for unknown or mistyped fields or
    /// a missing name.
    pub async fn create_draft(
        &self,
        author_id: &str,
        fields: &FieldMap,
    ) -> Result<Species, DatabaseError> {
        let patch = self.prepare_patch(fields)?;
        let fields = SpeciesFields::from_patch(&patch)?;
        fields.require_name()?;

        let conn = self.db().lock().await;
        let tx = begin(&conn).await?;
        let result = insert_draft(&tx, author_id, fields, Utc::now()).await;
        let species = finish(tx, result).await?;

        info!(species_id = %species.id, author = author_id, "draft created");
        Ok(species)
    }

    /// Apply a partial patch to the author's own DRAFT.
    ///
    /// A patch with no effective change returns the record untouched.
    ///
    /// # Errors
    ///
    /// `Forbidden` for anyone but the author, `InvalidState` unless the
    /// record is a draft, `Validation` for bad fields, `NotFound`.
    pub async fn update_draft(
        &self,
        species_id: &str,
        author_id: &str,
        fields: &FieldMap,
    ) -> Result<Species, DatabaseError> {
        let patch = self.prepare_patch(fields)?;

        let conn = self.db().lock().await;
        let tx = begin(&conn).await?;
        let result = update_draft_in(&tx, species_id, author_id, &patch, Utc::now()).await;
        finish(tx, result).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the record does not exist.
    pub async fn get_species(&self, species_id: &str) -> Result<Species, DatabaseError> {
        let conn = self.db().lock().await;
        load_species(&conn, species_id).await
    }

    /// List records, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_species(&self, filter: &SpeciesFilter) -> Result<Vec<Species>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(status) = filter.status {
            params.push(libsql::Value::Text(status.as_str().to_string()));
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(ref author) = filter.created_by {
            params.push(libsql::Value::Text(author.clone()));
            conditions.push(format!("created_by = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {SPECIES_COLS} FROM species {where_clause}
             ORDER BY updated_at DESC, rowid DESC LIMIT {limit}"
        );

        let conn = self.db().lock().await;
        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        let mut species = Vec::new();
        while let Some(row) = rows.next().await? {
            species.push(row_to_species(&row)?);
        }
        Ok(species)
    }
}

async fn insert_draft(
    conn: &libsql::Connection,
    author_id: &str,
    fields: SpeciesFields,
    now: DateTime<Utc>,
) -> Result<Species, DatabaseError> {
    let species = Species {
        id: generate_id(conn, PREFIX_SPECIES).await?,
        status: SpeciesStatus::Draft,
        review_context: ReviewContext::None,
        fields,
        draft_overlay: DraftOverlay::None,
        revision: None,
        created_by: author_id.to_string(),
        submitted_at: None,
        published_at: None,
        version: 1,
        created_at: now,
        updated_at: now,
    };

    conn.execute(
        "INSERT INTO species (id, status, review_context, name, fields, created_by, version, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        libsql::params![
            species.id.as_str(),
            species.status.as_str(),
            species.review_context.as_str(),
            species.fields.display_name().unwrap_or_default(),
            to_json_text(&species.fields)?,
            author_id,
            species.version,
            now.to_rfc3339(),
            now.to_rfc3339()
        ],
    )
    .await?;

    record_activity(conn, &species.id, author_id, ActivityAction::Created, None, now).await?;
    Ok(species)
}

async fn update_draft_in(
    conn: &libsql::Connection,
    species_id: &str,
    author_id: &str,
    patch: &FieldMap,
    now: DateTime<Utc>,
) -> Result<Species, DatabaseError> {
    let mut species = load_species(conn, species_id).await?;
    if !species.is_author(author_id) {
        return Err(DatabaseError::Forbidden(format!(
            "only the author may edit draft {species_id}"
        )));
    }
    if species.status != SpeciesStatus::Draft {
        return Err(DatabaseError::InvalidState(format!(
            "species {species_id} is {}, not draft",
            species.status
        )));
    }

    let changes = diff_fields(&species.fields.to_field_map(), patch);
    if changes.is_empty() {
        debug!(species_id, "draft update with no effective change");
        return Ok(species);
    }

    species.apply_draft_edit(&changes, now)?;
    store_species(conn, &species).await?;

    let detail = EditDetail {
        fields: changes.iter().map(|c| c.field.clone()).collect(),
        target: EditTarget::Canonical,
        reason: None,
    };
    record_activity(
        conn,
        species_id,
        author_id,
        ActivityAction::DraftUpdated,
        Some(detail_value(&detail)?),
        now,
    )
    .await?;
    debug!(species_id, fields = changes.len(), "draft updated");
    Ok(species)
}
