//! Photo repository. Photos stay pending until their record publishes.

use chrono::Utc;
use tracing::info;

use flora_core::entities::Photo;
use flora_core::enums::PhotoStatus;
use flora_core::ids::PREFIX_PHOTO;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum};
use crate::repos::species::{load_species, require_species};
use crate::service::CatalogService;
use crate::{begin, finish, generate_id};

fn row_to_photo(row: &libsql::Row) -> Result<Photo, DatabaseError> {
    Ok(Photo {
        id: row.get::<String>(0)?,
        species_id: row.get::<String>(1)?,
        url: row.get::<String>(2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        uploaded_by: row.get::<String>(4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

/// Approve every pending photo of a record inside the caller's transaction.
pub(crate) async fn approve_pending_photos(
    conn: &libsql::Connection,
    species_id: &str,
) -> Result<u64, DatabaseError> {
    Ok(conn
        .execute(
            "UPDATE species_photos SET status = 'approved'
             WHERE species_id = ?1 AND status = 'pending'",
            [species_id],
        )
        .await?)
}

impl CatalogService {
    /// Attach a pending photo to a record.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank URL, `NotFound` if the record does not exist.
    pub async fn attach_photo(
        &self,
        species_id: &str,
        url: &str,
        uploaded_by: &str,
    ) -> Result<Photo, DatabaseError> {
        if url.trim().is_empty() {
            return Err(DatabaseError::Validation("photo url is required".into()));
        }

        let conn = self.db().lock().await;
        let tx = begin(&conn).await?;
        let result = insert_photo(&tx, species_id, url.trim(), uploaded_by).await;
        let photo = finish(tx, result).await?;

        info!(species_id, photo_id = %photo.id, "photo attached");
        Ok(photo)
    }

    /// Photos of a record in upload order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the record does not exist.
    pub async fn list_photos(&self, species_id: &str) -> Result<Vec<Photo>, DatabaseError> {
        let conn = self.db().lock().await;
        require_species(&conn, species_id).await?;
        let mut rows = conn
            .query(
                "SELECT id, species_id, url, status, uploaded_by, created_at
                 FROM species_photos WHERE species_id = ?1 ORDER BY rowid",
                [species_id],
            )
            .await?;
        let mut photos = Vec::new();
        while let Some(row) = rows.next().await? {
            photos.push(row_to_photo(&row)?);
        }
        Ok(photos)
    }
}

async fn insert_photo(
    conn: &libsql::Connection,
    species_id: &str,
    url: &str,
    uploaded_by: &str,
) -> Result<Photo, DatabaseError> {
    load_species(conn, species_id).await?;
    let photo = Photo {
        id: generate_id(conn, PREFIX_PHOTO).await?,
        species_id: species_id.to_string(),
        url: url.to_string(),
        status: PhotoStatus::Pending,
        uploaded_by: uploaded_by.to_string(),
        created_at: Utc::now(),
    };
    conn.execute(
        "INSERT INTO species_photos (id, species_id, url, status, uploaded_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            photo.id.as_str(),
            photo.species_id.as_str(),
            photo.url.as_str(),
            photo.status.as_str(),
            photo.uploaded_by.as_str(),
            photo.created_at.to_rfc3339()
        ],
    )
    .await?;
    Ok(photo)
}
