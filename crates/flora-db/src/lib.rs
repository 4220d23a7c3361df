//! # flora-db
//!
//! libSQL storage and the review lifecycle engine for Flora.
//!
//! Holds species records, the review ledger, the change ledger, the activity
//! log, the reviewer roster and photos. Every lifecycle operation runs as one
//! `BEGIN IMMEDIATE` transaction on a single connection guarded by an async
//! mutex, so concurrent votes on a record are applied one after another and
//! each sees the previous one's write.
//!
//! The mutex covers reads and operations on unrelated records too. Nothing
//! blocks on a lock held across a dispatch or other I/O, so a caller waits at
//! most for the transactions queued ahead of it, and SQLite would serialize
//! those writers on a shared file anyway. An in-memory database is private
//! to its connection, so a separate read connection is not an option for
//! `:memory:` stores.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;

use error::DatabaseError;
use libsql::{Builder, TransactionBehavior};
use tokio::sync::{Mutex, MutexGuard};
use tracing::warn;

/// Central database handle.
///
/// The connection lives behind a mutex; hold the guard for the whole of a
/// transaction.
pub struct FloraDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: Mutex<libsql::Connection>,
}

impl FloraDb {
    /// Open a local database at `path` (or `:memory:`).
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Per-connection in SQLite
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;
        let mut rows = conn
            .query("PRAGMA busy_timeout = 5000", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA busy_timeout: {e}")))?;
        rows.next().await?;
        drop(rows);

        migrations::run(&conn).await?;
        Ok(Self {
            db,
            conn: Mutex::new(conn),
        })
    }

    /// Wait for exclusive use of the connection.
    pub async fn lock(&self) -> MutexGuard<'_, libsql::Connection> {
        self.conn.lock().await
    }
}

/// Generate a prefixed ID via libSQL, e.g. `"spc-a3f8b2c1"`.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails or returns no rows.
pub async fn generate_id(conn: &libsql::Connection, prefix: &str) -> Result<String, DatabaseError> {
    random_id(conn, prefix, 4).await
}

/// Generate a wider prefixed ID for append-only ledger rows, e.g.
/// `"chg-a3f8b2c1d4e5f607"`.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails or returns no rows.
pub async fn generate_ledger_id(
    conn: &libsql::Connection,
    prefix: &str,
) -> Result<String, DatabaseError> {
    random_id(conn, prefix, 8).await
}

async fn random_id(
    conn: &libsql::Connection,
    prefix: &str,
    bytes: u8,
) -> Result<String, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT '{prefix}-' || lower(hex(randomblob({bytes})))"),
            (),
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<String>(0)?)
}

/// Start a write transaction that takes the database write lock up front.
pub(crate) async fn begin(conn: &libsql::Connection) -> Result<libsql::Transaction, DatabaseError> {
    Ok(conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .await?)
}

/// Commit on success, roll back on error.
pub(crate) async fn finish<T>(
    tx: libsql::Transaction,
    result: Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                warn!(error = %rollback, "rollback failed");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod test_support;
