//! Service layer orchestrating lifecycle transactions and side effects.
//!
//! `CatalogService` wraps `FloraDb` (raw database access), `SchemaRegistry`
//! (field validation) and a `Dispatcher` (notifications and rewards). All
//! repo methods are implemented as `impl CatalogService` blocks.

use std::sync::Arc;

use flora_config::{DispatchMode, FloraConfig};
use flora_core::fields::{FieldMap, check_editable};
use flora_core::normalize::normalize_fields;
use flora_notify::{Dispatcher, SideEffect, TracingDispatcher, run_effects};
use flora_schema::SchemaRegistry;
use tracing::debug;

use crate::FloraDb;
use crate::error::DatabaseError;

/// Runs every lifecycle operation against the store.
///
/// Every mutation follows this protocol:
/// 1. Validate input that does not need the record
/// 2. Lock the connection and `BEGIN IMMEDIATE`
/// 3. Load, check, transition, write ledgers and activity
/// 4. Commit (or roll back on any error)
/// 5. Release the lock and dispatch collected side effects
pub struct CatalogService {
    db: FloraDb,
    schema: SchemaRegistry,
    dispatcher: Arc<dyn Dispatcher>,
    dispatch_mode: DispatchMode,
}

impl CatalogService {
    /// Open a local database with the logging dispatcher and inline dispatch.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = FloraDb::open_local(db_path).await?;
        Ok(Self::from_db(db, Arc::new(TracingDispatcher), DispatchMode::Inline))
    }

    /// Open the configured database with the configured dispatch mode.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn from_config(config: &FloraConfig) -> Result<Self, DatabaseError> {
        let db = FloraDb::open_local(&config.database.path).await?;
        Ok(Self::from_db(
            db,
            Arc::new(TracingDispatcher),
            config.dispatch.mode,
        ))
    }

    #[must_use]
    pub fn from_db(db: FloraDb, dispatcher: Arc<dyn Dispatcher>, dispatch_mode: DispatchMode) -> Self {
        Self {
            db,
            schema: SchemaRegistry::new(),
            dispatcher,
            dispatch_mode,
        }
    }

    /// Replace the dispatcher.
    #[must_use]
    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn Dispatcher>) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &FloraDb {
        &self.db
    }

    /// Access the schema registry.
    #[must_use]
    pub const fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    #[must_use]
    pub const fn dispatch_mode(&self) -> DispatchMode {
        self.dispatch_mode
    }

    /// Check a proposed patch and return it in stored form.
    ///
    /// Only top-level values are collapsed, so list elements reach the schema
    /// as given. Rejects keys outside the allow-list and values the field
    /// schema does not accept.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation`.
    pub fn prepare_patch(&self, patch: &FieldMap) -> Result<FieldMap, DatabaseError> {
        check_editable(patch)?;
        let normalized = normalize_fields(patch);
        self.schema.validate_patch(&normalized)?;
        Ok(normalized)
    }

    /// Run post-commit side effects. Never fails.
    pub(crate) async fn dispatch(&self, effects: Vec<SideEffect>) {
        if effects.is_empty() {
            return;
        }
        match self.dispatch_mode {
            DispatchMode::Inline => {
                let report = run_effects(self.dispatcher.as_ref(), effects).await;
                debug!(
                    attempted = report.attempted,
                    failed = report.failed,
                    "side effects dispatched"
                );
            }
            DispatchMode::Background => {
                let dispatcher = Arc::clone(&self.dispatcher);
                tokio::spawn(async move {
                    run_effects(dispatcher.as_ref(), effects).await;
                });
            }
        }
    }
}
