//! Repository modules for Flora records, ledgers and collaborators.
//!
//! Each module adds methods to `CatalogService` via `impl CatalogService`
//! blocks. Helpers that run inside a caller's transaction take a
//! `&libsql::Connection` so they never touch the service lock.

pub mod activity;
pub mod changes;
pub mod lifecycle;
pub mod photos;
pub mod reviews;
pub mod species;
pub mod users;
