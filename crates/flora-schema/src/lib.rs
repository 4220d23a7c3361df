//! # flora-schema
//!
//! JSON Schema generation and validation for Flora.
//!
//! Entity types are defined in `flora-core` with `#[derive(JsonSchema)]`.
//! This crate collects their schemas into a [`SchemaRegistry`] so the storage
//! layer can validate field patches and activity details at runtime before
//! they are persisted.

pub mod error;
pub mod registry;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
