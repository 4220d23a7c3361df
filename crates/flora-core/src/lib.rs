//! # flora-core
//!
//! Core types, field normalization, and the review state machine for Flora.
//!
//! This crate provides the foundational types shared across all Flora crates:
//! - Entity structs for the species record, review entries, change entries,
//!   activity entries, users, and photos
//! - Status and review-context enums with state machine transitions
//! - The editable-field allow-list and the sparse draft overlay
//! - Value normalization and field diffing for change tracking
//! - Pure lifecycle transitions on `Species`
//! - ID prefix constants and cross-cutting error types

pub mod activity_detail;
pub mod diff;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod fields;
pub mod ids;
pub mod normalize;
pub mod overlay;
pub mod responses;
pub mod transitions;

/// Number of live `approved` votes that publishes a record under review.
pub const APPROVAL_QUORUM: u32 = 2;
