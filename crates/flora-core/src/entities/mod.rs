//! Entity structs for all Flora domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `flora-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON roundtrip and schema validation.

mod activity;
mod change;
mod photo;
mod review;
mod species;
mod user;

pub use activity::ActivityEntry;
pub use change::ChangeEntry;
pub use photo::Photo;
pub use review::ReviewEntry;
pub use species::{RevisionMarker, Species, SpeciesSummary};
pub use user::{ReviewerContact, User};
