use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::PhotoStatus;

/// A photo attached to a species record. Pending until the record publishes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Photo {
    pub id: String,
    pub species_id: String,
    pub url: String,
    pub status: PhotoStatus,
    pub uploaded_by: String,
    pub created_at: DateTime<Utc>,
}
