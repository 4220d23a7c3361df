use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::UserRole;

/// A roster entry. IDs come from the authentication layer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// What the notifier needs to reach a reviewer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReviewerContact {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
}

impl User {
    #[must_use]
    pub fn contact(&self) -> ReviewerContact {
        ReviewerContact {
            user_id: self.id.clone(),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
        }
    }
}
