//! Local libSQL database configuration.

use serde::{Deserialize, Serialize};

/// Path understood by libSQL as a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

fn default_path() -> String {
    "flora.db".into()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database file, or `:memory:`.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_file() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, "flora.db");
        assert!(!config.is_in_memory());
    }

    #[test]
    fn memory_path_detected() {
        let config = DatabaseConfig {
            path: IN_MEMORY.into(),
        };
        assert!(config.is_in_memory());
    }
}
