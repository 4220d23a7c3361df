//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

fn default_log_level() -> String {
    "warn".into()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Fallback `tracing` filter when `FLORA_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Default result limit for list/history commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_limit: default_limit(),
        }
    }
}
