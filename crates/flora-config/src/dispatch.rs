//! Side-effect dispatch configuration.

use serde::{Deserialize, Serialize};

/// When post-commit notifications run relative to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Awaited after commit, before the operation returns. Failures are
    /// still only logged.
    #[default]
    Inline,
    /// Spawned onto the runtime and never awaited.
    Background,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DispatchConfig {
    #[serde(default)]
    pub mode: DispatchMode,
}
