//! # flora-config
//!
//! Layered configuration loading for Flora using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`FLORA_*` prefix, `__` as separator)
//! 2. Project-level `.flora/config.toml`
//! 3. User-level `~/.config/flora/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `FLORA_DATABASE__PATH` -> `database.path` and
//! `FLORA_DISPATCH__MODE` -> `dispatch.mode`.
//!
//! # Usage
//!
//! ```no_run
//! use flora_config::FloraConfig;
//!
//! let config = FloraConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod database;
mod dispatch;
mod error;
mod general;

pub use database::{DatabaseConfig, IN_MEMORY};
pub use dispatch::{DispatchConfig, DispatchMode};
pub use error::ConfigError;
pub use general::GeneralConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FloraConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl FloraConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does not read `.env`; use [`FloraConfig::load_with_dotenv`] for that.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed, or
    /// `ConfigError::InvalidValue` if a loaded value is unusable.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration after reading `.env` from the working directory.
    ///
    /// # Errors
    ///
    /// See [`FloraConfig::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// See [`FloraConfig::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".flora/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("FLORA_").split("__"))
    }

    /// Reject values that would only fail later.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.general.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.default_limit".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("flora").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = FloraConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dispatch.mode, DispatchMode::Inline);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let mut config = FloraConfig::default();
        config.general.default_limit = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
