//! Integration tests for TOML and environment configuration loading.
//!
//! Uses `figment::Jail` for sandboxed files and env vars.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use flora_config::{ConfigError, DispatchMode, FloraConfig};
use pretty_assertions::assert_eq;

#[test]
fn loads_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "catalog.db"

[dispatch]
mode = "background"

[general]
default_limit = 50
"#,
        )?;

        let config: FloraConfig = Figment::from(Serialized::defaults(FloraConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.database.path, "catalog.db");
        assert_eq!(config.dispatch.mode, DispatchMode::Background);
        assert_eq!(config.general.default_limit, 50);
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[database]\npath = \"from-toml.db\"\n")?;
        jail.set_env("FLORA_DATABASE__PATH", "from-env.db");

        let config: FloraConfig = Figment::from(Serialized::defaults(FloraConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("FLORA_").split("__"))
            .extract()?;

        assert_eq!(config.database.path, "from-env.db");
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up_by_figment() {
    Jail::expect_with(|jail| {
        jail.create_dir(".flora")?;
        jail.create_file(".flora/config.toml", "[dispatch]\nmode = \"background\"\n")?;

        let config = FloraConfig::load().expect("config loads");
        assert_eq!(config.dispatch.mode, DispatchMode::Background);
        Ok(())
    });
}

#[test]
fn env_sets_dispatch_mode() {
    Jail::expect_with(|jail| {
        jail.set_env("FLORA_DISPATCH__MODE", "background");
        let config = FloraConfig::load().expect("config loads");
        assert_eq!(config.dispatch.mode, DispatchMode::Background);
        Ok(())
    });
}

#[test]
fn unknown_dispatch_mode_fails() {
    Jail::expect_with(|jail| {
        jail.set_env("FLORA_DISPATCH__MODE", "carrier_pigeon");
        assert!(matches!(FloraConfig::load(), Err(ConfigError::Figment(_))));
        Ok(())
    });
}

#[test]
fn zero_default_limit_is_invalid() {
    Jail::expect_with(|jail| {
        jail.set_env("FLORA_GENERAL__DEFAULT_LIMIT", "0");
        assert!(matches!(
            FloraConfig::load(),
            Err(ConfigError::InvalidValue { .. })
        ));
        Ok(())
    });
}
