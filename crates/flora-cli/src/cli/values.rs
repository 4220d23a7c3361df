use serde::de::DeserializeOwned;

/// Clap value parser for snake_case enums from `flora-core`.
///
/// Hyphens are accepted in place of underscores (`in-review`).
pub fn enum_arg<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let normalized = raw.trim().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| format!("unknown value '{raw}'"))
}
