use anyhow::{Context, bail};
use flora_core::fields::FieldMap;
use serde_json::Value;

use crate::cli::root_commands::FieldArgs;

/// Build a field map from `--json` and repeated `--field key=value`.
///
/// `--field` entries are applied after `--json`, so they win on conflict.
pub fn parse_fields(args: &FieldArgs) -> anyhow::Result<FieldMap> {
    let mut fields = match args.json.as_deref() {
        Some(raw) => serde_json::from_str::<FieldMap>(raw)
            .context("--json must be a JSON object of field values")?,
        None => FieldMap::new(),
    };

    for pair in &args.field {
        let Some((key, raw)) = pair.split_once('=') else {
            bail!("invalid --field '{pair}': expected key=value");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("invalid --field '{pair}': empty key");
        }
        fields.insert(key.to_string(), field_value(raw));
    }

    if fields.is_empty() {
        bail!("no fields given; use --field key=value or --json");
    }
    Ok(fields)
}

/// JSON if it parses as JSON, otherwise the raw text.
fn field_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
