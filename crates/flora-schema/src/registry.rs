//! Central schema registry for Flora types.
//!
//! The `SchemaRegistry` builds JSON Schemas from flora-core types at
//! construction time using [`schemars::schema_for!`] and validates with
//! `jsonschema`.

use std::collections::HashMap;

use flora_core::fields::FieldMap;
use schemars::schema_for;

use crate::error::SchemaError;

/// Name of the schema every field patch is validated against.
pub const SPECIES_FIELDS: &str = "species_fields";

/// Central store of the JSON Schemas Flora validates against.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

/// Insert a schema into the map. A schema that cannot be converted is stored
/// as `false`, which rejects every instance.
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert(
            $name,
            serde_json::to_value(schema_for!($ty)).unwrap_or(serde_json::Value::Bool(false)),
        );
    };
}

impl SchemaRegistry {
    /// Build a registry with every entity, response and activity-detail schema.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // --- Fields and entities (7) ---
        register!(schemas, SPECIES_FIELDS, flora_core::fields::SpeciesFields);
        register!(schemas, "species", flora_core::entities::Species);
        register!(schemas, "review_entry", flora_core::entities::ReviewEntry);
        register!(schemas, "change_entry", flora_core::entities::ChangeEntry);
        register!(schemas, "activity_entry", flora_core::entities::ActivityEntry);
        register!(schemas, "photo", flora_core::entities::Photo);
        register!(schemas, "user", flora_core::entities::User);

        // --- Responses (1) ---
        register!(schemas, "review_status", flora_core::responses::ReviewStatus);

        // --- Activity details (3) ---
        register!(
            schemas,
            "status_changed_detail",
            flora_core::activity_detail::StatusChangedDetail
        );
        register!(schemas, "vote_detail", flora_core::activity_detail::VoteDetail);
        register!(schemas, "edit_detail", flora_core::activity_detail::EditDetail);

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// Validate a sparse field patch: known keys, correctly typed values.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::ValidationFailed` listing every offending key.
    pub fn validate_patch(&self, patch: &FieldMap) -> Result<(), SchemaError> {
        let object: serde_json::Map<String, serde_json::Value> =
            patch.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        self.validate(SPECIES_FIELDS, &serde_json::Value::Object(object))
    }

    /// List all registered schema names.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use flora_core::activity_detail::VoteDetail;
    use flora_core::entities::ReviewEntry;
    use flora_core::enums::ReviewDecision;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
    }

    fn patch(entries: &[(&str, serde_json::Value)]) -> FieldMap {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn registry_has_expected_count() {
        // 7 entities + 1 response + 3 activity details
        assert_eq!(registry().schema_count(), 11);
    }

    #[test]
    fn registry_list_is_sorted() {
        let names = registry().list();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn validate_nonexistent_schema_returns_not_found() {
        let result = registry().validate("bogus", &json!({}));
        assert!(matches!(result, Err(SchemaError::NotFound(_))));
    }

    #[test]
    fn valid_patch_passes() {
        let reg = registry();
        let p = patch(&[
            ("name", json!("Jatobá")),
            ("heightMeters", json!(12)),
            ("floweringMonths", json!(["oct"])),
            ("flowerColor", serde_json::Value::Null),
        ]);
        assert!(reg.validate_patch(&p).is_ok());
    }

    #[test]
    fn mistyped_patch_fails() {
        let reg = registry();
        let result = reg.validate_patch(&patch(&[("heightMeters", json!("tall"))]));
        match result {
            Err(SchemaError::ValidationFailed { errors }) => assert!(!errors.is_empty()),
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn patch_with_unknown_key_fails() {
        let reg = registry();
        assert!(reg.validate_patch(&patch(&[("legacyColumn", json!(1))])).is_err());
    }

    #[test]
    fn validate_review_entry() {
        let entry = ReviewEntry {
            species_id: "spc-00000001".into(),
            reviewer_id: "usr-r1".into(),
            decision: ReviewDecision::Approved,
            comments: None,
            reviewed_at: Utc::now(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(registry().validate("review_entry", &json).is_ok());
    }

    #[test]
    fn validate_vote_detail_rejects_unknown_decision() {
        let reg = registry();
        let valid = serde_json::to_value(VoteDetail {
            decision: ReviewDecision::Rejected,
            approvals: 0,
            rejections: 1,
        })
        .unwrap();
        assert!(reg.validate("vote_detail", &valid).is_ok());
        let invalid = json!({"decision": "abstain", "approvals": 0, "rejections": 0});
        assert!(reg.validate("vote_detail", &invalid).is_err());
    }
}
