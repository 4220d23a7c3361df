//! Canonical species fields and the editable-field allow-list.
//!
//! `SpeciesFields` is the typed, canonical shape of a record's public data.
//! Edits arrive as a sparse `FieldMap` keyed by the camelCase field name;
//! `EDITABLE_FIELDS` is the fixed allow-list every patch and every overlay
//! merge is checked against.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoreError;

/// Sparse field-name → value map used for patches, diffs and overlays.
pub type FieldMap = BTreeMap<String, Value>;

/// Every field a contributor or reviewer may edit.
///
/// Kept in sync with `SpeciesFields` (see the `allow_list_matches_struct` test).
pub const EDITABLE_FIELDS: &[&str] = &[
    // Classification
    "name",
    "scientificName",
    "family",
    "genus",
    "specificEpithet",
    "taxonomicAuthority",
    "synonyms",
    "commonNames",
    // Origin and distribution
    "originType",
    "endemism",
    "conservationStatus",
    "biomes",
    "vegetationTypes",
    "distribution",
    // Morphology
    "lifeForm",
    "growthHabit",
    "heightMeters",
    "trunkDiameterCm",
    "crownDiameterMeters",
    "growthRate",
    "lifespanYears",
    "successionalGroup",
    "leafType",
    "leafPersistence",
    // Phenology and reproduction
    "floweringMonths",
    "flowerColor",
    "fruitingMonths",
    "fruitType",
    "seedDispersal",
    "pollinators",
    // Ecology and cultivation
    "lightRequirement",
    "soilTypes",
    "waterRequirement",
    "minTemperatureCelsius",
    "altitudeMinMeters",
    "altitudeMaxMeters",
    "uses",
    "toxicity",
    // Free text
    "description",
    "ecologicalNotes",
    "cultivationNotes",
    "references",
];

/// Whether `field` is in the editable allow-list.
#[must_use]
pub fn is_editable(field: &str) -> bool {
    EDITABLE_FIELDS.contains(&field)
}

/// Reject a patch that names any field outside the allow-list.
///
/// # Errors
///
/// Returns `CoreError::UnknownField` for the first unknown key.
pub fn check_editable(patch: &FieldMap) -> Result<(), CoreError> {
    match patch.keys().find(|k| !is_editable(k)) {
        Some(unknown) => Err(CoreError::UnknownField(unknown.clone())),
        None => Ok(()),
    }
}

/// Canonical, publicly visible data of a species record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SpeciesFields {
    pub name: Option<String>,
    pub scientific_name: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
    pub specific_epithet: Option<String>,
    pub taxonomic_authority: Option<String>,
    pub synonyms: Option<Vec<String>>,
    pub common_names: Option<Vec<String>>,

    pub origin_type: Option<String>,
    pub endemism: Option<String>,
    pub conservation_status: Option<String>,
    pub biomes: Option<Vec<String>>,
    pub vegetation_types: Option<Vec<String>>,
    pub distribution: Option<Vec<String>>,

    pub life_form: Option<String>,
    pub growth_habit: Option<String>,
    pub height_meters: Option<f64>,
    pub trunk_diameter_cm: Option<f64>,
    pub crown_diameter_meters: Option<f64>,
    pub growth_rate: Option<String>,
    pub lifespan_years: Option<i64>,
    pub successional_group: Option<String>,
    pub leaf_type: Option<String>,
    pub leaf_persistence: Option<String>,

    pub flowering_months: Option<Vec<String>>,
    pub flower_color: Option<String>,
    pub fruiting_months: Option<Vec<String>>,
    pub fruit_type: Option<String>,
    pub seed_dispersal: Option<Vec<String>>,
    pub pollinators: Option<Vec<String>>,

    pub light_requirement: Option<String>,
    pub soil_types: Option<Vec<String>>,
    pub water_requirement: Option<String>,
    pub min_temperature_celsius: Option<f64>,
    pub altitude_min_meters: Option<f64>,
    pub altitude_max_meters: Option<f64>,
    pub uses: Option<Vec<String>>,
    pub toxicity: Option<String>,

    pub description: Option<String>,
    pub ecological_notes: Option<String>,
    pub cultivation_notes: Option<String>,
    pub references: Option<Vec<String>>,
}

impl SpeciesFields {
    /// Build canonical fields from a patch applied to empty fields.
    ///
    /// # Errors
    ///
    /// See [`SpeciesFields::with_patch`].
    pub fn from_patch(patch: &FieldMap) -> Result<Self, CoreError> {
        Self::default().with_patch(patch)
    }

    /// The fields as a complete name → value map (absent fields are `null`).
    #[must_use]
    pub fn to_field_map(&self) -> FieldMap {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => FieldMap::new(),
        }
    }

    /// Return a copy with every allow-listed key of `patch` written over.
    ///
    /// Keys outside the allow-list are skipped; callers that must reject them
    /// run [`check_editable`] first.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if a value has the wrong type for its field.
    pub fn with_patch(&self, patch: &FieldMap) -> Result<Self, CoreError> {
        let mut map = self.to_field_map();
        for (field, value) in patch {
            if is_editable(field) {
                map.insert(field.clone(), value.clone());
            }
        }
        let object: serde_json::Map<String, Value> = map.into_iter().collect();
        serde_json::from_value(Value::Object(object))
            .map_err(|e| CoreError::Validation(format!("invalid species fields: {e}")))
    }

    /// The display name, if present and not blank.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// Every record must carry a name.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` when the name is missing or blank.
    pub fn require_name(&self) -> Result<(), CoreError> {
        self.display_name()
            .map(|_| ())
            .ok_or_else(|| CoreError::Validation("name is required".into()))
    }
}
