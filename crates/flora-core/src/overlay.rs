//! Sparse draft overlay for revision-request review cycles.
//!
//! While a published record is back under review, reviewer edits accumulate
//! in the overlay and the canonical fields stay live and untouched. On publish
//! the overlay is merged through the `EDITABLE_FIELDS` allow-list, so keys left
//! behind by an older field set are dropped instead of applied.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::diff::FieldChange;
use crate::errors::CoreError;
use crate::fields::{FieldMap, SpeciesFields, is_editable};

/// Pending edits attached to a record, or nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "fields", rename_all = "snake_case")]
pub enum DraftOverlay {
    #[default]
    None,
    Pending(FieldMap),
}

/// Result of merging an overlay into canonical fields.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayMerge {
    pub fields: SpeciesFields,
    /// Overlay keys outside the allow-list that were not applied.
    pub dropped: Vec<String>,
}

impl DraftOverlay {
    /// Wrap a map, collapsing an empty map to `None`.
    #[must_use]
    pub fn from_fields(fields: FieldMap) -> Self {
        if fields.is_empty() {
            Self::None
        } else {
            Self::Pending(fields)
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Pending(fields) => fields.is_empty(),
        }
    }

    /// The pending fields, if any.
    #[must_use]
    pub const fn fields(&self) -> Option<&FieldMap> {
        match self {
            Self::None => None,
            Self::Pending(fields) => Some(fields),
        }
    }

    /// Canonical fields with pending values laid over them (overlay wins).
    ///
    /// This is the baseline reviewers see and edit during a revision request.
    #[must_use]
    pub fn overlay_on(&self, canonical: &SpeciesFields) -> FieldMap {
        let mut view = canonical.to_field_map();
        if let Some(pending) = self.fields() {
            view.extend(pending.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        view
    }

    /// A new overlay with `changes` recorded on top of the current one.
    #[must_use]
    pub fn with_changes(&self, changes: &[FieldChange]) -> Self {
        let mut pending = self.fields().cloned().unwrap_or_default();
        for change in changes {
            pending.insert(change.field.clone(), change.new_value.clone());
        }
        Self::from_fields(pending)
    }

    /// Merge the allow-listed pending values into `canonical`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if a pending value no longer fits its
    /// field's type.
    pub fn merge_into(&self, canonical: &SpeciesFields) -> Result<OverlayMerge, CoreError> {
        let Some(pending) = self.fields() else {
            return Ok(OverlayMerge {
                fields: canonical.clone(),
                dropped: Vec::new(),
            });
        };
        let (applicable, stale): (FieldMap, FieldMap) =
            pending.clone().into_iter().partition(|(k, _)| is_editable(k));
        Ok(OverlayMerge {
            fields: canonical.with_patch(&applicable)?,
            dropped: stale.into_keys().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn canonical() -> SpeciesFields {
        SpeciesFields {
            name: Some("Jatobá".into()),
            height_meters: Some(12.0),
            ..Default::default()
        }
    }

    fn change(field: &str, new_value: Value) -> FieldChange {
        FieldChange {
            field: field.into(),
            previous_value: Value::Null,
            new_value,
        }
    }

    #[test]
    fn empty_map_collapses_to_none() {
        assert_eq!(DraftOverlay::from_fields(FieldMap::new()), DraftOverlay::None);
        assert!(DraftOverlay::None.is_empty());
    }

    #[test]
    fn overlay_wins_over_canonical() {
        let overlay = DraftOverlay::None.with_changes(&[change("heightMeters", json!(15))]);
        let view = overlay.overlay_on(&canonical());
        assert_eq!(view.get("heightMeters"), Some(&json!(15)));
        assert_eq!(view.get("name"), Some(&json!("Jatobá")));
    }

    #[test]
    fn merge_applies_pending_values() {
        let overlay = DraftOverlay::None.with_changes(&[change("heightMeters", json!(15))]);
        let merged = overlay.merge_into(&canonical()).unwrap();
        assert_eq!(merged.fields.height_meters, Some(15.0));
        assert_eq!(merged.fields.name.as_deref(), Some("Jatobá"));
        assert!(merged.dropped.is_empty());
    }

    #[test]
    fn merge_drops_stale_keys() {
        let mut pending = FieldMap::new();
        pending.insert("heightMeters".into(), json!(15));
        pending.insert("retiredField".into(), json!("x"));
        let merged = DraftOverlay::Pending(pending)
            .merge_into(&canonical())
            .unwrap();
        assert_eq!(merged.fields.height_meters, Some(15.0));
        assert_eq!(merged.dropped, vec!["retiredField".to_string()]);
    }

    #[test]
    fn merge_of_none_is_identity() {
        let merged = DraftOverlay::None.merge_into(&canonical()).unwrap();
        assert_eq!(merged.fields, canonical());
    }

    #[test]
    fn serde_shape_is_tagged() {
        let overlay = DraftOverlay::None.with_changes(&[change("heightMeters", json!(15))]);
        let json = serde_json::to_value(&overlay).unwrap();
        assert_eq!(
            json,
            json!({"kind": "pending", "fields": {"heightMeters": 15}})
        );
    }
}
