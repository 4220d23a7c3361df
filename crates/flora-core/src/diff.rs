//! Field-level diffing for the change ledger.
//!
//! Only fields present in the proposed map are compared. A field whose
//! proposed value normalizes to the same thing as its baseline produces no
//! change, so editing with no effective difference is a no-op.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fields::FieldMap;
use crate::normalize::{normalize_stored, values_equal};

/// One field whose value effectively changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    /// Baseline value (`null` when the field was absent).
    pub previous_value: Value,
    pub new_value: Value,
}

/// Compare every proposed field against the baseline.
///
/// Output is ordered by field name. Values are compared fully normalized
/// and recorded in their stored form.
#[must_use]
pub fn diff_fields(baseline: &FieldMap, proposed: &FieldMap) -> Vec<FieldChange> {
    proposed
        .iter()
        .filter(|(field, value)| !values_equal(baseline.get(*field), Some(value)))
        .map(|(field, value)| FieldChange {
            field: field.clone(),
            previous_value: normalize_stored(baseline.get(field)),
            new_value: normalize_stored(Some(value)),
        })
        .collect()
}

/// The changes as a patch map (field → new value).
#[must_use]
pub fn changes_to_patch(changes: &[FieldChange]) -> FieldMap {
    changes
        .iter()
        .map(|c| (c.field.clone(), c.new_value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(entries: &[(&str, Value)]) -> FieldMap {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn identical_values_produce_no_changes() {
        let baseline = map(&[("name", json!("Jatobá")), ("heightMeters", json!(12.0))]);
        let proposed = map(&[("name", json!("Jatobá")), ("heightMeters", json!(12))]);
        assert!(diff_fields(&baseline, &proposed).is_empty());
    }

    #[test]
    fn representational_noise_is_suppressed() {
        let baseline = map(&[("flowerColor", Value::Null), ("uses", json!([]))]);
        let proposed = map(&[("flowerColor", json!("")), ("uses", Value::Null)]);
        assert!(diff_fields(&baseline, &proposed).is_empty());
    }

    #[test]
    fn changed_field_is_reported_with_both_values() {
        let baseline = map(&[("heightMeters", json!(12))]);
        let proposed = map(&[("heightMeters", json!(15))]);
        let changes = diff_fields(&baseline, &proposed);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "heightMeters");
        assert_eq!(changes[0].previous_value, json!(12));
        assert_eq!(changes[0].new_value, json!(15));
    }

    #[test]
    fn recorded_values_are_normalized() {
        let baseline = map(&[("heightMeters", json!(12.0))]);
        let proposed = map(&[("heightMeters", json!({"$numberDecimal": "15"}))]);
        let changes = diff_fields(&baseline, &proposed);
        assert_eq!(changes[0].previous_value, json!(12));
        assert_eq!(changes[0].new_value, json!(15));
    }

    #[test]
    fn recorded_arrays_keep_their_elements() {
        let baseline = map(&[("floweringMonths", json!(["jan"]))]);
        let proposed = map(&[("floweringMonths", json!(["jan", ""]))]);
        let changes = diff_fields(&baseline, &proposed);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].new_value, json!(["jan", ""]));
    }

    #[test]
    fn field_missing_from_baseline_reports_null_previous() {
        let changes = diff_fields(&FieldMap::new(), &map(&[("family", json!("Fabaceae"))]));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].previous_value, Value::Null);
    }

    #[test]
    fn fields_not_proposed_are_ignored() {
        let baseline = map(&[("name", json!("Ipê")), ("family", json!("Bignoniaceae"))]);
        let proposed = map(&[("name", json!("Ipê-amarelo"))]);
        let changes = diff_fields(&baseline, &proposed);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "name");
        assert_eq!(
            changes_to_patch(&changes),
            map(&[("name", json!("Ipê-amarelo"))])
        );
    }
}
