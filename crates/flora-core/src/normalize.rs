//! Value normalization for change tracking.
//!
//! Two field values are "the same" when their normalized forms are
//! structurally equal. Normalization collapses representational noise:
//!
//! - absent, `null`, `""` and `[]` all become `null`
//! - decimal wrappers (`{"$numberDecimal": "12.5"}`, `{"$decimal": 12.5}`)
//!   become plain numbers
//! - numbers compare by value, so `12` and `12.0` are equal
//! - arrays normalize element-wise and stay order-sensitive
//! - object entries that normalize to `null` are dropped
//!
//! Stored values get a shallower pass ([`normalize_stored`]): only the
//! top-level value is collapsed or unwrapped, so array elements and nested
//! objects are kept exactly as given.
//!
//! Everything here is pure and total.

use serde_json::{Map, Number, Value};

use crate::fields::FieldMap;

/// Keys that mark a single-entry object as a decimal wrapper.
const DECIMAL_WRAPPER_KEYS: &[&str] = &["$numberDecimal", "$decimal"];

/// Normalize a possibly-absent value. Absent normalizes to `null`.
#[must_use]
pub fn normalize(value: Option<&Value>) -> Value {
    value.map_or(Value::Null, normalize_value)
}

/// Whether two possibly-absent values are equal after normalization.
#[must_use]
pub fn values_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    normalize(a) == normalize(b)
}

/// Collapse a possibly-absent value to the form that gets stored.
///
/// Empty forms become `null` and a top-level number or decimal wrapper
/// becomes a canonical number. Arrays and objects are otherwise untouched.
#[must_use]
pub fn normalize_stored(value: Option<&Value>) -> Value {
    match value {
        None | Some(Value::Null) => Value::Null,
        Some(Value::String(s)) if s.is_empty() => Value::Null,
        Some(Value::Array(items)) if items.is_empty() => Value::Null,
        Some(Value::Number(n)) => canonical_number(n),
        Some(Value::Object(map)) => decimal_wrapper(map).unwrap_or_else(|| Value::Object(map.clone())),
        Some(other) => other.clone(),
    }
}

/// Apply [`normalize_stored`] to every value of a field map, keeping the keys.
///
/// Fields whose value collapses to `null` are kept as explicit `null` so a
/// patch can still clear a field.
#[must_use]
pub fn normalize_fields(fields: &FieldMap) -> FieldMap {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), normalize_stored(Some(v))))
        .collect()
}

fn normalize_value(value: &Value) -> Value {
    match value {
        Value::String(s) if s.is_empty() => Value::Null,
        Value::Array(items) if items.is_empty() => Value::Null,
        Value::Array(items) => Value::Array(items.iter().map(normalize_value).collect()),
        Value::Number(n) => canonical_number(n),
        Value::Object(map) => decimal_wrapper(map).unwrap_or_else(|| normalize_object(map)),
        Value::Null | Value::Bool(_) | Value::String(_) => value.clone(),
    }
}

fn normalize_object(map: &Map<String, Value>) -> Value {
    let normalized: Map<String, Value> = map
        .iter()
        .map(|(k, v)| (k.clone(), normalize_value(v)))
        .filter(|(_, v)| !v.is_null())
        .collect();
    Value::Object(normalized)
}

fn decimal_wrapper(map: &Map<String, Value>) -> Option<Value> {
    if map.len() != 1 {
        return None;
    }
    let (key, inner) = map.iter().next()?;
    if !DECIMAL_WRAPPER_KEYS.contains(&key.as_str()) {
        return None;
    }
    match inner {
        Value::Number(n) => Some(canonical_number(n)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(number_from_f64),
        _ => None,
    }
}

/// Integral values become integers so `12`, `12.0` and `"12"` wrapped as a
/// decimal all end up as the same JSON number.
fn canonical_number(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        return Value::from(i);
    }
    if n.is_u64() {
        return Value::Number(n.clone());
    }
    n.as_f64()
        .and_then(number_from_f64)
        .unwrap_or_else(|| Value::Number(n.clone()))
}

#[allow(
    clippy::float_cmp,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
fn number_from_f64(f: f64) -> Option<Value> {
    if !f.is_finite() {
        return None;
    }
    if f.trunc() == f && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        return Some(Value::from(f as i64));
    }
    Number::from_f64(f).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(None, None)]
    #[case(None, Some(json!(null)))]
    #[case(None, Some(json!("")))]
    #[case(None, Some(json!([])))]
    #[case(Some(json!(null)), Some(json!("")))]
    #[case(Some(json!("")), Some(json!([])))]
    #[case(Some(json!([])), Some(json!(null)))]
    fn empty_representations_are_equal(#[case] a: Option<Value>, #[case] b: Option<Value>) {
        assert!(values_equal(a.as_ref(), b.as_ref()));
        assert!(values_equal(b.as_ref(), a.as_ref()));
    }

    #[rstest]
    #[case(json!("Jatobá"))]
    #[case(json!(0))]
    #[case(json!(false))]
    #[case(json!(["cerrado"]))]
    #[case(json!(" "))]
    fn empty_differs_from_real_value(#[case] real: Value) {
        for empty in [None, Some(json!(null)), Some(json!("")), Some(json!([]))] {
            assert!(!values_equal(empty.as_ref(), Some(&real)), "{empty:?} vs {real}");
        }
    }

    #[test]
    fn integer_and_float_forms_are_equal() {
        assert!(values_equal(Some(&json!(12)), Some(&json!(12.0))));
        assert!(!values_equal(Some(&json!(12)), Some(&json!(12.5))));
    }

    #[test]
    fn decimal_wrapper_unwraps_to_number() {
        assert!(values_equal(
            Some(&json!({"$numberDecimal": "12.50"})),
            Some(&json!(12.5))
        ));
        assert!(values_equal(Some(&json!({"$decimal": 15})), Some(&json!(15.0))));
        assert_eq!(normalize(Some(&json!({"$numberDecimal": "15"}))), json!(15));
    }

    #[test]
    fn malformed_decimal_wrapper_stays_an_object() {
        let odd = json!({"$numberDecimal": "not a number"});
        assert_eq!(normalize(Some(&odd)), odd);
        assert!(!values_equal(Some(&odd), None));
    }

    #[test]
    fn arrays_are_order_sensitive() {
        assert!(values_equal(
            Some(&json!(["jan", "feb"])),
            Some(&json!(["jan", "feb"]))
        ));
        assert!(!values_equal(
            Some(&json!(["jan", "feb"])),
            Some(&json!(["feb", "jan"]))
        ));
    }

    #[test]
    fn arrays_normalize_element_wise() {
        assert!(values_equal(
            Some(&json!([1, {"$numberDecimal": "2"}])),
            Some(&json!([1.0, 2]))
        ));
    }

    #[test]
    fn object_entries_normalizing_to_null_are_dropped() {
        assert!(values_equal(
            Some(&json!({"a": 1, "b": "", "c": []})),
            Some(&json!({"a": 1.0}))
        ));
    }

    #[test]
    fn normalize_fields_keeps_explicit_clears() {
        let mut patch = FieldMap::new();
        patch.insert("flowerColor".into(), json!(""));
        patch.insert("heightMeters".into(), json!({"$numberDecimal": "15.0"}));
        let normalized = normalize_fields(&patch);
        assert_eq!(normalized.get("flowerColor"), Some(&Value::Null));
        assert_eq!(normalized.get("heightMeters"), Some(&json!(15)));
    }

    #[test]
    fn stored_form_keeps_array_elements() {
        assert_eq!(
            normalize_stored(Some(&json!(["jan", ""]))),
            json!(["jan", ""])
        );
        assert_eq!(
            normalize_stored(Some(&json!({"note": "", "$decimal": 1}))),
            json!({"note": "", "$decimal": 1})
        );
        assert_eq!(normalize_stored(Some(&json!([]))), Value::Null);
        assert_eq!(normalize_stored(Some(&json!(12.0))), json!(12));
    }

    #[test]
    fn normalize_fields_keeps_empty_array_elements() {
        let mut patch = FieldMap::new();
        patch.insert("floweringMonths".into(), json!(["jan", ""]));
        let normalized = normalize_fields(&patch);
        assert_eq!(normalized.get("floweringMonths"), Some(&json!(["jan", ""])));
    }

    #[test]
    fn non_finite_decimal_does_not_panic() {
        let huge = json!({"$numberDecimal": "1e999"});
        assert_eq!(normalize(Some(&huge)), huge);
    }
}
