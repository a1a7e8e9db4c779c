//! Raw feature records as they arrive from callers.
//!
//! A [`RawRecord`] is an unordered mapping of feature name to scalar value.
//! Values keep their JSON representation until a schema asks for them, at
//! which point [`FeatureValue::coerce`] turns them into `f64`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;
use crate::schema::FeatureSchema;

/// Value used for schema fields the record does not provide.
///
/// The trained artifacts were fitted with missing values imputed as zero, so
/// this must stay `0.0` rather than a mean or median.
pub const DEFAULT_FILL: f64 = 0.0;

/// A single scalar feature value.
///
/// Deserializes from any JSON scalar. Arrays and objects match no variant and
/// are rejected by the deserializer, as are number literals outside the `f64`
/// range (`1e400`), which the JSON parser refuses before any variant is tried.
/// The string `"1e400"` is a valid `Text` and only fails in [`coerce`].
///
/// [`coerce`]: FeatureValue::coerce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FeatureValue {
    /// Read the value as a number.
    ///
    /// `Ok(None)` means "missing" (JSON null). Booleans map to 1/0, strings
    /// must parse as a finite decimal number.
    pub fn coerce(&self, field: &str) -> Result<Option<f64>, ReconcileError> {
        match self {
            Self::Null => Ok(None),
            Self::Bool(b) => Ok(Some(if *b { 1.0 } else { 0.0 })),
            Self::Number(x) if x.is_finite() => Ok(Some(*x)),
            Self::Number(x) => Err(invalid(field, x.to_string())),
            Self::Text(s) => match s.trim().parse::<f64>() {
                Ok(x) if x.is_finite() => Ok(Some(x)),
                _ => Err(invalid(field, s.clone())),
            },
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(x: f64) -> Self {
        Self::Number(x)
    }
}

impl From<bool> for FeatureValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

fn invalid(field: &str, value: String) -> ReconcileError {
    ReconcileError::InvalidValue {
        field: field.to_string(),
        value,
    }
}

/// Loosely-structured input: any subset or superset of the known features.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(HashMap<String, FeatureValue>);

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FeatureValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    /// Numeric value for `name`, with absent and null fields default-filled.
    pub fn numeric(&self, name: &str) -> Result<f64, ReconcileError> {
        match self.0.get(name) {
            None => Ok(DEFAULT_FILL),
            Some(v) => Ok(v.coerce(name)?.unwrap_or(DEFAULT_FILL)),
        }
    }

    /// Names that none of the given schemas mention.
    pub fn unknown_fields<'a>(&'a self, schemas: &[&FeatureSchema]) -> Vec<&'a str> {
        let mut unknown: Vec<&str> = self
            .names()
            .filter(|name| !schemas.iter().any(|s| s.contains(name)))
            .collect();
        unknown.sort_unstable();
        unknown
    }

    /// Schema fields that the record does not supply a value for.
    pub fn missing_fields<'a>(&self, schema: &'a FeatureSchema) -> Vec<&'a str> {
        schema
            .names()
            .iter()
            .map(|n| n.as_str())
            .filter(|n| matches!(self.0.get(*n), None | Some(FeatureValue::Null)))
            .collect()
    }
}

impl From<HashMap<String, FeatureValue>> for RawRecord {
    fn from(map: HashMap<String, FeatureValue>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<FeatureValue>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_numbers_and_booleans() {
        assert_eq!(FeatureValue::Number(28.5).coerce("bmi").unwrap(), Some(28.5));
        assert_eq!(FeatureValue::Bool(true).coerce("smoker").unwrap(), Some(1.0));
        assert_eq!(FeatureValue::Bool(false).coerce("smoker").unwrap(), Some(0.0));
    }

    #[test]
    fn coerce_numeric_strings() {
        assert_eq!(FeatureValue::from(" 45 ").coerce("age").unwrap(), Some(45.0));
        assert_eq!(FeatureValue::from("1e2").coerce("income").unwrap(), Some(100.0));
    }

    #[test]
    fn coerce_rejects_non_numeric_strings() {
        for bad in ["abc", "", "NaN", "inf"] {
            let err = FeatureValue::from(bad).coerce("age").unwrap_err();
            assert!(
                matches!(err, ReconcileError::InvalidValue { ref field, .. } if field == "age"),
                "{bad:?} should be rejected, got {err:?}"
            );
            assert!(err.is_client_error());
        }
    }

    #[test]
    fn null_is_missing() {
        assert_eq!(FeatureValue::Null.coerce("age").unwrap(), None);

        let record: RawRecord = serde_json::from_str(r#"{"age": null}"#).unwrap();
        assert_eq!(record.numeric("age").unwrap(), DEFAULT_FILL);
    }

    #[test]
    fn absent_field_is_default_filled() {
        let record = RawRecord::new();
        assert_eq!(record.numeric("bmi").unwrap(), 0.0);
    }

    #[test]
    fn deserialize_scalars() {
        let record: RawRecord =
            serde_json::from_str(r#"{"age": 45, "smoker": true, "bmi": "28.5", "x": null}"#)
                .unwrap();
        assert_eq!(record.len(), 4);
        assert_eq!(record.get("age"), Some(&FeatureValue::Number(45.0)));
        assert_eq!(record.get("smoker"), Some(&FeatureValue::Bool(true)));
        assert_eq!(record.numeric("bmi").unwrap(), 28.5);
    }

    #[test]
    fn deserialize_rejects_nested_values() {
        assert!(serde_json::from_str::<RawRecord>(r#"{"age": [45]}"#).is_err());
        assert!(serde_json::from_str::<RawRecord>(r#"{"age": {"v": 45}}"#).is_err());
        assert!(serde_json::from_str::<RawRecord>(r#"[1, 2]"#).is_err());
    }

    #[test]
    fn unknown_and_missing_fields() {
        let schema = FeatureSchema::new(["age", "bmi"]).unwrap();
        let record: RawRecord = [("age", 30.0), ("shoe_size", 42.0)].into_iter().collect();

        assert_eq!(record.unknown_fields(&[&schema]), vec!["shoe_size"]);
        assert_eq!(record.missing_fields(&schema), vec!["bmi"]);
    }
}
