//! Ordered feature schemas.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::SchemaError;

/// The fixed, ordered list of named inputs an artifact was trained on.
///
/// Built once when artifacts are loaded; lookups by name are O(1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    names: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema, rejecting empty lists, blank names, and duplicates.
    pub fn new<I, S>(names: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut index = HashMap::with_capacity(names.len());
        for (pos, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(SchemaError::BlankName(pos));
            }
            if index.insert(name.clone(), pos).is_some() {
                return Err(SchemaError::Duplicate(name.clone()));
            }
        }

        Ok(Self { names, index })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false: empty schemas are rejected by [`new`](Self::new).
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column position of `name`, if the schema has it.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Names in `self` that `other` does not have, in `self`'s order.
    pub fn difference<'a>(&'a self, other: &FeatureSchema) -> Vec<&'a str> {
        self.names
            .iter()
            .filter(|n| !other.contains(n))
            .map(|n| n.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_order_and_positions() {
        let schema = FeatureSchema::new(["age", "bmi", "genhlth"]).unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.names()[1], "bmi");
        assert_eq!(schema.position("genhlth"), Some(2));
        assert_eq!(schema.position("income"), None);
    }

    #[test]
    fn rejects_empty() {
        let names: Vec<String> = vec![];
        assert_eq!(FeatureSchema::new(names), Err(SchemaError::Empty));
    }

    #[test]
    fn rejects_duplicates() {
        assert_eq!(
            FeatureSchema::new(["age", "bmi", "age"]),
            Err(SchemaError::Duplicate("age".into()))
        );
    }

    #[test]
    fn rejects_blank_names() {
        assert_eq!(
            FeatureSchema::new(["age", "  "]),
            Err(SchemaError::BlankName(1))
        );
    }

    #[test]
    fn difference_keeps_order() {
        let scaler = FeatureSchema::new(["bmi", "legacy_score", "age"]).unwrap();
        let model = FeatureSchema::new(["age", "gender", "bmi"]).unwrap();
        assert_eq!(scaler.difference(&model), vec!["legacy_score"]);
        assert_eq!(model.difference(&scaler), vec!["gender"]);
    }

    #[test]
    fn serializes_as_name_list() {
        let schema = FeatureSchema::new(["age", "bmi"]).unwrap();
        let json = serde_json::to_string(&schema).unwrap();
        assert_eq!(json, r#"["age","bmi"]"#);
    }
}
