//! Fitted feature scalers.
//!
//! Scalers are stored as JSON using scikit-learn's fitted attribute names
//! (`mean_`, `scale_`, `min_`, `feature_names_in_`, without the trailing
//! underscore):
//!
//! ```json
//! {"kind": "standard", "feature_names_in": ["age", "bmi"], "mean": [50.1, 27.3], "scale": [12.0, 5.4]}
//! {"kind": "min_max", "min": [-0.18, -0.5], "scale": [0.01, 0.02]}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, InferenceError};

/// A fitted row transform with a fixed input width.
pub trait Transformer: Send + Sync {
    /// Input order the transform was fitted on, if the artifact records it.
    fn feature_names(&self) -> Option<&[String]>;

    /// Number of input (and output) columns.
    fn n_features(&self) -> usize;

    /// Transform one row. The output has the same width as the input.
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

/// `(x - mean) / scale`, per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names_in: Option<Vec<String>>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// `x * scale + min`, per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names_in: Option<Vec<String>>,
    pub min: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

impl Scaler {
    /// Check parameter widths agree and values are finite.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let (names, a, b, a_name, b_name) = match self {
            Self::Standard(s) => (&s.feature_names_in, &s.mean, &s.scale, "mean", "scale"),
            Self::MinMax(s) => (&s.feature_names_in, &s.min, &s.scale, "min", "scale"),
        };

        if a.is_empty() {
            return Err(ArtifactError::invalid("scaler", format!("'{a_name}' is empty")));
        }
        if a.len() != b.len() {
            return Err(ArtifactError::invalid(
                "scaler",
                format!(
                    "'{a_name}' has {} values but '{b_name}' has {}",
                    a.len(),
                    b.len()
                ),
            ));
        }
        if let Some(names) = names
            && names.len() != a.len()
        {
            return Err(ArtifactError::invalid(
                "scaler",
                format!(
                    "'feature_names_in' lists {} names but the scaler has {} columns",
                    names.len(),
                    a.len()
                ),
            ));
        }
        if a.iter().chain(b).any(|x| !x.is_finite()) {
            return Err(ArtifactError::invalid("scaler", "parameters must be finite"));
        }
        Ok(())
    }
}

impl Transformer for Scaler {
    fn feature_names(&self) -> Option<&[String]> {
        match self {
            Self::Standard(s) => s.feature_names_in.as_deref(),
            Self::MinMax(s) => s.feature_names_in.as_deref(),
        }
    }

    fn n_features(&self) -> usize {
        match self {
            Self::Standard(s) => s.mean.len(),
            Self::MinMax(s) => s.min.len(),
        }
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if row.len() != self.n_features() {
            return Err(InferenceError::WidthMismatch {
                expected: self.n_features(),
                actual: row.len(),
            });
        }

        let out = match self {
            Self::Standard(s) => row
                .iter()
                .zip(s.mean.iter().zip(&s.scale))
                // Zero-variance columns are only centred.
                .map(|(x, (m, sc))| (x - m) / if *sc == 0.0 { 1.0 } else { *sc })
                .collect(),
            Self::MinMax(s) => row
                .iter()
                .zip(s.min.iter().zip(&s.scale))
                .map(|(x, (mn, sc))| x * sc + mn)
                .collect(),
        };
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> Scaler {
        Scaler::Standard(StandardScaler {
            feature_names_in: Some(vec!["age".into(), "bmi".into()]),
            mean: vec![40.0, 25.0],
            scale: vec![10.0, 5.0],
        })
    }

    #[test]
    fn standard_transform() {
        let out = standard().transform(&[45.0, 28.5]).unwrap();
        assert!((out[0] - 0.5).abs() < 1e-12);
        assert!((out[1] - 0.7).abs() < 1e-12);
    }

    #[test]
    fn standard_zero_scale_only_centres() {
        let scaler = Scaler::Standard(StandardScaler {
            feature_names_in: None,
            mean: vec![3.0],
            scale: vec![0.0],
        });
        assert_eq!(scaler.transform(&[5.0]).unwrap(), vec![2.0]);
    }

    #[test]
    fn min_max_transform() {
        let scaler = Scaler::MinMax(MinMaxScaler {
            feature_names_in: None,
            min: vec![-0.2, 0.0],
            scale: vec![0.01, 0.5],
        });
        let out = scaler.transform(&[70.0, 3.0]).unwrap();
        assert!((out[0] - 0.5).abs() < 1e-12);
        assert!((out[1] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn transform_rejects_wrong_width() {
        let err = standard().transform(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::WidthMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn parse_tagged_json() {
        let json = r#"{"kind": "standard", "mean": [1.0], "scale": [2.0]}"#;
        let scaler: Scaler = serde_json::from_str(json).unwrap();
        assert_eq!(scaler.n_features(), 1);
        assert!(scaler.feature_names().is_none());

        let json = r#"{"kind": "min_max", "feature_names_in": ["age"], "min": [0.0], "scale": [0.5]}"#;
        let scaler: Scaler = serde_json::from_str(json).unwrap();
        assert_eq!(scaler.feature_names(), Some(&["age".to_string()][..]));
    }

    #[test]
    fn validate_catches_width_disagreements() {
        let bad = Scaler::Standard(StandardScaler {
            feature_names_in: None,
            mean: vec![1.0, 2.0],
            scale: vec![1.0],
        });
        assert!(bad.validate().is_err());

        let bad_names = Scaler::Standard(StandardScaler {
            feature_names_in: Some(vec!["age".into()]),
            mean: vec![1.0, 2.0],
            scale: vec![1.0, 1.0],
        });
        assert!(bad_names.validate().is_err());

        let empty = Scaler::MinMax(MinMaxScaler {
            feature_names_in: None,
            min: vec![],
            scale: vec![],
        });
        assert!(empty.validate().is_err());

        assert!(standard().validate().is_ok());
    }
}
