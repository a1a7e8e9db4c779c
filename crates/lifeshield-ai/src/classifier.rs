//! Fitted binary classifiers.

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, InferenceError};

/// Index of the positive ("at risk") class in `predict_proba` output.
pub const POSITIVE_CLASS: usize = 1;

/// A fitted binary probability model over a fixed-width numeric row.
pub trait Classifier: Send + Sync {
    /// Input order the model was trained on, if the artifact records it.
    fn feature_names(&self) -> Option<&[String]>;

    /// Input width, if the artifact knows it statically.
    fn n_features(&self) -> Option<usize>;

    /// Class probabilities for one row, negative class first.
    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

/// Pick the positive-class probability out of `predict_proba` output and
/// check it is usable.
pub fn positive_probability(probabilities: &[f64]) -> Result<f64, InferenceError> {
    let p = *probabilities
        .get(POSITIVE_CLASS)
        .ok_or(InferenceError::MissingPositiveClass(probabilities.len()))?;
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(InferenceError::InvalidProbability(p));
    }
    Ok(p)
}

/// Binary logistic regression: `p = σ(coef · x + intercept)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names_in: Option<Vec<String>>,
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.coef.is_empty() {
            return Err(ArtifactError::invalid("model", "'coef' is empty"));
        }
        if let Some(names) = &self.feature_names_in
            && names.len() != self.coef.len()
        {
            return Err(ArtifactError::invalid(
                "model",
                format!(
                    "'feature_names_in' lists {} names but 'coef' has {} values",
                    names.len(),
                    self.coef.len()
                ),
            ));
        }
        if !self.intercept.is_finite() || self.coef.iter().any(|c| !c.is_finite()) {
            return Err(ArtifactError::invalid("model", "parameters must be finite"));
        }
        Ok(())
    }

    /// Linear score `coef · x + intercept`.
    pub fn decision_function(&self, row: &[f64]) -> f64 {
        self.coef.iter().zip(row).map(|(c, x)| c * x).sum::<f64>() + self.intercept
    }
}

impl Classifier for LogisticRegression {
    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names_in.as_deref()
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coef.len())
    }

    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if row.len() != self.coef.len() {
            return Err(InferenceError::WidthMismatch {
                expected: self.coef.len(),
                actual: row.len(),
            });
        }
        let p = sigmoid(self.decision_function(row));
        Ok(vec![1.0 - p, p])
    }
}

/// JSON-serialised classifier artifacts, tagged by `kind`.
///
/// ```json
/// {"kind": "logistic_regression", "feature_names_in": ["age", "bmi"], "coef": [0.8, 0.4], "intercept": -1.2}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JsonModel {
    LogisticRegression(LogisticRegression),
}

impl JsonModel {
    pub fn into_classifier(self) -> Result<Box<dyn Classifier>, ArtifactError> {
        match self {
            Self::LogisticRegression(m) => {
                m.validate()?;
                Ok(Box::new(m))
            }
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
