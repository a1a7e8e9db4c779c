//! The artifact store: scaler, classifier, and fallback feature list, loaded
//! once at startup and read-only afterwards.
//!
//! Loading is all-or-nothing. Every file must exist and parse, and the
//! resolved schemas must agree with the fitted parameters, before an
//! [`ArtifactStore`] exists at all.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use lifeshield_core::FeatureSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::classifier::{Classifier, JsonModel};
use crate::error::ArtifactError;
use crate::scaler::{Scaler, Transformer};

pub const MODEL_JSON: &str = "model.json";
pub const MODEL_ONNX: &str = "model.onnx";
pub const SCALER_JSON: &str = "scaler.json";
pub const FEATURE_COLUMNS_JSON: &str = "feature_columns.json";

/// Locations of the three artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub feature_columns: PathBuf,
}

impl ArtifactPaths {
    /// Standard file names inside `dir`.
    ///
    /// The model is `model.json` if present, otherwise `model.onnx` if
    /// present, otherwise `model.json` (reported as missing at load time).
    pub fn in_dir(dir: &Path) -> Self {
        let json = dir.join(MODEL_JSON);
        let onnx = dir.join(MODEL_ONNX);
        let model = if !json.exists() && onnx.exists() {
            onnx
        } else {
            json
        };

        Self {
            model,
            scaler: dir.join(SCALER_JSON),
            feature_columns: dir.join(FEATURE_COLUMNS_JSON),
        }
    }
}

/// Process-wide, immutable inference artifacts with their resolved schemas.
pub struct ArtifactStore {
    scaler: Box<dyn Transformer>,
    classifier: Box<dyn Classifier>,
    feature_columns: FeatureSchema,
    scaler_schema: FeatureSchema,
    model_schema: FeatureSchema,
    loaded_at: DateTime<Utc>,
}

/// Serializable description of a loaded store.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactSummary {
    pub scaler_schema: FeatureSchema,
    pub model_schema: FeatureSchema,
    /// Scaler columns with no place in the model's input.
    pub discarded_scaler_features: Vec<String>,
    /// Model columns passed through untransformed.
    pub unscaled_model_features: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}

impl ArtifactStore {
    /// Load and validate all three artifacts from disk.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        for path in [&paths.model, &paths.scaler, &paths.feature_columns] {
            if !path.exists() {
                return Err(ArtifactError::NotFound(path.clone()));
            }
        }

        info!(
            model = %paths.model.display(),
            scaler = %paths.scaler.display(),
            features = %paths.feature_columns.display(),
            "loading model artifacts"
        );

        let classifier = load_classifier(&paths.model)?;

        let scaler: Scaler = read_json(&paths.scaler)?;
        scaler.validate()?;

        let feature_columns: Vec<String> = read_json(&paths.feature_columns)?;
        info!(count = feature_columns.len(), "loaded feature columns");

        Self::from_parts(Box::new(scaler), classifier, feature_columns)
    }

    /// Assemble a store from already-constructed artifacts.
    ///
    /// Each artifact's schema is its own `feature_names` when it has them,
    /// otherwise `feature_columns`. Schemas are resolved here, once.
    pub fn from_parts(
        scaler: Box<dyn Transformer>,
        classifier: Box<dyn Classifier>,
        feature_columns: Vec<String>,
    ) -> Result<Self, ArtifactError> {
        let feature_columns = schema("feature_columns", feature_columns)?;

        let scaler_schema = match scaler.feature_names() {
            Some(names) => schema("scaler", names.to_vec())?,
            None => feature_columns.clone(),
        };
        let model_schema = match classifier.feature_names() {
            Some(names) => schema("model", names.to_vec())?,
            None => feature_columns.clone(),
        };

        if scaler.n_features() != scaler_schema.len() {
            return Err(ArtifactError::invalid(
                "scaler",
                format!(
                    "fitted on {} columns but its schema has {}",
                    scaler.n_features(),
                    scaler_schema.len()
                ),
            ));
        }
        if let Some(width) = classifier.n_features()
            && width != model_schema.len()
        {
            return Err(ArtifactError::invalid(
                "model",
                format!(
                    "expects {width} columns but its schema has {}",
                    model_schema.len()
                ),
            ));
        }

        let discarded = scaler_schema.difference(&model_schema);
        if !discarded.is_empty() {
            warn!(
                features = ?discarded,
                "scaler features missing from the model schema; their transformed values are discarded"
            );
        }

        info!(
            scaler_features = scaler_schema.len(),
            model_features = model_schema.len(),
            "artifacts loaded and validated"
        );

        Ok(Self {
            scaler,
            classifier,
            feature_columns,
            scaler_schema,
            model_schema,
            loaded_at: Utc::now(),
        })
    }

    pub fn scaler(&self) -> &dyn Transformer {
        self.scaler.as_ref()
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn feature_columns(&self) -> &FeatureSchema {
        &self.feature_columns
    }

    pub fn scaler_schema(&self) -> &FeatureSchema {
        &self.scaler_schema
    }

    pub fn model_schema(&self) -> &FeatureSchema {
        &self.model_schema
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            scaler_schema: self.scaler_schema.clone(),
            model_schema: self.model_schema.clone(),
            discarded_scaler_features: owned(self.scaler_schema.difference(&self.model_schema)),
            unscaled_model_features: owned(self.model_schema.difference(&self.scaler_schema)),
            loaded_at: self.loaded_at,
        }
    }
}

fn load_classifier(path: &Path) -> Result<Box<dyn Classifier>, ArtifactError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => read_json::<JsonModel>(path)?.into_classifier(),
        #[cfg(feature = "onnx")]
        Some("onnx") => Ok(Box::new(crate::onnx::OnnxClassifier::load(path)?)),
        _ => Err(ArtifactError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let text = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn schema(artifact: &'static str, names: Vec<String>) -> Result<FeatureSchema, ArtifactError> {
    FeatureSchema::new(names).map_err(|source| ArtifactError::Schema { artifact, source })
}

fn owned(names: Vec<&str>) -> Vec<String> {
    names.into_iter().map(str::to_string).collect()
}
