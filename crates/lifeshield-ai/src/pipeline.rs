//! Record → reconciled row → classifier → interpreted prediction.

use lifeshield_core::{FeatureRow, PredictionResult, RawRecord, ReconcileError, reconcile};
use thiserror::Error;
use tracing::debug;

use crate::artifacts::ArtifactStore;
use crate::classifier::positive_probability;
use crate::error::{ArtifactError, InferenceError};

#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl PredictError {
    /// True when the caller sent something unusable; false for server faults.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Reconcile(e) => e.is_client_error(),
            Self::Inference(_) => false,
        }
    }
}

/// Stateless inference over a shared, immutable [`ArtifactStore`].
pub struct Predictor {
    artifacts: ArtifactStore,
}

impl Predictor {
    /// Wrap `artifacts` after a warm-up prediction on an empty record.
    ///
    /// The warm-up runs the whole pipeline once so that a scaler or
    /// classifier that only fails at call time stops startup instead of the
    /// first request.
    pub fn new(artifacts: ArtifactStore) -> Result<Self, ArtifactError> {
        let predictor = Self { artifacts };
        let warm = predictor
            .predict(&RawRecord::new())
            .map_err(|e| ArtifactError::WarmUp(e.to_string()))?;
        debug!(probability = warm.risk_probability, "warm-up prediction ok");
        Ok(predictor)
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// The exact row the classifier sees for `record`.
    pub fn final_row(&self, record: &RawRecord) -> Result<FeatureRow, ReconcileError> {
        let store = &self.artifacts;
        reconcile(
            record,
            store.scaler_schema(),
            store.model_schema(),
            |row: &[f64]| store.scaler().transform(row),
        )
    }

    /// Unrounded positive-class probability for `record`.
    pub fn probability(&self, record: &RawRecord) -> Result<f64, PredictError> {
        let store = &self.artifacts;
        debug!(
            provided = record.len(),
            missing = record.missing_fields(store.model_schema()).len(),
            ignored = record
                .unknown_fields(&[store.scaler_schema(), store.model_schema()])
                .len(),
            "reconciling record"
        );

        let row = self.final_row(record)?;
        let probabilities = store.classifier().predict_proba(row.values())?;
        Ok(positive_probability(&probabilities)?)
    }

    pub fn predict(&self, record: &RawRecord) -> Result<PredictionResult, PredictError> {
        let p = self.probability(record)?;
        Ok(PredictionResult::from_probability(p))
    }
}
