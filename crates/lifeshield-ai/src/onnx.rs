//! ONNX Runtime backend for classifiers exported with skl2onnx.
//!
//! The model must take a single `float32[batch, n_features]` input. Output 1
//! is the class-probability tensor `[batch, n_classes]` (export with
//! `zipmap=False`). ONNX graphs carry no feature names, so the fallback
//! feature list defines the model's column order.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tracing::info;

use crate::classifier::Classifier;
use crate::error::{ArtifactError, InferenceError};

/// skl2onnx emits `[label, probabilities]`.
const PROBABILITY_OUTPUT: usize = 1;

/// Binary classifier backed by an ONNX Runtime session.
///
/// `Session::run` needs exclusive access, so the session sits behind a mutex.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    n_features: Option<usize>,
}

impl OnnxClassifier {
    /// Load a classifier from a `.onnx` file.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        if !path.exists() {
            return Err(ArtifactError::NotFound(path.to_path_buf()));
        }

        let session = Session::builder()?.commit_from_file(path)?;

        if session.inputs().len() != 1 {
            return Err(ArtifactError::invalid(
                "model",
                format!("expected 1 input, found {}", session.inputs().len()),
            ));
        }
        if session.outputs().len() <= PROBABILITY_OUTPUT {
            return Err(ArtifactError::invalid(
                "model",
                "no class-probability output; export with zipmap disabled",
            ));
        }

        // Last input dimension is the feature count, when the graph fixes it.
        let n_features = infer_width(session.inputs()[0].dtype());

        info!(?n_features, model = %path.display(), "loaded onnx classifier");
        Ok(Self {
            session: Mutex::new(session),
            n_features,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if let Some(expected) = self.n_features
            && expected != row.len()
        {
            return Err(InferenceError::WidthMismatch {
                expected,
                actual: row.len(),
            });
        }

        let input: Vec<f32> = row.iter().map(|&x| x as f32).collect();
        let shape = [1i64, row.len() as i64];
        let tensor = Tensor::from_array((shape, input.into_boxed_slice()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::Runtime("onnx session mutex poisoned".into()))?;
        let outputs = session.run(ort::inputs![tensor])?;

        let (output_shape, data) = outputs[PROBABILITY_OUTPUT].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        let n_classes = match dims {
            [1, n] if *n > 0 => *n as usize,
            _ => {
                return Err(InferenceError::Runtime(format!(
                    "unexpected probability shape: {dims:?}, expected [1, n_classes]"
                )));
            }
        };

        Ok(data[..n_classes].iter().map(|&p| p as f64).collect())
    }
}

fn infer_width(input_type: &ort::value::ValueType) -> Option<usize> {
    match input_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}
