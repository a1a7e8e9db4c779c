//! Inference layer: fitted scalers and classifiers, the artifact store, and
//! the record-to-prediction pipeline.

pub mod artifacts;
pub mod classifier;
pub mod error;
pub mod pipeline;
pub mod scaler;

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;

pub use artifacts::{ArtifactPaths, ArtifactStore, ArtifactSummary};
pub use classifier::{Classifier, LogisticRegression};
pub use error::{ArtifactError, InferenceError};
pub use pipeline::{PredictError, Predictor};
pub use scaler::{MinMaxScaler, Scaler, StandardScaler, Transformer};
