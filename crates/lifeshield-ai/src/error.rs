use std::path::PathBuf;

use lifeshield_core::SchemaError;
use thiserror::Error;

/// Startup failures: an artifact is missing, unreadable, or inconsistent.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {artifact}: {reason}")]
    Invalid {
        artifact: &'static str,
        reason: String,
    },

    #[error("invalid {artifact} schema: {source}")]
    Schema {
        artifact: &'static str,
        #[source]
        source: SchemaError,
    },

    #[error("unsupported model format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("warm-up prediction failed: {0}")]
    WarmUp(String),

    #[cfg(feature = "onnx")]
    #[error("onnx runtime error: {0}")]
    Onnx(#[from] ort::Error),
}

impl ArtifactError {
    pub(crate) fn invalid(artifact: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            artifact,
            reason: reason.into(),
        }
    }
}

/// Per-request failures inside a fitted artifact.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("expected {expected} input features, got {actual}")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("classifier returned {0} class probabilities, expected at least 2")]
    MissingPositiveClass(usize),

    #[error("classifier returned invalid probability {0}")]
    InvalidProbability(f64),

    #[error("{0}")]
    Runtime(String),

    #[cfg(feature = "onnx")]
    #[error("onnx runtime error: {0}")]
    Onnx(#[from] ort::Error),
}
