use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lifeshield_ai::PredictError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Per-request failures, each with its own status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Model artifacts are not loaded.")]
    ServiceUnavailable,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Reconciliation(String),

    #[error("Prediction failed: {0}")]
    Inference(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Reconciliation(_) => StatusCode::BAD_REQUEST,
            Self::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable => "service_unavailable",
            Self::Validation(_) => "validation_error",
            Self::Reconciliation(_) => "reconciliation_error",
            Self::Inference(_) => "inference_error",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PredictError> for ApiError {
    fn from(e: PredictError) -> Self {
        if e.is_client_error() {
            Self::Reconciliation(e.to_string())
        } else {
            error!(error = %e, "prediction error");
            Self::Inference(e.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.kind().to_string(),
            detail: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
