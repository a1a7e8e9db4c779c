//! HTTP endpoints using axum.
//!
//! Endpoints:
//! - POST /predict - risk prediction for one feature record
//! - GET  /health  - readiness probe
//! - GET  /schema  - resolved scaler/model feature schemas
//! - GET  /        - welcome document

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::Method;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use lifeshield_ai::{ArtifactSummary, Predictor};
use lifeshield_core::{PredictionResult, RawRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ApiError;

/// Shared handler state.
///
/// Holds the predictor once artifacts have loaded; readiness is simply
/// whether it is present. The predictor is never replaced.
#[derive(Clone, Default)]
pub struct AppState {
    predictor: Option<Arc<Predictor>>,
}

impl AppState {
    pub fn ready(predictor: Predictor) -> Self {
        Self {
            predictor: Some(Arc::new(predictor)),
        }
    }

    /// State with no artifacts: every prediction answers 503.
    pub fn unready() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.predictor.is_some()
    }

    fn predictor(&self) -> Result<Arc<Predictor>, ApiError> {
        self.predictor.clone().ok_or(ApiError::ServiceUnavailable)
    }
}

/// Build the router with all endpoints, CORS, and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/schema", get(schema))
        .route("/predict", post(predict))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

// ── Request / Response types ──

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictRequest {
    pub features: RawRecord,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub artifacts_loaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler_features: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_features: Option<usize>,
}

// ── Handlers ──

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the LifeShield AI Backend",
        "status": "online",
        "version": env!("CARGO_PKG_VERSION"),
        "health_check": "/health",
    }))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let artifacts = state.predictor.as_deref().map(Predictor::artifacts);
    Json(HealthResponse {
        status: "healthy".into(),
        artifacts_loaded: state.is_ready(),
        loaded_at: artifacts.map(|a| a.loaded_at()),
        scaler_features: artifacts.map(|a| a.scaler_schema().len()),
        model_features: artifacts.map(|a| a.model_schema().len()),
    })
}

async fn schema(State(state): State<AppState>) -> Result<Json<ArtifactSummary>, ApiError> {
    Ok(Json(state.predictor()?.artifacts().summary()))
}

async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    // Shape is checked before availability: a malformed request is the
    // caller's fault whatever state the service is in.
    let Json(request) = payload?;
    let predictor = state.predictor()?;
    // Classifiers may block (the ONNX session sits behind a mutex).
    let result = tokio::task::spawn_blocking(move || predictor.predict(&request.features))
        .await
        .map_err(|e| ApiError::Inference(e.to_string()))??;
    Ok(Json(result))
}
