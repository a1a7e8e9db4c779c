//! HTTP layer: the inference endpoint, readiness probe, and error mapping.

pub mod error;
pub mod http;

pub use error::ApiError;
pub use http::{AppState, router, serve};
