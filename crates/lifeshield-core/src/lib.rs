pub mod error;
pub mod feature;
pub mod frame;
pub mod reconcile;
pub mod risk;
pub mod schema;

pub use error::{ReconcileError, SchemaError};
pub use feature::{FeatureValue, RawRecord};
pub use reconcile::{FeatureRow, reconcile};
pub use risk::{PredictionResult, RiskAssessment, RiskLevel, interpret};
pub use schema::FeatureSchema;
