use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("feature schema is empty")]
    Empty,

    #[error("feature schema lists '{0}' more than once")]
    Duplicate(String),

    #[error("feature schema contains an empty name at position {0}")]
    BlankName(usize),
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A provided value could not be read as a number.
    #[error("feature '{field}' has non-numeric value {value:?}")]
    InvalidValue { field: String, value: String },

    /// The fitted transform itself failed.
    #[error("transform failed: {0}")]
    Transform(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The transform returned a row of the wrong width (artifact mismatch).
    #[error("transform returned {actual} columns, scaler schema has {expected}")]
    TransformWidth { expected: usize, actual: usize },
}

impl ReconcileError {
    /// True when the failure was caused by the request rather than the artifacts.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidValue { .. })
    }
}
