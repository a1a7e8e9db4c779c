//! Feature reconciliation: map a raw record onto the scaler's and the model's
//! schemas and merge the transformed columns into the model's input layout.
//!
//! The two schemas are independent. Usually the scaler's is a subset of the
//! model's, but neither containment is assumed:
//!
//! - model-only columns keep their raw (or default-filled) value,
//! - shared columns always carry the transformed value,
//! - scaler-only columns are transformed and then discarded.

use tracing::trace;

use crate::error::ReconcileError;
use crate::feature::RawRecord;
use crate::schema::FeatureSchema;

/// A single numeric row laid out in some schema's column order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow(Vec<f64>);

impl FeatureRow {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn width(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<f64>> for FeatureRow {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Lay `record` out in `schema` order, default-filling absent fields.
///
/// Fields the schema does not name are ignored without being coerced.
pub fn align(record: &RawRecord, schema: &FeatureSchema) -> Result<FeatureRow, ReconcileError> {
    schema
        .names()
        .iter()
        .map(|name| record.numeric(name))
        .collect::<Result<Vec<_>, _>>()
        .map(FeatureRow)
}

/// Build the exact row the classifier expects.
///
/// `transform` receives the scaler-aligned row and must return a row of the
/// same width; anything else means the scaler artifact and its schema
/// disagree.
pub fn reconcile<F, E>(
    record: &RawRecord,
    scaler_schema: &FeatureSchema,
    model_schema: &FeatureSchema,
    transform: F,
) -> Result<FeatureRow, ReconcileError>
where
    F: FnOnce(&[f64]) -> Result<Vec<f64>, E>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let scaler_row = align(record, scaler_schema)?;
    let mut model_row = align(record, model_schema)?;

    let transformed =
        transform(scaler_row.values()).map_err(|e| ReconcileError::Transform(e.into()))?;
    if transformed.len() != scaler_schema.len() {
        return Err(ReconcileError::TransformWidth {
            expected: scaler_schema.len(),
            actual: transformed.len(),
        });
    }

    for (name, value) in scaler_schema.names().iter().zip(transformed) {
        if let Some(pos) = model_schema.position(name) {
            model_row.0[pos] = value;
        }
    }

    trace!(
        scaler_width = scaler_schema.len(),
        model_width = model_row.width(),
        "reconciled feature row"
    );
    Ok(model_row)
}
