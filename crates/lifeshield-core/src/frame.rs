//! Arrow views of feature schemas and aligned rows.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::reconcile::FeatureRow;
use crate::schema::FeatureSchema;

impl FeatureSchema {
    /// One non-nullable `Float64` column per feature, in schema order.
    pub fn to_arrow_schema(&self) -> Schema {
        Schema::new(
            self.names()
                .iter()
                .map(|name| Field::new(name, DataType::Float64, false))
                .collect::<Vec<_>>(),
        )
    }
}

impl FeatureRow {
    /// Wrap the row as a one-row batch with `schema`'s column names.
    pub fn to_record_batch(&self, schema: &FeatureSchema) -> Result<RecordBatch, ArrowError> {
        if self.width() != schema.len() {
            return Err(ArrowError::InvalidArgumentError(format!(
                "row has {} values, schema has {} columns",
                self.width(),
                schema.len()
            )));
        }

        let columns: Vec<ArrayRef> = self
            .values()
            .iter()
            .map(|&v| Arc::new(Float64Array::from(vec![v])) as ArrayRef)
            .collect();

        RecordBatch::try_new(Arc::new(schema.to_arrow_schema()), columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;

    #[test]
    fn arrow_schema_matches_feature_order() {
        let schema = FeatureSchema::new(["age", "bmi"]).unwrap();
        let arrow_schema = schema.to_arrow_schema();
        assert_eq!(arrow_schema.fields().len(), 2);
        assert_eq!(arrow_schema.field(0).name(), "age");
        assert_eq!(arrow_schema.field(1).data_type(), &DataType::Float64);
    }

    #[test]
    fn row_to_batch() {
        let schema = FeatureSchema::new(["age", "bmi"]).unwrap();
        let row = FeatureRow::from(vec![45.0, 28.5]);
        let batch = row.to_record_batch(&schema).unwrap();

        assert_eq!(batch.num_rows(), 1);
        let bmi = batch
            .column_by_name("bmi")
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(bmi.len(), 1);
        assert_eq!(bmi.value(0), 28.5);
    }

    #[test]
    fn row_to_batch_rejects_width_mismatch() {
        let schema = FeatureSchema::new(["age", "bmi"]).unwrap();
        let row = FeatureRow::from(vec![45.0]);
        assert!(row.to_record_batch(&schema).is_err());
    }
}
