//! Vertical card display for loaded artifacts and classifier input rows.

use std::fmt::Write;

use arrow::array::{Array, Float64Array};
use arrow::record_batch::RecordBatch;
use lifeshield_ai::ArtifactStore;
use lifeshield_core::FeatureSchema;

const MAX_LIST_ITEMS: usize = 10;

// ── Public API ──

/// Print the resolved schemas and their overlap.
pub fn print_schema_card(store: &ArtifactStore) {
    print!("{}", render_schema_card(store));
}

/// Print a single-row batch, marking the columns that went through the scaler.
pub fn print_row(batch: &RecordBatch, scaled: &FeatureSchema) -> anyhow::Result<()> {
    print!("{}", render_row(batch, scaled)?);
    Ok(())
}

// ── Rendering ──

fn render_schema_card(store: &ArtifactStore) -> String {
    let summary = store.summary();
    let scaled = summary.scaler_schema.len() - summary.discarded_scaler_features.len();
    let mut out = String::new();

    let _ = writeln!(out, "=== Artifacts ===");
    let _ = writeln!(out, "loaded at {}", summary.loaded_at.to_rfc3339());
    let _ = writeln!(out);

    section(&mut out, "Scaler", &[
        ("features", summary.scaler_schema.len().to_string()),
        ("columns", list(summary.scaler_schema.names())),
    ]);
    section(&mut out, "Model", &[
        ("features", summary.model_schema.len().to_string()),
        ("columns", list(summary.model_schema.names())),
    ]);
    section(&mut out, "Overlap", &[
        ("scaled", scaled.to_string()),
        ("discarded after scaling", list(&summary.discarded_scaler_features)),
        ("passed through unscaled", list(&summary.unscaled_model_features)),
    ]);

    out
}

fn render_row(batch: &RecordBatch, scaled: &FeatureSchema) -> anyhow::Result<String> {
    if batch.num_rows() != 1 {
        anyhow::bail!("expected a single-row batch, got {} rows", batch.num_rows());
    }

    let mut out = String::new();
    let _ = writeln!(out, "=== Classifier input ===");

    let schema = batch.schema();
    for (field, col) in schema.fields().iter().zip(batch.columns()) {
        let values = col
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| anyhow::anyhow!("column {} is not Float64", field.name()))?;
        let _ = write!(out, "  {:<26} {:>12.4}", field.name(), values.value(0));
        if scaled.contains(field.name()) {
            let _ = write!(out, "  scaled");
        }
        let _ = writeln!(out);
    }
    let _ = writeln!(out);

    Ok(out)
}

fn section(out: &mut String, header: &str, rows: &[(&str, String)]) {
    let _ = writeln!(out, "{header}");
    for (label, value) in rows {
        if value.is_empty() {
            continue;
        }
        let _ = writeln!(out, "  {:<26} {}", label, value);
    }
    let _ = writeln!(out);
}

fn list(items: &[String]) -> String {
    if items.len() > MAX_LIST_ITEMS {
        format!(
            "{}, ... (+{} more)",
            items[..MAX_LIST_ITEMS].join(", "),
            items.len() - MAX_LIST_ITEMS
        )
    } else {
        items.join(", ")
    }
}
