pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use paydown_core::compare::ComparisonOutput;
use paydown_core::types::ComputationOutput;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Decode the comparison envelope back out of the generic value.
/// Formatters fall back to plain JSON when the shape is unexpected.
pub(crate) fn decode(value: &Value) -> Option<ComputationOutput<ComparisonOutput>> {
    serde_json::from_value(value.clone()).ok()
}
