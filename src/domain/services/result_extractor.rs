//! Result Extractor - Domain service
//!
//! Reduces a query response to the single value the controller consumes.
//! A missing value is an error, never zero.

use crate::domain::entities::QueryResponse;
use crate::domain::error::ExtractError;
use serde_json::Value;

/// Position of the value cell in a row; column 0 is the timestamp.
pub const VALUE_COLUMN: usize = 1;

/// Take the value of the first row of the first series of the first result.
pub fn extract_value(response: &QueryResponse) -> Result<f64, ExtractError> {
    if let Some(err) = response.error() {
        return Err(ExtractError::Remote(err.to_string()));
    }

    let result = response.results.first().ok_or(ExtractError::NoResults)?;
    let series = result.series.first().ok_or(ExtractError::NoSeries)?;
    let row = series.values.first().ok_or(ExtractError::NoRows)?;
    let cell = row
        .get(VALUE_COLUMN)
        .ok_or(ExtractError::MissingValue(row.len()))?;

    parse_cell(cell)
}

fn parse_cell(cell: &Value) -> Result<f64, ExtractError> {
    let value = match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    value
        .filter(|v| v.is_finite())
        .ok_or_else(|| ExtractError::NotANumber(cell.to_string()))
}
