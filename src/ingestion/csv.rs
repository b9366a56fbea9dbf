//! CSV ingestion implementation.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Schema, Value};

use super::dates::parse_date;

/// Ingest a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all required schema fields (order can differ). Optional fields that
///   are absent are filled with [`Value::Null`].
/// - Each value is parsed according to the schema field type. Empty cells are `Null`.
/// - Unparseable dates become `Null` instead of failing the whole file.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr, schema)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> IngestionResult<DataSet> {
    let headers = rdr.headers()?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs: Vec<Option<usize>> = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h.trim() == field.name) {
            Some(idx) => col_idxs.push(Some(idx)),
            None if !field.required => {
                log::debug!("optional column '{}' not present; filling with nulls", field.name);
                col_idxs.push(None);
            }
            None => {
                return Err(IngestionError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    let mut coerced_dates = 0usize;
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, csv_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let raw = csv_idx.and_then(|i| record.get(i)).unwrap_or("");
            let value = parse_typed_value(user_row, &field.name, &field.data_type, raw)?;
            if value.is_null() && field.data_type == DataType::Date && !is_missing(raw.trim()) {
                log::debug!(
                    "row {user_row} column '{}': unparseable date '{raw}' treated as missing",
                    field.name
                );
                coerced_dates += 1;
            }
            row.push(value);
        }
        rows.push(row);
    }

    if coerced_dates > 0 {
        log::warn!("{coerced_dates} malformed date value(s) coerced to missing");
    }

    Ok(DataSet::new(schema.clone(), rows))
}

/// Cell spellings that mean "no value" in CSV exports (the pandas defaults).
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(trimmed: &str) -> bool {
    trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed)
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: &DataType,
    raw: &str,
) -> IngestionResult<Value> {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return Ok(Value::Null);
    }

    let parse_err = |message: String| IngestionError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => parse_int(trimmed).map(Value::Int64).map_err(parse_err),
        // `inf` parses as a float but cannot take part in totals.
        DataType::Float64 => match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Value::Float64(f)),
            Ok(_) => Ok(Value::Null),
            Err(e) => Err(parse_err(e.to_string())),
        },
        DataType::Date => Ok(parse_date(trimmed).map(Value::Date).unwrap_or(Value::Null)),
    }
}

/// Integers written by spreadsheet/pandas exports often carry a `.0` suffix.
fn parse_int(s: &str) -> Result<i64, String> {
    if let Ok(v) = s.parse::<i64>() {
        return Ok(v);
    }
    match s.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        Ok(_) => Err("expected integer, found fractional number".to_string()),
        Err(e) => Err(e.to_string()),
    }
}
