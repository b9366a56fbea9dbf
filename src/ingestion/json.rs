//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"age":30}, {"age":41}]`
//! - Newline-delimited JSON (NDJSON): `{"age":30}\n{"age":41}\n`
//!
//! Nested fields are supported using dot paths in schema field names (e.g. `patient.age`).
//! Dates are read from strings; unparseable strings become `Null`.

use std::fs;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Schema, Value};

use super::dates::parse_date;

/// Ingest JSON into an in-memory `DataSet`.
pub fn ingest_json_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<DataSet> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text, schema)
}

/// Ingest JSON from an in-memory string into a [`DataSet`].
pub fn ingest_json_from_str(input: &str, schema: &Schema) -> IngestionResult<DataSet> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => ingest_json_values(&items, schema),
            serde_json::Value::Object(_) => ingest_json_values(std::slice::from_ref(&v), schema),
            _ => Err(IngestionError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
                IngestionError::SchemaMismatch {
                    message: format!("invalid ndjson at line {}: {}", i + 1, e),
                }
            })?;
            values.push(v);
        }
        ingest_json_values(&values, schema)
    }
}

fn ingest_json_values(values: &[serde_json::Value], schema: &Schema) -> IngestionResult<DataSet> {
    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(values.len());
    let mut coerced_dates = 0usize;

    for (idx0, v) in values.iter().enumerate() {
        let row_num = idx0 + 1;
        let obj = v.as_object().ok_or_else(|| IngestionError::SchemaMismatch {
            message: format!("row {row_num} is not a json object"),
        })?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            let jv = match get_by_dot_path(obj, &field.name) {
                Some(jv) => jv,
                None if !field.required => {
                    row.push(Value::Null);
                    continue;
                }
                None => {
                    return Err(IngestionError::SchemaMismatch {
                        message: format!("row {row_num} missing required field '{}'", field.name),
                    });
                }
            };
            let value = convert_json_value(row_num, &field.name, &field.data_type, jv)?;
            if value.is_null() && !jv.is_null() && field.data_type == DataType::Date {
                log::debug!("row {row_num} field '{}': unparseable date {jv} treated as missing", field.name);
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

fn get_by_dot_path<'a>(
    root: &'a serde_json::Map<String, serde_json::Value>,
    path: &str,
) -> Option<&'a serde_json::Value> {
    if let Some(v) = root.get(path) {
        return Some(v);
    }

    let mut segments = path.split('.');
    let mut current = root.get(segments.next()?)?;
    for segment in segments {
        match current {
            serde_json::Value::Object(map) => current = map.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

fn convert_json_value(
    row: usize,
    column: &str,
    data_type: &DataType,
    v: &serde_json::Value,
) -> IngestionResult<Value> {
    if v.is_null() {
        return Ok(Value::Null);
    }

    let parse_err = |message: &str| IngestionError::ParseError {
        row,
        column: column.to_string(),
        raw: v.to_string(),
        message: message.to_string(),
    };

    match data_type {
        DataType::Utf8 => match v {
            serde_json::Value::String(s) => Ok(Value::Utf8(s.clone())),
            // Categorical codes are sometimes exported as numbers.
            serde_json::Value::Number(n) => Ok(Value::Utf8(n.to_string())),
            _ => Err(parse_err("expected string")),
        },
        DataType::Int64 => {
            if let Some(n) = v.as_i64() {
                Ok(Value::Int64(n))
            } else if let Some(f) = v.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64) {
                Ok(Value::Int64(f as i64))
            } else {
                Err(parse_err("expected integer number"))
            }
        }
        DataType::Float64 => v.as_f64().map(Value::Float64).ok_or_else(|| parse_err("expected number")),
        DataType::Date => match v {
            serde_json::Value::String(s) => Ok(parse_date(s).map(Value::Date).unwrap_or(Value::Null)),
            _ => Ok(Value::Null),
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::ingest_json_from_str;
    use crate::types::{DataType, Field, Schema, Value};

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("patient.age", DataType::Int64),
            Field::new("date_of_admission", DataType::Date),
            Field::optional("room_number", DataType::Int64),
        ])
    }

    #[test]
    fn nested_paths_optional_fields_and_dates() {
        let input = r#"[
            {"patient": {"age": 30}, "date_of_admission": "2023-04-01", "room_number": 12},
            {"patient": {"age": 41.0}, "date_of_admission": "garbage"}
        ]"#;
        let ds = ingest_json_from_str(input, &schema()).unwrap();
        assert_eq!(ds.row_count(), 2);
        assert_eq!(
            ds.rows[0],
            vec![
                Value::Int64(30),
                Value::Date(NaiveDate::from_ymd_opt(2023, 4, 1).unwrap()),
                Value::Int64(12),
            ]
        );
        assert_eq!(ds.rows[1], vec![Value::Int64(41), Value::Null, Value::Null]);
    }

    #[test]
    fn ndjson_lines_are_accepted() {
        let input = "{\"patient\":{\"age\":1},\"date_of_admission\":null}\n\n{\"patient\":{\"age\":2},\"date_of_admission\":\"2024-01-01\"}\n";
        let ds = ingest_json_from_str(input, &schema()).unwrap();
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.rows[0][1], Value::Null);
    }

    #[test]
    fn missing_required_field_is_schema_mismatch() {
        let err = ingest_json_from_str(r#"[{"date_of_admission": "2024-01-01"}]"#, &schema()).unwrap_err();
        assert!(err.to_string().contains("missing required field 'patient.age'"));
    }
}
