//! Parquet ingestion implementation.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use parquet::file::reader::{ChunkReader, FileReader};
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Schema, Value};

use super::dates::{date_from_epoch_days, parse_date};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Ingest a Parquet file into an in-memory `DataSet`.
///
/// Notes:
/// - Validates that all required schema fields exist as Parquet leaf columns (by column path)
/// - Dates may be stored as `DATE`, timestamps, or strings; unparseable strings become `Null`
/// - Uses the Parquet record API (`RowIter`)
pub fn ingest_parquet_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<DataSet> {
    let reader = SerializedFileReader::try_from(path.as_ref())?;

    let available_columns = parquet_leaf_column_paths(&reader);
    for field in &schema.fields {
        if field.required && !available_columns.contains(field.name.as_str()) {
            return Err(IngestionError::SchemaMismatch {
                message: format!("missing required column '{}'", field.name),
            });
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (idx0, row_res) in reader.into_iter().enumerate() {
        let row_num = idx0 + 1;
        let row = row_res?;

        let map: HashMap<&str, &Field> = row
            .get_column_iter()
            .map(|(name, field)| (name.as_str(), field))
            .collect();

        let mut out_row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for f in &schema.fields {
            match map.get(f.name.as_str()) {
                Some(v) => out_row.push(convert_parquet_field(row_num, &f.name, &f.data_type, v)?),
                None if !f.required => out_row.push(Value::Null),
                None => {
                    return Err(IngestionError::SchemaMismatch {
                        message: format!("row {row_num} missing required column '{}'", f.name),
                    });
                }
            }
        }
        rows.push(out_row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

fn parquet_leaf_column_paths<R: ChunkReader + 'static>(
    reader: &SerializedFileReader<R>,
) -> HashSet<String> {
    reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.path().string())
        .collect()
}

fn convert_parquet_field(
    row: usize,
    column: &str,
    data_type: &DataType,
    f: &Field,
) -> IngestionResult<Value> {
    if matches!(f, Field::Null) {
        return Ok(Value::Null);
    }

    let parse_err = |message: &str| IngestionError::ParseError {
        row,
        column: column.to_string(),
        raw: f.to_string(),
        message: message.to_string(),
    };

    match data_type {
        DataType::Utf8 => match f {
            Field::Str(s) => Ok(Value::Utf8(s.clone())),
            _ => Err(parse_err("expected string")),
        },
        DataType::Int64 => match f {
            Field::Byte(v) => Ok(Value::Int64(i64::from(*v))),
            Field::Short(v) => Ok(Value::Int64(i64::from(*v))),
            Field::Int(v) => Ok(Value::Int64(i64::from(*v))),
            Field::Long(v) => Ok(Value::Int64(*v)),
            Field::UByte(v) => Ok(Value::Int64(i64::from(*v))),
            Field::UShort(v) => Ok(Value::Int64(i64::from(*v))),
            Field::UInt(v) => Ok(Value::Int64(i64::from(*v))),
            Field::ULong(v) => i64::try_from(*v)
                .map(Value::Int64)
                .map_err(|_| parse_err("u64 out of range for i64")),
            _ => Err(parse_err("expected integer")),
        },
        DataType::Float64 => match f {
            Field::Float(v) => Ok(finite(f64::from(*v))),
            Field::Double(v) => Ok(finite(*v)),
            Field::Int(v) => Ok(Value::Float64(f64::from(*v))),
            Field::Long(v) => Ok(Value::Float64(*v as f64)),
            _ => Err(parse_err("expected number")),
        },
        DataType::Date => {
            let date = match f {
                Field::Date(days) => date_from_epoch_days(*days),
                Field::TimestampMillis(ms) => epoch_days(ms.div_euclid(MILLIS_PER_DAY)),
                Field::TimestampMicros(us) => epoch_days(us.div_euclid(MILLIS_PER_DAY * 1_000)),
                Field::Str(s) => parse_date(s),
                _ => return Err(parse_err("expected date, timestamp or date string")),
            };
            if date.is_none() {
                log::debug!("row {row} column '{column}': unparseable date {f} treated as missing");
            }
            Ok(date.map(Value::Date).unwrap_or(Value::Null))
        }
    }
}

fn finite(v: f64) -> Value {
    if v.is_finite() {
        Value::Float64(v)
    } else {
        Value::Null
    }
}

fn epoch_days(days: i64) -> Option<chrono::NaiveDate> {
    i32::try_from(days).ok().and_then(date_from_epoch_days)
}
