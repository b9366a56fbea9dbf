use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

use healthcare_analytics::ingestion::parquet::ingest_parquet_from_path;
use healthcare_analytics::types::{DataType, Field, Schema, Value};

// 2023-01-05 and 2023-01-20 as days since the Unix epoch.
const JAN_5_2023: i32 = 19_362;
const JAN_20_2023: i32 = 19_377;

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("healthcare-analytics-{name}-{nanos}.parquet"))
}

fn encounter_schema() -> Schema {
    Schema::new(vec![
        Field::new("gender", DataType::Utf8),
        Field::new("date_of_admission", DataType::Date),
        Field::new("discharge_date", DataType::Date),
        Field::new("billing_amount", DataType::Float64),
        Field::optional("length_of_stay", DataType::Int64),
    ])
}

/// Admission dates are stored as parquet `DATE`, discharge dates as strings.
fn write_encounters_parquet(path: &PathBuf) {
    let schema_str = r#"
    message schema {
      REQUIRED BINARY gender (UTF8);
      REQUIRED INT32 date_of_admission (DATE);
      REQUIRED BINARY discharge_date (UTF8);
      REQUIRED DOUBLE billing_amount;
    }
    "#;

    let schema = Arc::new(parse_message_type(schema_str).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let mut rg = writer.next_row_group().unwrap();
    let mut col_idx: usize = 0;
    while let Some(mut col) = rg.next_column().unwrap() {
        match col.untyped() {
            ColumnWriter::Int32ColumnWriter(w) => {
                w.write_batch(&[JAN_5_2023, JAN_20_2023], None, None).unwrap();
            }
            ColumnWriter::ByteArrayColumnWriter(w) => {
                // col0 = gender, col2 = discharge_date
                let values = if col_idx == 0 {
                    [ByteArray::from("Female"), ByteArray::from("Male")]
                } else {
                    [ByteArray::from("2023-01-10"), ByteArray::from("soon")]
                };
                w.write_batch(&values, None, None).unwrap();
            }
            ColumnWriter::DoubleColumnWriter(w) => {
                w.write_batch(&[1000.5_f64, 2500.0_f64], None, None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
        col_idx += 1;
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

#[test]
fn ingest_parquet_happy_path() {
    let path = tmp_file("encounters");
    write_encounters_parquet(&path);

    let ds = ingest_parquet_from_path(&path, &encounter_schema()).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.rows[0][0], Value::Utf8("Female".to_string()));
    assert_eq!(ds.rows[0][1], Value::Date(NaiveDate::from_ymd_opt(2023, 1, 5).unwrap()));
    assert_eq!(ds.rows[0][2], Value::Date(NaiveDate::from_ymd_opt(2023, 1, 10).unwrap()));
    assert_eq!(ds.rows[1][3], Value::Float64(2500.0));
    // Optional column absent from the file.
    assert_eq!(ds.rows[0][4], Value::Null);
    // Unparseable date string.
    assert_eq!(ds.rows[1][2], Value::Null);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn ingest_parquet_errors_on_missing_required_column() {
    let path = tmp_file("missing");
    write_encounters_parquet(&path);

    let mut fields = encounter_schema().fields;
    fields.push(Field::new("hospital", DataType::Utf8));
    let err = ingest_parquet_from_path(&path, &Schema::new(fields)).unwrap_err();
    assert!(err.to_string().contains("missing required column 'hospital'"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn ingest_parquet_errors_on_type_mismatch() {
    let path = tmp_file("type-mismatch");
    write_encounters_parquet(&path);

    let schema = Schema::new(vec![Field::new("gender", DataType::Int64)]);
    let err = ingest_parquet_from_path(&path, &schema).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("failed to parse value"));
    assert!(msg.contains("column 'gender'"));
    let _ = std::fs::remove_file(&path);
}
