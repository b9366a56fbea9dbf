//! The healthcare encounter dataset: canonical columns, schema and loading.
//!
//! One row is one patient encounter. [`load_dataset`] ingests a file with [`schema`] and then
//! normalizes it so the rest of the crate can rely on two things:
//!
//! - admission date <= discharge date whenever both are present (a discharge date earlier than
//!   the admission is treated as missing)
//! - `length_of_stay` is filled from the two dates when the file does not provide it

use std::path::Path;

use crate::error::IngestionResult;
use crate::ingestion::{ingest_from_path, IngestionOptions};
use crate::types::{DataSet, DataType, Field, Schema, Value};

pub const NAME: &str = "name";
pub const AGE: &str = "age";
pub const GENDER: &str = "gender";
pub const BLOOD_TYPE: &str = "blood_type";
pub const MEDICAL_CONDITION: &str = "medical_condition";
pub const DATE_OF_ADMISSION: &str = "date_of_admission";
pub const DISCHARGE_DATE: &str = "discharge_date";
pub const HOSPITAL: &str = "hospital";
pub const INSURANCE_PROVIDER: &str = "insurance_provider";
pub const BILLING_AMOUNT: &str = "billing_amount";
pub const LENGTH_OF_STAY: &str = "length_of_stay";
pub const TEST_RESULTS: &str = "test_results";
pub const ROOM_NUMBER: &str = "room_number";

/// Schema of the encounter dataset.
///
/// `length_of_stay`, `test_results` and `room_number` are optional: files without them still
/// load, with those columns missing throughout.
pub fn schema() -> Schema {
    Schema::new(vec![
        Field::new(NAME, DataType::Utf8),
        Field::new(AGE, DataType::Int64),
        Field::new(GENDER, DataType::Utf8),
        Field::new(BLOOD_TYPE, DataType::Utf8),
        Field::new(MEDICAL_CONDITION, DataType::Utf8),
        Field::new(DATE_OF_ADMISSION, DataType::Date),
        Field::new(DISCHARGE_DATE, DataType::Date),
        Field::new(HOSPITAL, DataType::Utf8),
        Field::new(INSURANCE_PROVIDER, DataType::Utf8),
        Field::new(BILLING_AMOUNT, DataType::Float64),
        Field::optional(LENGTH_OF_STAY, DataType::Int64),
        Field::optional(TEST_RESULTS, DataType::Utf8),
        Field::optional(ROOM_NUMBER, DataType::Int64),
    ])
}

/// Counts of rows touched by [`normalize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Rows whose discharge date preceded admission; the discharge date was cleared.
    pub discharge_cleared: usize,
    /// Rows whose length of stay was derived from admission/discharge dates.
    pub stay_derived: usize,
}

/// Load the encounter dataset from `path` (CSV, JSON or Parquet) and normalize it.
pub fn load_dataset(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<DataSet> {
    let path = path.as_ref();
    let mut ds = ingest_from_path(path, &schema(), options)?;
    let report = normalize(&mut ds);
    log::info!(
        "loaded {} encounter(s) from {} (discharge_cleared={}, stay_derived={})",
        ds.row_count(),
        path.display(),
        report.discharge_cleared,
        report.stay_derived
    );
    Ok(ds)
}

/// Enforce the admission/discharge ordering and derive missing lengths of stay.
///
/// Datasets without the date columns are left untouched.
pub fn normalize(ds: &mut DataSet) -> NormalizeReport {
    let mut report = NormalizeReport::default();
    let (Some(adm), Some(dis)) = (
        ds.schema.index_of(DATE_OF_ADMISSION),
        ds.schema.index_of(DISCHARGE_DATE),
    ) else {
        return report;
    };
    let stay = ds.schema.index_of(LENGTH_OF_STAY);

    for (i, row) in ds.rows.iter_mut().enumerate() {
        let admitted = row.get(adm).and_then(Value::as_date);
        let discharged = row.get(dis).and_then(Value::as_date);
        if let (Some(a), Some(d)) = (admitted, discharged) {
            if d < a {
                log::warn!("row {}: discharge {d} precedes admission {a}; discharge treated as missing", i + 1);
                row[dis] = Value::Null;
                report.discharge_cleared += 1;
                continue;
            }
            if let Some(s) = stay {
                if row.get(s).is_some_and(Value::is_null) {
                    row[s] = Value::Int64((d - a).num_days());
                    report.stay_derived += 1;
                }
            }
        }
    }

    report
}
