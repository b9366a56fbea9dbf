use chrono::Datelike;
use serde::Serialize;

use crate::error::ProcessingResult;
use crate::healthcare::{DATE_OF_ADMISSION, HOSPITAL, MEDICAL_CONDITION};
use crate::processing::{reduce, ReduceOp};
use crate::types::DataSet;

use super::count_distinct;

/// Headline figures for the whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewReport {
    pub no_data: bool,
    pub total_encounters: usize,
    pub hospitals: usize,
    /// Year of the earliest admission, if any admission date is known.
    pub first_admission_year: Option<i32>,
    pub last_admission_year: Option<i32>,
    pub conditions: usize,
}

pub(super) fn build(ds: &DataSet) -> ProcessingResult<OverviewReport> {
    let year = |op| -> ProcessingResult<Option<i32>> {
        Ok(reduce(ds, DATE_OF_ADMISSION, op)?.as_date().map(|d| d.year()))
    };
    Ok(OverviewReport {
        no_data: ds.is_empty(),
        total_encounters: ds.row_count(),
        hospitals: count_distinct(ds, HOSPITAL)?,
        first_admission_year: year(ReduceOp::Min)?,
        last_admission_year: year(ReduceOp::Max)?,
        conditions: count_distinct(ds, MEDICAL_CONDITION)?,
    })
}
