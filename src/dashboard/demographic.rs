use serde::Serialize;

use crate::config::DashboardConfig;
use crate::error::ProcessingResult;
use crate::healthcare::{
    AGE, BILLING_AMOUNT, BLOOD_TYPE, DATE_OF_ADMISSION, GENDER, HOSPITAL, LENGTH_OF_STAY,
    MEDICAL_CONDITION, NAME,
};
use crate::processing::{group_by, ratio, Aggregate, GroupBy, GroupOrder, KeySpec, Metric, ReduceOp};
use crate::types::{DataSet, Value};

use super::{count_distinct, metric, row_count};

const SAMPLE_COLUMNS: [&str; 6] = [NAME, AGE, GENDER, MEDICAL_CONDITION, HOSPITAL, DATE_OF_ADMISSION];

/// A small row sample for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl SampleTable {
    fn from_dataset(ds: DataSet) -> Self {
        Self {
            columns: ds.schema.field_names().map(str::to_string).collect(),
            rows: ds.rows,
        }
    }
}

/// Who the patients are.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicReport {
    pub no_data: bool,
    pub average_age: Metric,
    pub average_stay: Metric,
    pub total_billing: Metric,
    pub patients_per_hospital: Metric,
    pub age_distribution: Aggregate,
    pub gender_distribution: Aggregate,
    pub blood_type_distribution: Aggregate,
    pub monthly_admissions: Aggregate,
    pub sample: SampleTable,
}

pub(super) fn build(ds: &DataSet, config: &DashboardConfig) -> ProcessingResult<DemographicReport> {
    let hospitals = count_distinct(ds, HOSPITAL)?;
    let by_count_desc = |column: &str| {
        group_by(ds, &GroupBy::count(KeySpec::column(column)).order(GroupOrder::ValueDescending))
    };

    Ok(DemographicReport {
        no_data: ds.is_empty(),
        average_age: metric(ds, AGE, ReduceOp::Mean)?,
        average_stay: metric(ds, LENGTH_OF_STAY, ReduceOp::Mean)?,
        total_billing: metric(ds, BILLING_AMOUNT, ReduceOp::Sum)?,
        patients_per_hospital: ratio(row_count(ds), Metric::Value(hospitals as f64)),
        age_distribution: group_by(
            ds,
            &GroupBy::count(KeySpec::bands(AGE, config.demographic_age_bands.clone())),
        )?,
        gender_distribution: by_count_desc(GENDER)?,
        blood_type_distribution: by_count_desc(BLOOD_TYPE)?,
        monthly_admissions: group_by(ds, &GroupBy::count(KeySpec::month(DATE_OF_ADMISSION)))?
            .fill_month_gaps(Value::Int64(0)),
        sample: SampleTable::from_dataset(ds.select(&SAMPLE_COLUMNS).head(config.sample_rows)),
    })
}
