use serde::Serialize;

use crate::config::DashboardConfig;
use crate::error::{ProcessingError, ProcessingResult};
use crate::healthcare::{
    BILLING_AMOUNT, DATE_OF_ADMISSION, HOSPITAL, INSURANCE_PROVIDER, LENGTH_OF_STAY,
    MEDICAL_CONDITION, ROOM_NUMBER,
};
use crate::processing::{group_by, ratio, Aggregate, GroupBy, GroupOrder, KeySpec, Metric, ReduceOp};
use crate::types::{DataSet, Value};

use super::{count_distinct, has_values, metric, row_count};

/// Billing and resource use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialReport {
    pub no_data: bool,
    pub total_billing: Metric,
    pub average_billing: Metric,
    /// Total billing over total length of stay; not applicable when no stay is recorded.
    pub billing_per_patient_day: Metric,
    pub patients_per_condition: Metric,
    pub top_hospitals_by_billing: Aggregate,
    pub top_hospitals_by_stay: Aggregate,
    pub billing_by_insurer: Aggregate,
    pub patients_per_insurer: Aggregate,
    pub monthly_billing: Aggregate,
    pub average_billing_per_condition: Aggregate,
    /// Most used rooms; present only when the dataset records room numbers.
    pub room_usage: Option<Aggregate>,
}

pub(super) fn build(ds: &DataSet, full: &DataSet, config: &DashboardConfig) -> ProcessingResult<FinancialReport> {
    let total_billing = metric(ds, BILLING_AMOUNT, ReduceOp::Sum)?;
    let total_stay = metric(ds, LENGTH_OF_STAY, ReduceOp::Sum)?;
    let conditions = count_distinct(ds, MEDICAL_CONDITION)?;
    let hospital = || KeySpec::column(HOSPITAL);
    let insurer = || KeySpec::column(INSURANCE_PROVIDER);

    let room_usage = if has_values(full, ROOM_NUMBER) {
        let room = ds
            .schema
            .index_of(ROOM_NUMBER)
            .ok_or_else(|| ProcessingError::UnknownColumn(ROOM_NUMBER.to_string()))?;
        // Encounters without a room are not a room to rank.
        let roomed = ds.filter_rows(|row| row.get(room).is_some_and(|v| !v.is_null()));
        Some(group_by(
            &roomed,
            &GroupBy::count(KeySpec::column(ROOM_NUMBER))
                .order(GroupOrder::ValueDescending)
                .limit(config.top_n),
        )?)
    } else {
        None
    };

    Ok(FinancialReport {
        no_data: ds.is_empty(),
        total_billing,
        average_billing: metric(ds, BILLING_AMOUNT, ReduceOp::Mean)?,
        billing_per_patient_day: ratio(total_billing, total_stay),
        patients_per_condition: ratio(row_count(ds), Metric::Value(conditions as f64)),
        top_hospitals_by_billing: group_by(
            ds,
            &GroupBy::aggregate(hospital(), ReduceOp::Sum, BILLING_AMOUNT)
                .order(GroupOrder::ValueDescending)
                .limit(config.top_n),
        )?,
        top_hospitals_by_stay: group_by(
            ds,
            &GroupBy::aggregate(hospital(), ReduceOp::Mean, LENGTH_OF_STAY)
                .order(GroupOrder::ValueDescending)
                .limit(config.top_n),
        )?,
        billing_by_insurer: group_by(ds, &GroupBy::aggregate(insurer(), ReduceOp::Sum, BILLING_AMOUNT))?,
        patients_per_insurer: group_by(ds, &GroupBy::count(insurer()).order(GroupOrder::ValueDescending))?,
        monthly_billing: group_by(
            ds,
            &GroupBy::aggregate(KeySpec::month(DATE_OF_ADMISSION), ReduceOp::Sum, BILLING_AMOUNT),
        )?
        .fill_month_gaps(Value::Float64(0.0)),
        average_billing_per_condition: group_by(
            ds,
            &GroupBy::aggregate(KeySpec::column(MEDICAL_CONDITION), ReduceOp::Mean, BILLING_AMOUNT)
                .order(GroupOrder::ValueDescending),
        )?,
        room_usage,
    })
}
