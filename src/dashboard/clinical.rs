use serde::Serialize;

use crate::config::DashboardConfig;
use crate::error::ProcessingResult;
use crate::healthcare::{AGE, LENGTH_OF_STAY, MEDICAL_CONDITION, TEST_RESULTS};
use crate::processing::{
    crosstab, describe_by, group_by, Aggregate, CrossTab, GroupBy, GroupDistribution, GroupOrder,
    KeySpec, ReduceOp,
};
use crate::types::DataSet;

use super::has_values;

/// Present only when the dataset records test results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResultsSection {
    pub counts: Aggregate,
    /// Condition x test result.
    pub by_condition: CrossTab,
}

/// Conditions, stays and outcomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicalReport {
    pub no_data: bool,
    pub patients_per_condition: Aggregate,
    pub average_stay_per_condition: Aggregate,
    pub stay_distribution: Vec<GroupDistribution>,
    /// Age category x condition.
    pub age_by_condition: CrossTab,
    pub test_results: Option<TestResultsSection>,
}

/// `full` decides whether optional sections exist; `ds` is the filtered subset they summarize.
pub(super) fn build(ds: &DataSet, full: &DataSet, config: &DashboardConfig) -> ProcessingResult<ClinicalReport> {
    let condition = || KeySpec::column(MEDICAL_CONDITION);

    let test_results = if has_values(full, TEST_RESULTS) {
        Some(TestResultsSection {
            counts: group_by(ds, &GroupBy::count(KeySpec::column(TEST_RESULTS)))?,
            by_condition: crosstab(ds, condition(), KeySpec::column(TEST_RESULTS))?,
        })
    } else {
        None
    };

    Ok(ClinicalReport {
        no_data: ds.is_empty(),
        patients_per_condition: group_by(ds, &GroupBy::count(condition()).order(GroupOrder::ValueDescending))?,
        average_stay_per_condition: group_by(
            ds,
            &GroupBy::aggregate(condition(), ReduceOp::Mean, LENGTH_OF_STAY).order(GroupOrder::ValueAscending),
        )?,
        stay_distribution: describe_by(ds, &condition(), LENGTH_OF_STAY)?,
        age_by_condition: crosstab(
            ds,
            KeySpec::bands(AGE, config.clinical_age_bands.clone()),
            condition(),
        )?,
        test_results,
    })
}
