//! Distribution summaries (five-number summary per group).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::{DataSet, Value};

use super::group::{GroupKey, KeySpec};

/// Minimum, quartiles and maximum of a set of numbers.
///
/// Quartiles use linear interpolation between closest ranks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    /// Summarize `values`; `None` when there are no finite values.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            count: sorted.len(),
            min: sorted[0],
            q1: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q3: quantile_sorted(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// `q`-quantile of non-empty sorted data.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Summary of one group's values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDistribution {
    pub key: GroupKey,
    /// `None` when the group has no numeric values.
    pub summary: Option<FiveNumberSummary>,
}

/// Five-number summary of `column`.
pub fn describe(dataset: &DataSet, column: &str) -> ProcessingResult<Option<FiveNumberSummary>> {
    let idx = numeric_column(dataset, column)?;
    Ok(FiveNumberSummary::from_values(
        dataset.column_values(idx).filter_map(Value::as_f64),
    ))
}

/// Five-number summary of `column` for every group of `key`, in key order.
pub fn describe_by(
    dataset: &DataSet,
    key: &KeySpec,
    column: &str,
) -> ProcessingResult<Vec<GroupDistribution>> {
    let bound = key.bind(&dataset.schema)?;
    let idx = numeric_column(dataset, column)?;

    let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
    for row in &dataset.rows {
        let values = groups.entry(bound.key_of(row)).or_default();
        if let Some(v) = row.get(idx).and_then(Value::as_f64) {
            values.push(v);
        }
    }

    Ok(groups
        .into_iter()
        .map(|(key, values)| GroupDistribution {
            key,
            summary: FiveNumberSummary::from_values(values),
        })
        .collect())
}

fn numeric_column(dataset: &DataSet, column: &str) -> ProcessingResult<usize> {
    let idx = dataset
        .schema
        .index_of(column)
        .ok_or_else(|| ProcessingError::UnknownColumn(column.to_string()))?;
    if !dataset.schema.fields[idx].data_type.is_numeric() {
        return Err(ProcessingError::NotNumeric {
            column: column.to_string(),
            op: "describe".to_string(),
        });
    }
    Ok(idx)
}
