//! Reduction operations for [`crate::types::DataSet`].

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::{DataSet, DataType, Schema, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReduceOp {
    /// Count all rows (including nulls).
    Count,
    /// Sum numeric values, ignoring nulls.
    Sum,
    /// Arithmetic mean of numeric values, ignoring nulls. Always `Float64`.
    Mean,
    /// Minimum numeric or date value, ignoring nulls.
    Min,
    /// Maximum numeric or date value, ignoring nulls.
    Max,
    /// Number of distinct non-null values.
    CountDistinct,
}

impl ReduceOp {
    /// Check that this op can run over `column` and return the column index.
    pub(crate) fn validate(self, schema: &Schema, column: &str) -> ProcessingResult<usize> {
        let idx = schema
            .index_of(column)
            .ok_or_else(|| ProcessingError::UnknownColumn(column.to_string()))?;
        let data_type = &schema.fields[idx].data_type;
        let ok = match self {
            ReduceOp::Count | ReduceOp::CountDistinct => true,
            ReduceOp::Sum | ReduceOp::Mean => data_type.is_numeric(),
            ReduceOp::Min | ReduceOp::Max => data_type.is_numeric() || *data_type == DataType::Date,
        };
        if !ok {
            return Err(ProcessingError::NotNumeric {
                column: column.to_string(),
                op: self.to_string(),
            });
        }
        Ok(idx)
    }
}

impl fmt::Display for ReduceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReduceOp::Count => "count",
            ReduceOp::Sum => "sum",
            ReduceOp::Mean => "mean",
            ReduceOp::Min => "min",
            ReduceOp::Max => "max",
            ReduceOp::CountDistinct => "count_distinct",
        };
        f.write_str(s)
    }
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns [`ProcessingError::UnknownColumn`] if `column` does not exist in the schema.
/// - For `Sum`/`Mean`/`Min`/`Max`, returns `Value::Null` ("no data") if there are no non-null
///   values, which includes the empty dataset.
/// - For `Count`, always returns `Value::Int64(row_count)`.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> ProcessingResult<Value> {
    let idx = op.validate(&dataset.schema, column)?;
    let acc = dataset
        .column_values(idx)
        .fold(Accumulator::new(op), |mut acc, v| {
            acc.push(v);
            acc
        });
    acc.finish(column)
}

/// Streaming state for one [`ReduceOp`]; shared by [`reduce`] and group-by.
#[derive(Debug, Clone)]
pub(crate) struct Accumulator {
    op: ReduceOp,
    rows: u64,
    non_null: u64,
    int_sum: Option<i64>,
    all_int: bool,
    float_sum: f64,
    min: Option<Value>,
    max: Option<Value>,
    distinct: HashSet<String>,
}

impl Accumulator {
    pub(crate) fn new(op: ReduceOp) -> Self {
        Self {
            op,
            rows: 0,
            non_null: 0,
            int_sum: Some(0),
            all_int: true,
            float_sum: 0.0,
            min: None,
            max: None,
            distinct: HashSet::new(),
        }
    }

    /// Account for one row that carries no value column (plain row counting).
    pub(crate) fn push_row(&mut self) {
        self.rows += 1;
    }

    pub(crate) fn rows(&self) -> u64 {
        self.rows
    }

    pub(crate) fn push(&mut self, v: &Value) {
        self.rows += 1;
        // Non-finite floats carry no usable amount; they count as missing.
        if v.is_null() || matches!(v, Value::Float64(f) if !f.is_finite()) {
            return;
        }
        match self.op {
            ReduceOp::Count => {}
            ReduceOp::CountDistinct => {
                self.distinct.insert(v.to_string());
            }
            ReduceOp::Sum | ReduceOp::Mean => {
                let Some(f) = v.as_f64() else { return };
                self.non_null += 1;
                self.float_sum += f;
                match v {
                    Value::Int64(i) => self.int_sum = self.int_sum.and_then(|s| s.checked_add(*i)),
                    _ => self.all_int = false,
                }
            }
            ReduceOp::Min => {
                self.non_null += 1;
                if self.min.as_ref().is_none_or(|m| v.sort_cmp(m) == Ordering::Less) {
                    self.min = Some(v.clone());
                }
            }
            ReduceOp::Max => {
                self.non_null += 1;
                if self.max.as_ref().is_none_or(|m| v.sort_cmp(m) == Ordering::Greater) {
                    self.max = Some(v.clone());
                }
            }
        }
    }

    pub(crate) fn finish(self, column: &str) -> ProcessingResult<Value> {
        match self.op {
            ReduceOp::Count => Ok(Value::Int64(self.rows as i64)),
            ReduceOp::CountDistinct => Ok(Value::Int64(self.distinct.len() as i64)),
            _ if self.non_null == 0 => Ok(Value::Null),
            ReduceOp::Sum if self.all_int => self
                .int_sum
                .map(Value::Int64)
                .ok_or_else(|| ProcessingError::Overflow(column.to_string())),
            ReduceOp::Sum => Ok(Value::Float64(self.float_sum)),
            ReduceOp::Mean => Ok(Value::Float64(self.float_sum / self.non_null as f64)),
            ReduceOp::Min => Ok(self.min.unwrap_or(Value::Null)),
            ReduceOp::Max => Ok(self.max.unwrap_or(Value::Null)),
        }
    }
}
