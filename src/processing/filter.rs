//! Row filtering for [`crate::types::DataSet`].
//!
//! [`filter`] takes an arbitrary closure. [`FilterSpec`] is the declarative form used by the
//! dashboard: a conjunction of inclusive date ranges and equality tests over named columns.

use chrono::NaiveDate;

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::{DataSet, DataType, Schema, Value};

/// Returns a new [`DataSet`] containing only rows for which `predicate` returns `true`.
///
/// This is a convenience wrapper around [`DataSet::filter_rows`].
pub fn filter<F>(dataset: &DataSet, predicate: F) -> DataSet
where
    F: FnMut(&[Value]) -> bool,
{
    dataset.filter_rows(predicate)
}

/// A single row predicate over a named column.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `start <= column <= end`; an open bound is `None`. Rows with a missing date never match.
    DateRange {
        column: String,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    /// `column == value`. A value that never occurs (or has another type) matches nothing.
    Equals { column: String, value: Value },
}

impl Predicate {
    fn bind(&self, schema: &Schema) -> ProcessingResult<BoundPredicate<'_>> {
        match self {
            Predicate::DateRange { column, start, end } => {
                let idx = column_index(schema, column)?;
                if schema.fields[idx].data_type != DataType::Date {
                    return Err(ProcessingError::NotDate(column.clone()));
                }
                Ok(BoundPredicate::DateRange {
                    idx,
                    start: *start,
                    end: *end,
                })
            }
            Predicate::Equals { column, value } => Ok(BoundPredicate::Equals {
                idx: column_index(schema, column)?,
                value,
            }),
        }
    }
}

/// A predicate resolved against a schema.
enum BoundPredicate<'a> {
    DateRange {
        idx: usize,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    Equals {
        idx: usize,
        value: &'a Value,
    },
}

impl BoundPredicate<'_> {
    fn matches(&self, row: &[Value]) -> bool {
        match self {
            BoundPredicate::DateRange { idx, start, end } => match row.get(*idx) {
                Some(Value::Date(d)) => start.is_none_or(|s| *d >= s) && end.is_none_or(|e| *d <= e),
                _ => false,
            },
            BoundPredicate::Equals { idx, value } => row.get(*idx) == Some(*value),
        }
    }
}

fn column_index(schema: &Schema, column: &str) -> ProcessingResult<usize> {
    schema
        .index_of(column)
        .ok_or_else(|| ProcessingError::UnknownColumn(column.to_string()))
}

/// A conjunction of [`Predicate`]s. The empty spec keeps every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    predicates: Vec<Predicate>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an inclusive date range over `column`.
    pub fn date_range(
        mut self,
        column: impl Into<String>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        self.predicates.push(Predicate::DateRange {
            column: column.into(),
            start,
            end,
        });
        self
    }

    /// Add an equality test `column == value`.
    pub fn equals(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Equals {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Conjunction of `self` and `other`.
    pub fn and(mut self, other: FilterSpec) -> Self {
        self.predicates.extend(other.predicates);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Rows of `dataset` satisfying every predicate, in their original order.
    ///
    /// Fails only when a predicate names a column the schema lacks, or applies a date range
    /// to a non-date column.
    pub fn apply(&self, dataset: &DataSet) -> ProcessingResult<DataSet> {
        let bound = self
            .predicates
            .iter()
            .map(|p| p.bind(&dataset.schema))
            .collect::<ProcessingResult<Vec<_>>>()?;
        let out = dataset.filter_rows(|row| bound.iter().all(|p| p.matches(row)));
        log::debug!(
            "filter: {} predicate(s) kept {}/{} rows",
            bound.len(),
            out.row_count(),
            dataset.row_count()
        );
        Ok(out)
    }
}
