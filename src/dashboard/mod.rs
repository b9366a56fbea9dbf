//! The four dashboard views over a loaded encounter dataset.
//!
//! A [`Dashboard`] owns the immutable source [`DataSet`]. Each call to [`Dashboard::render`]
//! applies the filters relevant to the requested [`View`] and recomputes every aggregate from
//! scratch; nothing is cached between calls.
//!
//! | view        | date range | gender | hospital |
//! |-------------|------------|--------|----------|
//! | overview    |            |        |          |
//! | demographic | yes        | yes    |          |
//! | clinical    | yes        | yes    |          |
//! | financial   | yes        | yes    | yes      |

mod clinical;
mod demographic;
mod financial;
mod overview;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::DashboardConfig;
use crate::error::{IngestionResult, ProcessingResult};
use crate::healthcare::{self, DATE_OF_ADMISSION, GENDER, HOSPITAL};
use crate::ingestion::IngestionOptions;
use crate::processing::{reduce, FilterSpec, Metric, ReduceOp};
use crate::types::{DataSet, Value};

pub use clinical::{ClinicalReport, TestResultsSection};
pub use demographic::{DemographicReport, SampleTable};
pub use financial::FinancialReport;
pub use overview::OverviewReport;

/// A dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Overview,
    Demographic,
    Clinical,
    Financial,
}

impl View {
    pub const ALL: [View; 4] = [View::Overview, View::Demographic, View::Clinical, View::Financial];

    /// Whether the date range and gender filters apply.
    pub fn uses_filters(self) -> bool {
        self != View::Overview
    }

    /// Whether the hospital filter applies.
    pub fn uses_hospital_filter(self) -> bool {
        self == View::Financial
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            View::Overview => "overview",
            View::Demographic => "demographic",
            View::Clinical => "clinical",
            View::Financial => "financial",
        };
        f.write_str(s)
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown view '{s}' (expected overview, demographic, clinical or financial)"))
    }
}

/// A categorical selector: everything, or one value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    /// `None` and `"All"` (any case) select everything.
    pub fn from_option(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None => Choice::All,
            Some(v) if v.eq_ignore_ascii_case("all") => Choice::All,
            Some(v) => Choice::Only(v.to_string()),
        }
    }
}

/// The user's filter selection. Which parts apply depends on the [`View`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    /// Inclusive lower bound on the admission date.
    pub admitted_from: Option<NaiveDate>,
    /// Inclusive upper bound on the admission date.
    pub admitted_to: Option<NaiveDate>,
    pub gender: Choice,
    pub hospital: Choice,
}

impl FilterSelection {
    /// The predicates this selection contributes to `view`.
    ///
    /// Filtered views always carry the admission range, open-ended where a bound is unset, so
    /// rows with a missing admission date only ever appear in the overview.
    pub fn filter_spec(&self, view: View) -> FilterSpec {
        if !view.uses_filters() {
            return FilterSpec::new();
        }
        let mut spec = FilterSpec::new().date_range(DATE_OF_ADMISSION, self.admitted_from, self.admitted_to);
        if let Choice::Only(g) = &self.gender {
            spec = spec.equals(GENDER, g.as_str());
        }
        if view.uses_hospital_filter() {
            if let Choice::Only(h) = &self.hospital {
                spec = spec.equals(HOSPITAL, h.as_str());
            }
        }
        spec
    }
}

/// Values available to the filter controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub min_admission: Option<NaiveDate>,
    pub max_admission: Option<NaiveDate>,
    /// Distinct genders in first-seen order ("All" is implicit).
    pub genders: Vec<String>,
    /// Distinct hospitals in first-seen order ("All" is implicit).
    pub hospitals: Vec<String>,
}

/// Output of [`Dashboard::render`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewReport {
    Overview(OverviewReport),
    Demographic(DemographicReport),
    Clinical(ClinicalReport),
    Financial(FinancialReport),
}

impl ViewReport {
    /// `true` when the filtered subset behind the report was empty.
    pub fn no_data(&self) -> bool {
        match self {
            ViewReport::Overview(r) => r.no_data,
            ViewReport::Demographic(r) => r.no_data,
            ViewReport::Clinical(r) => r.no_data,
            ViewReport::Financial(r) => r.no_data,
        }
    }
}

/// The loaded dataset plus view configuration.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: DataSet,
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(dataset: DataSet, config: DashboardConfig) -> Self {
        Self { dataset, config }
    }

    /// Load and normalize the encounter file at `path`.
    pub fn load(
        path: impl AsRef<Path>,
        options: &IngestionOptions,
        config: DashboardConfig,
    ) -> IngestionResult<Self> {
        Ok(Self::new(healthcare::load_dataset(path, options)?, config))
    }

    pub fn dataset(&self) -> &DataSet {
        &self.dataset
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn filter_options(&self) -> ProcessingResult<FilterOptions> {
        Ok(FilterOptions {
            min_admission: reduce(&self.dataset, DATE_OF_ADMISSION, ReduceOp::Min)?.as_date(),
            max_admission: reduce(&self.dataset, DATE_OF_ADMISSION, ReduceOp::Max)?.as_date(),
            genders: distinct_in_order(&self.dataset, GENDER),
            hospitals: distinct_in_order(&self.dataset, HOSPITAL),
        })
    }

    /// The rows `view` works on under `selection`.
    pub fn subset(&self, view: View, selection: &FilterSelection) -> ProcessingResult<DataSet> {
        selection.filter_spec(view).apply(&self.dataset)
    }

    /// Compute the report for `view`.
    pub fn render(&self, view: View, selection: &FilterSelection) -> ProcessingResult<ViewReport> {
        let subset = self.subset(view, selection)?;
        log::info!(
            "render view={view} rows={}/{}",
            subset.row_count(),
            self.dataset.row_count()
        );
        Ok(match view {
            View::Overview => ViewReport::Overview(overview::build(&subset)?),
            View::Demographic => ViewReport::Demographic(demographic::build(&subset, &self.config)?),
            View::Clinical => ViewReport::Clinical(clinical::build(&subset, &self.dataset, &self.config)?),
            View::Financial => ViewReport::Financial(financial::build(&subset, &self.dataset, &self.config)?),
        })
    }
}

fn distinct_in_order(ds: &DataSet, column: &str) -> Vec<String> {
    let Some(idx) = ds.schema.index_of(column) else {
        return Vec::new();
    };
    let mut out: Vec<String> = Vec::new();
    for v in ds.column_values(idx) {
        if v.is_null() {
            continue;
        }
        let s = v.to_string();
        if !out.contains(&s) {
            out.push(s);
        }
    }
    out
}

/// `op` over `column` as a [`Metric`].
fn metric(ds: &DataSet, column: &str, op: ReduceOp) -> ProcessingResult<Metric> {
    Ok(Metric::from_value(&reduce(ds, column, op)?))
}

fn row_count(ds: &DataSet) -> Metric {
    Metric::Value(ds.row_count() as f64)
}

/// Whether `column` carries any value at all; optional columns absent from the file do not.
fn has_values(ds: &DataSet, column: &str) -> bool {
    ds.schema
        .index_of(column)
        .is_some_and(|idx| ds.column_values(idx).any(|v| !v.is_null()))
}

fn count_distinct(ds: &DataSet, column: &str) -> ProcessingResult<usize> {
    Ok(match reduce(ds, column, ReduceOp::CountDistinct)? {
        Value::Int64(n) => n as usize,
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Choice, FilterSelection, View};
    use crate::processing::{FilterSpec, Predicate};

    #[test]
    fn view_parses_case_insensitively() {
        assert_eq!("Financial".parse::<View>(), Ok(View::Financial));
        assert!("home".parse::<View>().is_err());
    }

    #[test]
    fn choice_treats_all_as_no_filter() {
        assert_eq!(Choice::from_option(None), Choice::All);
        assert_eq!(Choice::from_option(Some("ALL")), Choice::All);
        assert_eq!(Choice::from_option(Some("Female")), Choice::Only("Female".to_string()));
    }

    #[test]
    fn filters_apply_per_view() {
        let from = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let sel = FilterSelection {
            admitted_from: Some(from),
            admitted_to: None,
            gender: Choice::Only("Female".to_string()),
            hospital: Choice::Only("Mercy".to_string()),
        };

        assert!(sel.filter_spec(View::Overview).is_empty());
        assert_eq!(sel.filter_spec(View::Clinical).predicates().len(), 2);
        let financial = sel.filter_spec(View::Financial);
        assert_eq!(financial.predicates().len(), 3);
        assert_eq!(
            financial.predicates()[2],
            Predicate::Equals {
                column: "hospital".to_string(),
                value: "Mercy".into()
            }
        );
        assert_eq!(
            FilterSelection::default().filter_spec(View::Financial),
            FilterSpec::new().date_range("date_of_admission", None, None)
        );
        assert!(FilterSelection::default().filter_spec(View::Overview).is_empty());
    }
}
