//! `healthcare-analytics` loads a table of patient encounters into an in-memory
//! [`types::DataSet`] and computes the filtered aggregates behind four dashboard views.
//!
//! The primary entrypoints are [`healthcare::load_dataset`], which ingests and normalizes an
//! encounter file, and [`dashboard::Dashboard::render`], which filters the loaded dataset for one
//! [`dashboard::View`] and builds its report.
//!
//! ## What you can ingest
//!
//! **File formats (auto-detected by extension):**
//!
//! - **CSV**: `.csv`
//! - **JSON**: `.json` (array-of-objects) and `.ndjson` (newline-delimited objects)
//! - **Parquet**: `.parquet`, `.pq`
//!
//! Empty cells, empty strings and JSON `null` map to [`types::Value::Null`]. Dates are accepted in
//! several common layouts; a date that cannot be parsed is also treated as missing (and logged)
//! rather than failing the load.
//!
//! ## Quick example: one dashboard view
//!
//! ```no_run
//! use healthcare_analytics::config::DashboardConfig;
//! use healthcare_analytics::dashboard::{Choice, Dashboard, FilterSelection, View};
//! use healthcare_analytics::ingestion::IngestionOptions;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dashboard = Dashboard::load(
//!     "healthcare_dataset.csv",
//!     &IngestionOptions::default(),
//!     DashboardConfig::default(),
//! )?;
//! let selection = FilterSelection {
//!     gender: Choice::Only("Female".to_string()),
//!     ..FilterSelection::default()
//! };
//! let report = dashboard.render(View::Financial, &selection)?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: unified ingestion entrypoints and format-specific implementations
//! - [`types`]: schema + in-memory dataset types
//! - [`healthcare`]: the encounter schema, loading and normalization
//! - [`processing`]: filtering, reductions, grouping and summary metrics
//! - [`dashboard`]: the four views and the filter selection model
//! - [`config`]: dashboard tunables
//! - [`error`]: error types used across the crate
//!
//! ## Processing example
//!
//! ```rust
//! use healthcare_analytics::processing::{reduce, FilterSpec, ReduceOp};
//! use healthcare_analytics::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("age", DataType::Int64),
//!     Field::new("gender", DataType::Utf8),
//!     Field::new("billing_amount", DataType::Float64),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Int64(25), "F".into(), Value::Float64(100.0)],
//!         vec![Value::Int64(70), "M".into(), Value::Float64(200.0)],
//!     ],
//! );
//!
//! let subset = FilterSpec::new().equals("gender", "F").apply(&ds).unwrap();
//! assert_eq!(subset.row_count(), 1);
//! assert_eq!(reduce(&subset, "billing_amount", ReduceOp::Sum).unwrap(), Value::Float64(100.0));
//! ```
//!
//! ### Reduce operations
//!
//! - [`processing::ReduceOp::Count`]: counts rows (including nulls)
//! - [`processing::ReduceOp::Sum`], [`processing::ReduceOp::Mean`],
//!   [`processing::ReduceOp::Min`], [`processing::ReduceOp::Max`]: ignore nulls. If there are
//!   no values at all (including an empty dataset), these return `Value::Null`.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod healthcare;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{ConfigError, IngestionError, IngestionResult, ProcessingError, ProcessingResult};
