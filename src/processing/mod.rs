//! The filter/aggregate pipeline.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion and
//! never mutates its input: every step returns a new dataset or a summary.
//!
//! - [`filter()`] / [`FilterSpec`]: order-preserving row selection
//! - [`reduce()`]: single-column reductions (count/sum/mean/min/max/count-distinct)
//! - [`group_by()`] / [`crosstab()`]: grouped aggregates over one or two keys
//! - [`describe_by()`]: five-number summaries per group
//! - [`Metric`] / [`ratio()`]: scalar metrics with a "not applicable" state
//!
//! ## Example: filter → reduce → group
//!
//! ```rust
//! use healthcare_analytics::processing::{group_by, reduce, FilterSpec, GroupBy, KeySpec, ReduceOp};
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
//! let women = FilterSpec::new().equals("gender", "F").apply(&ds).unwrap();
//! assert_eq!(women.row_count(), 1);
//! assert_eq!(reduce(&women, "billing_amount", ReduceOp::Sum).unwrap(), Value::Float64(100.0));
//!
//! let by_gender = group_by(&ds, &GroupBy::count(KeySpec::column("gender"))).unwrap();
//! assert_eq!(by_gender.total_rows(), ds.row_count());
//! ```

pub mod filter;
pub mod group;
pub mod metrics;
pub mod reduce;
pub mod stats;

pub use filter::{filter, FilterSpec, Predicate};
pub use group::{crosstab, group_by, Aggregate, Bands, CrossTab, Group, GroupBy, GroupKey, GroupOrder, KeySpec};
pub use metrics::{ratio, Metric};
pub use reduce::{reduce, ReduceOp};
pub use stats::{describe, describe_by, FiveNumberSummary, GroupDistribution};
