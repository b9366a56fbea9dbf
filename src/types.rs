//! Core data model types.
//!
//! Ingestion turns a file into an in-memory [`DataSet`], using a [`Schema`] (a list of typed
//! [`Field`]s). Every later stage (filtering, grouping, views) reads from that dataset and
//! produces new datasets or summaries; nothing mutates a loaded dataset in place.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Logical data type for a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// UTF-8 string.
    Utf8,
    /// Calendar date without time zone.
    Date,
}

impl DataType {
    /// Whether numeric reductions (sum/mean/min/max) apply to this type.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int64 | DataType::Float64)
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
    /// Whether the column must be present in the input.
    ///
    /// Optional columns that are absent are filled with [`Value::Null`].
    pub required: bool,
}

impl Field {
    /// Create a new required field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            required: true,
        }
    }

    /// Create a field that may be missing from the input.
    pub fn optional(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            required: false,
        }
    }
}

/// A list of fields describing the expected shape of incoming data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns a field by name, if present.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A single typed value in a [`DataSet`].
///
/// Serializes untagged: `Null` as JSON `null`, dates as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
    /// Calendar date.
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value; `None` for missing and non-numeric values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Total order used when sorting by value: numbers compare numerically (NaN last among
    /// numbers), strings and dates by their natural order, and `Null` after everything else.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Int64(_) | Value::Float64(_) => 0,
                Value::Date(_) => 1,
                Value::Utf8(_) => 2,
                Value::Null => 3,
            }
        }

        match (self, other) {
            (Value::Int64(a), Value::Int64(b)) => a.cmp(b),
            (a, b) if rank(a) == 0 && rank(b) == 0 => {
                let (a, b) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
                a.total_cmp(&b)
            }
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Utf8(a), Value::Utf8(b)) => a.cmp(b),
            (a, b) => rank(a).cmp(&rank(b)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Utf8(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Utf8(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Utf8(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

/// Shared missing value, for lookups that fall off the end of a short row.
pub(crate) static NULL: Value = Value::Null;

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate the values of column `idx`, one per row.
    ///
    /// Short rows yield [`Value::Null`].
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().map(move |row| row.get(idx).unwrap_or(&NULL))
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original schema and row order.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Create a dataset with only the named columns, in the given order.
    ///
    /// Unknown names are skipped.
    pub fn select(&self, columns: &[&str]) -> Self {
        let idxs: Vec<usize> = columns
            .iter()
            .filter_map(|c| self.schema.index_of(c))
            .collect();
        let fields = idxs.iter().map(|&i| self.schema.fields[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                idxs.iter()
                    .map(|&i| row.get(i).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Self::new(Schema::new(fields), rows)
    }

    /// First `n` rows, schema preserved.
    pub fn head(&self, n: usize) -> Self {
        Self {
            schema: self.schema.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use chrono::NaiveDate;

    use super::{DataSet, DataType, Field, Schema, Value};

    fn sample_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("gender", DataType::Utf8),
            Field::optional("room_number", DataType::Int64),
        ]);
        DataSet::new(
            schema,
            vec![
                vec![Value::Int64(1), "F".into(), Value::Int64(101)],
                vec![Value::Int64(2), "M".into(), Value::Null],
                vec![Value::Int64(3), "F".into(), Value::Int64(102)],
            ],
        )
    }

    #[test]
    fn schema_lookup_by_name() {
        let ds = sample_dataset();
        assert_eq!(ds.schema.index_of("gender"), Some(1));
        assert_eq!(ds.schema.index_of("missing"), None);
        assert!(!ds.schema.field("room_number").unwrap().required);
        assert!(ds.schema.field("id").unwrap().required);
    }

    #[test]
    fn select_and_head_keep_row_order() {
        let ds = sample_dataset();
        let out = ds.select(&["gender", "id", "nope"]).head(2);
        assert_eq!(out.schema.field_names().collect::<Vec<_>>(), vec!["gender", "id"]);
        assert_eq!(
            out.rows,
            vec![
                vec![Value::Utf8("F".to_string()), Value::Int64(1)],
                vec![Value::Utf8("M".to_string()), Value::Int64(2)],
            ]
        );
    }

    #[test]
    fn sort_cmp_puts_null_last_and_mixes_numbers() {
        assert_eq!(Value::Int64(2).sort_cmp(&Value::Float64(2.5)), Ordering::Less);
        assert_eq!(Value::Null.sort_cmp(&Value::Int64(0)), Ordering::Greater);
        assert_eq!(Value::Utf8("a".into()).sort_cmp(&Value::Null), Ordering::Less);
    }

    #[test]
    fn values_serialize_untagged() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let json = serde_json::to_string(&vec![
            Value::Null,
            Value::Int64(3),
            Value::Utf8("x".into()),
            Value::Date(d),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,3,"x","2024-02-29"]"#);
    }
}
