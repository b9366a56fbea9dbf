//! Group-by aggregation and crosstabs.
//!
//! A [`GroupBy`] names one or two [`KeySpec`]s and a [`ReduceOp`]; [`group_by`] turns a dataset
//! into an [`Aggregate`]: one [`Group`] per distinct key (tuple), each carrying its row count and
//! the reduced value. Missing key values are kept as [`GroupKey::Missing`] rather than dropped,
//! so group row counts always add up to the dataset's row count.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::Datelike;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::{DataSet, DataType, Schema, Value, NULL};

use super::reduce::{Accumulator, ReduceOp};

/// The value a row contributes to one grouping dimension.
///
/// Variant order is the sort order used for [`GroupOrder::Key`]: within a variant keys sort
/// naturally, and `Missing` always sorts last.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Integer(i64),
    /// A numeric band; `index` is the band's position in its [`Bands`].
    Band { index: usize, label: String },
    /// A calendar month.
    Month { year: i32, month: u32 },
    Category(String),
    Missing,
}

impl GroupKey {
    fn from_value(v: &Value) -> Self {
        match v {
            Value::Null => GroupKey::Missing,
            Value::Int64(i) => GroupKey::Integer(*i),
            Value::Utf8(s) => GroupKey::Category(s.clone()),
            other => GroupKey::Category(other.to_string()),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Integer(i) => write!(f, "{i}"),
            GroupKey::Band { label, .. } => f.write_str(label),
            GroupKey::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            GroupKey::Category(s) => f.write_str(s),
            GroupKey::Missing => f.write_str("(missing)"),
        }
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GroupKey::Integer(i) => serializer.serialize_i64(*i),
            GroupKey::Missing => serializer.serialize_none(),
            other => serializer.collect_str(other),
        }
    }
}

/// Right-open numeric bands: `[edges[0], edges[1])`, `[edges[1], edges[2])`, ...
///
/// Values outside every band group as [`GroupKey::Missing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBands")]
pub struct Bands {
    edges: Vec<i64>,
    labels: Vec<String>,
}

#[derive(Deserialize)]
struct RawBands {
    edges: Vec<i64>,
    labels: Vec<String>,
}

impl TryFrom<RawBands> for Bands {
    type Error = ProcessingError;

    fn try_from(raw: RawBands) -> Result<Self, Self::Error> {
        Bands::new(raw.edges, raw.labels)
    }
}

impl Bands {
    /// Edges must be strictly increasing and there must be one label per band.
    pub fn new<L: Into<String>>(edges: Vec<i64>, labels: Vec<L>) -> ProcessingResult<Self> {
        if edges.len() < 2 {
            return Err(ProcessingError::InvalidGrouping(
                "bands need at least two edges".to_string(),
            ));
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ProcessingError::InvalidGrouping(format!(
                "band edges must be strictly increasing: {edges:?}"
            )));
        }
        if labels.len() != edges.len() - 1 {
            return Err(ProcessingError::InvalidGrouping(format!(
                "{} band(s) but {} label(s)",
                edges.len() - 1,
                labels.len()
            )));
        }
        Ok(Self {
            edges,
            labels: labels.into_iter().map(Into::into).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Index of the band containing `v`, if any.
    pub fn band_of(&self, v: f64) -> Option<usize> {
        self.edges
            .windows(2)
            .position(|w| v >= w[0] as f64 && v < w[1] as f64)
    }

    fn key(&self, index: usize) -> GroupKey {
        GroupKey::Band {
            index,
            label: self.labels[index].clone(),
        }
    }

    fn all_keys(&self) -> impl Iterator<Item = GroupKey> + '_ {
        (0..self.len()).map(|i| self.key(i))
    }
}

/// One grouping dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum KeySpec {
    /// The column's own values.
    Column(String),
    /// A numeric column cut into [`Bands`].
    Bands { column: String, bands: Bands },
    /// The calendar month of a date column.
    Month(String),
}

impl KeySpec {
    pub fn column(name: impl Into<String>) -> Self {
        KeySpec::Column(name.into())
    }

    pub fn bands(column: impl Into<String>, bands: Bands) -> Self {
        KeySpec::Bands {
            column: column.into(),
            bands,
        }
    }

    pub fn month(column: impl Into<String>) -> Self {
        KeySpec::Month(column.into())
    }

    /// Name of the underlying column.
    pub fn column_name(&self) -> &str {
        match self {
            KeySpec::Column(c) | KeySpec::Month(c) => c,
            KeySpec::Bands { column, .. } => column,
        }
    }

    pub(crate) fn bind(&self, schema: &Schema) -> ProcessingResult<BoundKey<'_>> {
        let name = self.column_name();
        let idx = schema
            .index_of(name)
            .ok_or_else(|| ProcessingError::UnknownColumn(name.to_string()))?;
        let data_type = &schema.fields[idx].data_type;
        match self {
            KeySpec::Bands { .. } if !data_type.is_numeric() => Err(ProcessingError::NotNumeric {
                column: name.to_string(),
                op: "bands".to_string(),
            }),
            KeySpec::Month(_) if *data_type != DataType::Date => {
                Err(ProcessingError::NotDate(name.to_string()))
            }
            _ => Ok(BoundKey { idx, spec: self }),
        }
    }
}

/// A [`KeySpec`] resolved against a schema.
pub(crate) struct BoundKey<'a> {
    idx: usize,
    spec: &'a KeySpec,
}

impl BoundKey<'_> {
    pub(crate) fn key_of(&self, row: &[Value]) -> GroupKey {
        let v = row.get(self.idx).unwrap_or(&NULL);
        match self.spec {
            KeySpec::Column(_) => GroupKey::from_value(v),
            KeySpec::Bands { bands, .. } => v
                .as_f64()
                .and_then(|f| bands.band_of(f))
                .map(|i| bands.key(i))
                .unwrap_or(GroupKey::Missing),
            KeySpec::Month(_) => match v {
                Value::Date(d) => GroupKey::Month {
                    year: d.year(),
                    month: d.month(),
                },
                _ => GroupKey::Missing,
            },
        }
    }
}

/// How groups are ordered in an [`Aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOrder {
    /// By key (see [`GroupKey`] for the order).
    #[default]
    Key,
    ValueAscending,
    ValueDescending,
}

/// A group-by request: 1 or 2 keys, an aggregation, an order and an optional top-N limit.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBy {
    keys: Vec<KeySpec>,
    op: ReduceOp,
    value_column: Option<String>,
    order: GroupOrder,
    limit: Option<usize>,
}

impl GroupBy {
    /// Count rows per group.
    pub fn count(key: KeySpec) -> Self {
        Self {
            keys: vec![key],
            op: ReduceOp::Count,
            value_column: None,
            order: GroupOrder::Key,
            limit: None,
        }
    }

    /// Reduce `column` with `op` per group.
    pub fn aggregate(key: KeySpec, op: ReduceOp, column: impl Into<String>) -> Self {
        Self {
            keys: vec![key],
            op,
            value_column: Some(column.into()),
            order: GroupOrder::Key,
            limit: None,
        }
    }

    /// Add a second grouping dimension.
    pub fn then_by(mut self, key: KeySpec) -> Self {
        self.keys.push(key);
        self
    }

    pub fn order(mut self, order: GroupOrder) -> Self {
        self.order = order;
        self
    }

    /// Keep only the first `n` groups after ordering.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

/// One output group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    /// One entry per grouping dimension.
    pub key: Vec<GroupKey>,
    /// Number of rows in the group.
    pub rows: usize,
    /// The reduced value; `Null` when the group has no usable values.
    pub value: Value,
}

/// Result of [`group_by`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    /// Column names of the grouping dimensions.
    pub keys: Vec<String>,
    pub op: ReduceOp,
    pub value_column: Option<String>,
    pub groups: Vec<Group>,
}

impl Aggregate {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Sum of group row counts.
    pub fn total_rows(&self) -> usize {
        self.groups.iter().map(|g| g.rows).sum()
    }

    /// Look up a group by its key tuple.
    pub fn get(&self, key: &[GroupKey]) -> Option<&Group> {
        self.groups.iter().find(|g| g.key == key)
    }

    /// Look up a single-key group by its display label.
    pub fn value_of(&self, label: &str) -> Option<&Value> {
        self.groups
            .iter()
            .find(|g| g.key.len() == 1 && g.key[0].to_string() == label)
            .map(|g| &g.value)
    }

    /// Insert groups with zero rows and value `fill` for calendar months missing between the
    /// first and last month present.
    ///
    /// Applies to single-key month aggregates in key order; anything else is returned unchanged.
    pub fn fill_month_gaps(mut self, fill: Value) -> Self {
        let months: Vec<(i32, u32)> = self
            .groups
            .iter()
            .filter_map(|g| match g.key.as_slice() {
                [GroupKey::Month { year, month }] => Some((*year, *month)),
                _ => None,
            })
            .collect();
        if self.keys.len() != 1 || months.windows(2).any(|w| w[0] >= w[1]) {
            return self;
        }

        let mut out = Vec::with_capacity(self.groups.len());
        let mut prev: Option<(i32, u32)> = None;
        for g in self.groups {
            if let [GroupKey::Month { year, month }] = g.key.as_slice() {
                let current = (*year, *month);
                if let Some(mut cursor) = prev {
                    loop {
                        cursor = next_month(cursor);
                        if cursor >= current {
                            break;
                        }
                        out.push(Group {
                            key: vec![GroupKey::Month {
                                year: cursor.0,
                                month: cursor.1,
                            }],
                            rows: 0,
                            value: fill.clone(),
                        });
                    }
                }
                prev = Some(current);
            }
            out.push(g);
        }
        self.groups = out;
        self
    }

    /// Display labels of the groups, in order (single-key groupings).
    pub fn labels(&self) -> Vec<String> {
        self.groups
            .iter()
            .map(|g| {
                g.key
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" / ")
            })
            .collect()
    }
}

fn next_month((year, month): (i32, u32)) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// Group `dataset` as described by `spec`.
///
/// An empty dataset yields an empty aggregate, except that a single [`KeySpec::Bands`] key
/// always lists every band (with zero rows).
pub fn group_by(dataset: &DataSet, spec: &GroupBy) -> ProcessingResult<Aggregate> {
    if spec.keys.is_empty() || spec.keys.len() > 2 {
        return Err(ProcessingError::InvalidGrouping(format!(
            "expected 1 or 2 keys, got {}",
            spec.keys.len()
        )));
    }
    let bound = spec
        .keys
        .iter()
        .map(|k| k.bind(&dataset.schema))
        .collect::<ProcessingResult<Vec<_>>>()?;
    let value_idx = match &spec.value_column {
        Some(c) => Some(spec.op.validate(&dataset.schema, c)?),
        None if spec.op == ReduceOp::Count => None,
        None => {
            return Err(ProcessingError::InvalidGrouping(format!(
                "{} needs a value column",
                spec.op
            )));
        }
    };

    let mut groups: BTreeMap<Vec<GroupKey>, Accumulator> = BTreeMap::new();
    if let [KeySpec::Bands { bands, .. }] = spec.keys.as_slice() {
        for key in bands.all_keys() {
            groups.insert(vec![key], Accumulator::new(spec.op));
        }
    }

    for row in &dataset.rows {
        let key: Vec<GroupKey> = bound.iter().map(|k| k.key_of(row)).collect();
        let acc = groups
            .entry(key)
            .or_insert_with(|| Accumulator::new(spec.op));
        match value_idx {
            Some(idx) => acc.push(row.get(idx).unwrap_or(&NULL)),
            None => acc.push_row(),
        }
    }

    let value_column = spec.value_column.as_deref().unwrap_or("");
    let mut out = Vec::with_capacity(groups.len());
    for (key, acc) in groups {
        let rows = acc.rows() as usize;
        out.push(Group {
            key,
            rows,
            value: acc.finish(value_column)?,
        });
    }

    match spec.order {
        GroupOrder::Key => {}
        GroupOrder::ValueAscending => out.sort_by(|a, b| a.value.sort_cmp(&b.value)),
        GroupOrder::ValueDescending => out.sort_by(|a, b| match (a.value.is_null(), b.value.is_null()) {
            (false, false) => b.value.sort_cmp(&a.value),
            (a_null, b_null) => a_null.cmp(&b_null),
        }),
    }
    if let Some(n) = spec.limit {
        out.truncate(n);
    }

    log::debug!(
        "group_by {:?} {}({}): {} group(s) from {} row(s)",
        spec.keys.iter().map(KeySpec::column_name).collect::<Vec<_>>(),
        spec.op,
        value_column,
        out.len(),
        dataset.row_count()
    );

    Ok(Aggregate {
        keys: spec.keys.iter().map(|k| k.column_name().to_string()).collect(),
        op: spec.op,
        value_column: spec.value_column.clone(),
        groups: out,
    })
}

/// Dense row-key x column-key count matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTab {
    pub row_key: String,
    pub column_key: String,
    /// Row keys in key order.
    pub rows: Vec<GroupKey>,
    /// Column keys in key order.
    pub columns: Vec<GroupKey>,
    /// `counts[r][c]` is the number of rows with `rows[r]` and `columns[c]`.
    pub counts: Vec<Vec<u64>>,
}

impl CrossTab {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: &GroupKey, column: &GroupKey) -> u64 {
        let r = self.rows.iter().position(|k| k == row);
        let c = self.columns.iter().position(|k| k == column);
        match (r, c) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }
}

/// Count rows for every combination of `row` and `column` keys.
///
/// Only keys that occur in the data appear; combinations that do not occur count 0.
pub fn crosstab(dataset: &DataSet, row: KeySpec, column: KeySpec) -> ProcessingResult<CrossTab> {
    let row_key = row.column_name().to_string();
    let column_key = column.column_name().to_string();
    let agg = group_by(dataset, &GroupBy::count(row).then_by(column))?;

    let rows: Vec<GroupKey> = agg
        .groups
        .iter()
        .map(|g| g.key[0].clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let columns: Vec<GroupKey> = agg
        .groups
        .iter()
        .map(|g| g.key[1].clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut counts = vec![vec![0u64; columns.len()]; rows.len()];
    for g in &agg.groups {
        // Both searches succeed: the key sets were built from these groups.
        if let (Ok(r), Ok(c)) = (rows.binary_search(&g.key[0]), columns.binary_search(&g.key[1])) {
            counts[r][c] = g.rows as u64;
        }
    }

    Ok(CrossTab {
        row_key,
        column_key,
        rows,
        columns,
        counts,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{crosstab, group_by, Bands, GroupBy, GroupKey, GroupOrder, KeySpec};
    use crate::error::ProcessingError;
    use crate::processing::ReduceOp;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn cat(s: &str) -> GroupKey {
        GroupKey::Category(s.to_string())
    }

    fn encounters() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("age", DataType::Int64),
            Field::new("gender", DataType::Utf8),
            Field::new("hospital", DataType::Utf8),
            Field::new("billing_amount", DataType::Float64),
            Field::new("date_of_admission", DataType::Date),
        ]);
        let d = |m, day| Value::Date(NaiveDate::from_ymd_opt(2023, m, day).unwrap());
        DataSet::new(
            schema,
            vec![
                vec![Value::Int64(25), "F".into(), "North".into(), Value::Float64(100.0), d(1, 3)],
                vec![Value::Int64(70), "M".into(), "South".into(), Value::Float64(200.0), d(1, 20)],
                vec![Value::Int64(45), "F".into(), "South".into(), Value::Float64(50.0), d(2, 2)],
                vec![Value::Int64(12), Value::Null, "North".into(), Value::Null, Value::Null],
                vec![Value::Int64(100), "M".into(), "East".into(), Value::Float64(400.0), d(2, 28)],
            ],
        )
    }

    fn age_bands() -> Bands {
        Bands::new(vec![0, 18, 30, 45, 60, 100], vec!["0-18", "19-30", "31-45", "46-60", "60+"]).unwrap()
    }

    #[test]
    fn count_by_column_keeps_missing_group_and_sums_to_rows() {
        let ds = encounters();
        let agg = group_by(&ds, &GroupBy::count(KeySpec::column("gender"))).unwrap();
        assert_eq!(agg.labels(), vec!["F", "M", "(missing)"]);
        assert_eq!(agg.value_of("F"), Some(&Value::Int64(2)));
        assert_eq!(agg.get(&[GroupKey::Missing]).unwrap().rows, 1);
        assert_eq!(agg.total_rows(), ds.row_count());
    }

    #[test]
    fn sum_by_hospital_descending_with_limit() {
        let ds = encounters();
        let spec = GroupBy::aggregate(KeySpec::column("hospital"), ReduceOp::Sum, "billing_amount")
            .order(GroupOrder::ValueDescending)
            .limit(2);
        let agg = group_by(&ds, &spec).unwrap();
        assert_eq!(agg.labels(), vec!["East", "South"]);
        assert_eq!(agg.groups[0].value, Value::Float64(400.0));
        assert_eq!(agg.groups[1].value, Value::Float64(250.0));
    }

    #[test]
    fn descending_order_puts_no_data_groups_last() {
        let ds = encounters();
        let spec = GroupBy::aggregate(KeySpec::column("gender"), ReduceOp::Mean, "billing_amount")
            .order(GroupOrder::ValueDescending);
        let agg = group_by(&ds, &spec).unwrap();
        assert_eq!(agg.labels(), vec!["M", "F", "(missing)"]);
        assert_eq!(agg.groups[2].value, Value::Null);
    }

    #[test]
    fn ascending_order_breaks_ties_by_key() {
        let ds = encounters();
        let spec = GroupBy::count(KeySpec::column("hospital")).order(GroupOrder::ValueAscending);
        let agg = group_by(&ds, &spec).unwrap();
        assert_eq!(agg.labels(), vec!["East", "North", "South"]);
    }

    #[test]
    fn bands_list_every_band_and_out_of_range_is_missing() {
        let ds = encounters();
        let agg = group_by(&ds, &GroupBy::count(KeySpec::bands("age", age_bands()))).unwrap();
        assert_eq!(
            agg.labels(),
            vec!["0-18", "19-30", "31-45", "46-60", "60+", "(missing)"]
        );
        let counts: Vec<usize> = agg.groups.iter().map(|g| g.rows).collect();
        // 45 falls in [45, 60); 100 is outside the right-open last band.
        assert_eq!(counts, vec![1, 1, 0, 1, 1, 1]);
        assert_eq!(agg.total_rows(), ds.row_count());
    }

    #[test]
    fn bands_over_empty_dataset_are_zero() {
        let ds = encounters().filter_rows(|_| false);
        let agg = group_by(&ds, &GroupBy::count(KeySpec::bands("age", age_bands()))).unwrap();
        assert_eq!(agg.len(), 5);
        assert!(agg.groups.iter().all(|g| g.rows == 0 && g.value == Value::Int64(0)));

        let agg = group_by(&ds, &GroupBy::count(KeySpec::column("gender"))).unwrap();
        assert!(agg.is_empty());
    }

    #[test]
    fn month_keys_sort_chronologically() {
        let ds = encounters();
        let spec = GroupBy::aggregate(KeySpec::month("date_of_admission"), ReduceOp::Sum, "billing_amount");
        let agg = group_by(&ds, &spec).unwrap();
        assert_eq!(agg.labels(), vec!["2023-01", "2023-02", "(missing)"]);
        assert_eq!(agg.groups[0].value, Value::Float64(300.0));
        assert_eq!(agg.groups[2].value, Value::Null);
    }

    #[test]
    fn month_gaps_are_filled_with_zero_groups() {
        let schema = Schema::new(vec![Field::new("date_of_admission", DataType::Date)]);
        let d = |y, m| vec![Value::Date(NaiveDate::from_ymd_opt(y, m, 1).unwrap())];
        let ds = DataSet::new(schema, vec![d(2022, 11), d(2023, 2), d(2023, 2), vec![Value::Null]]);

        let agg = group_by(&ds, &GroupBy::count(KeySpec::month("date_of_admission")))
            .unwrap()
            .fill_month_gaps(Value::Int64(0));
        assert_eq!(
            agg.labels(),
            vec!["2022-11", "2022-12", "2023-01", "2023-02", "(missing)"]
        );
        let counts: Vec<usize> = agg.groups.iter().map(|g| g.rows).collect();
        assert_eq!(counts, vec![1, 0, 0, 2, 1]);
        assert_eq!(agg.groups[1].value, Value::Int64(0));
        assert_eq!(agg.total_rows(), ds.row_count());
    }

    #[test]
    fn two_key_grouping() {
        let ds = encounters();
        let spec = GroupBy::count(KeySpec::column("hospital")).then_by(KeySpec::column("gender"));
        let agg = group_by(&ds, &spec).unwrap();
        assert_eq!(agg.keys, vec!["hospital", "gender"]);
        assert_eq!(agg.get(&[cat("South"), cat("F")]).unwrap().rows, 1);
        assert_eq!(agg.get(&[cat("North"), GroupKey::Missing]).unwrap().rows, 1);
        assert_eq!(agg.total_rows(), ds.row_count());
    }

    #[test]
    fn crosstab_is_dense() {
        let ds = encounters();
        let ct = crosstab(&ds, KeySpec::column("hospital"), KeySpec::column("gender")).unwrap();
        assert_eq!(ct.rows, vec![cat("East"), cat("North"), cat("South")]);
        assert_eq!(ct.columns, vec![cat("F"), cat("M"), GroupKey::Missing]);
        assert_eq!(ct.counts, vec![vec![0, 1, 0], vec![1, 0, 1], vec![1, 1, 0]]);
        assert_eq!(ct.get(&cat("East"), &cat("F")), 0);
        assert_eq!(ct.total(), ds.row_count() as u64);
    }

    #[test]
    fn invalid_requests_are_errors() {
        let ds = encounters();
        assert_eq!(
            group_by(&ds, &GroupBy::count(KeySpec::column("nope"))),
            Err(ProcessingError::UnknownColumn("nope".to_string()))
        );
        assert!(matches!(
            group_by(&ds, &GroupBy::count(KeySpec::month("age"))),
            Err(ProcessingError::NotDate(_))
        ));
        assert!(matches!(
            group_by(&ds, &GroupBy::count(KeySpec::bands("gender", age_bands()))),
            Err(ProcessingError::NotNumeric { .. })
        ));
        let three = GroupBy::count(KeySpec::column("age"))
            .then_by(KeySpec::column("gender"))
            .then_by(KeySpec::column("hospital"));
        assert!(matches!(group_by(&ds, &three), Err(ProcessingError::InvalidGrouping(_))));
        assert!(Bands::new(vec![0, 10, 5], vec!["a", "b"]).is_err());
        assert!(Bands::new(vec![0, 10], vec!["a", "b"]).is_err());
    }

    #[test]
    fn group_keys_serialize_as_labels() {
        let json = serde_json::to_string(&vec![
            GroupKey::Integer(7),
            GroupKey::Month { year: 2023, month: 4 },
            cat("F"),
            GroupKey::Missing,
        ])
        .unwrap();
        assert_eq!(json, r#"[7,"2023-04","F",null]"#);
    }
}
