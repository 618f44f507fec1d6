use serde::Serialize;
use std::cmp::Ordering;
use std::hash::Hash;
use std::hash::Hasher;
use std::path::PathBuf;
use thiserror::Error;

pub mod airport_dataset;
pub mod column;
pub mod field;
pub mod query_builder;
pub mod selection;

pub use airport_dataset::{AirportDataset, RawAirport};
pub use field::AirportField;
pub use selection::Selection;

/// Region used by `region_summary` when the caller passes none
pub const DEFAULT_REGION: &str = "US-CT";

/// Number of rows `top_n_by` callers ask for when they have no preference
pub const DEFAULT_TOP_N: usize = 10;

/// Elevation above which an airport is flagged `high_altitude`
pub const HIGH_ALTITUDE_THRESHOLD_FT: f64 = 2000.0;

/// Affirmative `scheduled_service` text
pub const SCHEDULED_SERVICE_YES: &str = "yes";

/// Error type used across the crate
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("data source not found: {}", .0.display())]
    DataSourceNotFound(PathBuf),

    #[error("failed to load data: {0}")]
    DataLoad(#[from] LoadError),

    #[error("aggregate is undefined over an empty dataset")]
    EmptyDataset,

    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// Anything that goes wrong after the source was found
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("data source is empty")]
    EmptySource,

    #[error("missing column: {0}")]
    MissingColumn(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub rows_dropped: usize,
}

/// A single cell. Ordered and hashable so it can be grouped, sorted and cached on.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl Value {
    fn kind_rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Int(_) | Value::Float(_) => 1,
            Value::Str(_) => 2,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Int(a), Value::Float(b)) => cmp_int_float(*a, *b),
            (Value::Float(a), Value::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (a, b) => a.kind_rank().cmp(&b.kind_rank()),
        }
    }
}

/// Exact comparison, so that equality stays transitive for integers above 2^53.
/// Floats keep their `total_cmp` placement: `-0.0` sorts below `Int(0)`,
/// positive NaN above every integer and negative NaN below.
fn cmp_int_float(a: i64, b: f64) -> Ordering {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

    if b.is_nan() {
        return if b.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if b >= TWO_POW_63 {
        return Ordering::Less;
    }
    if b < -TWO_POW_63 {
        return Ordering::Greater;
    }

    // In range, so the truncated value converts without loss
    let whole = b.trunc();
    match a.cmp(&(whole as i64)) {
        Ordering::Equal if b > whole => Ordering::Less,
        Ordering::Equal if b < whole || (b == 0.0 && b.is_sign_negative()) => Ordering::Greater,
        ord => ord,
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            // Int and Float compare equal only when the float is exactly that integer.
            Value::Int(v) => (*v as f64).to_bits().hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Str(v) => v.hash(state),
            Value::Bool(v) => v.hash(state),
        }
    }
}

/// Filter predicate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterPredicate {
    Equals(Value),
    GreaterThan(Value),
    LessThan(Value),
    /// Inclusive on both ends
    Between(Value, Value),
}

impl FilterPredicate {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FilterPredicate::Equals(target) => value == target,
            FilterPredicate::GreaterThan(target) => value > target,
            FilterPredicate::LessThan(target) => value < target,
            FilterPredicate::Between(lo, hi) => value >= lo && value <= hi,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Result of `region_summary`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionSummary {
    pub count: usize,
    /// `None` when no row in the region has an elevation
    pub max_elevation_ft: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

/// Materialized row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportRecord {
    pub name: String,
    pub municipality: Option<String>,
    pub region_code: String,
    pub airport_type: String,
    pub scheduled_service: bool,
    pub elevation_ft: Option<f64>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub name_length: usize,
    pub high_altitude: bool,
}

/// Dense cross-tabulation of row counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotTable {
    pub row_field: AirportField,
    pub col_field: AirportField,
    row_values: Vec<Value>,
    col_values: Vec<Value>,
    /// counts[r][c]
    counts: Vec<Vec<usize>>,
}

impl PivotTable {
    pub(crate) fn new(
        row_field: AirportField,
        col_field: AirportField,
        row_values: Vec<Value>,
        col_values: Vec<Value>,
        counts: Vec<Vec<usize>>,
    ) -> Self {
        PivotTable {
            row_field,
            col_field,
            row_values,
            col_values,
            counts,
        }
    }

    pub fn row_values(&self) -> &[Value] {
        &self.row_values
    }

    pub fn column_values(&self) -> &[Value] {
        &self.col_values
    }

    /// Count for one cell; `None` only when either value was never observed
    pub fn get(&self, row: &Value, col: &Value) -> Option<usize> {
        let r = self.row_values.binary_search(row).ok()?;
        let c = self.col_values.binary_search(col).ok()?;
        Some(self.counts[r][c])
    }

    pub fn rows(&self) -> impl Iterator<Item = (&Value, &[usize])> + '_ {
        self.row_values
            .iter()
            .zip(self.counts.iter().map(|row| row.as_slice()))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

/// One slice of a share (pie) chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub value: Value,
    pub count: usize,
    pub percent: f64,
}

/// One point of the scatter map, with its tooltip text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub name: String,
    pub municipality: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_value_ordering_is_numeric_then_lexical() {
        let mut values = vec![
            Value::from("b"),
            Value::Float(2.5),
            Value::from("a"),
            Value::Int(2),
            Value::Bool(true),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Value::Bool(true),
                Value::Int(2),
                Value::Float(2.5),
                Value::from("a"),
                Value::from("b"),
            ]
        );
    }

    #[test]
    fn test_int_and_float_hash_alike() {
        let mut set = HashSet::new();
        set.insert(Value::Int(3));
        assert!(set.contains(&Value::Float(3.0)));
    }

    #[test]
    fn test_mixed_numeric_equality_is_exact() {
        let big = 1i64 << 53;
        assert_eq!(Value::Int(big), Value::Float(big as f64));
        assert_ne!(Value::Int(big + 1), Value::Float(big as f64));
        assert!(Value::Int(big + 1) > Value::Float(big as f64));
        assert!(Value::Float(big as f64) < Value::Int(big + 1));

        assert!(Value::Int(2) < Value::Float(2.5));
        assert!(Value::Int(-3) < Value::Float(-2.5));
        assert!(Value::Int(-2) > Value::Float(-2.5));
        assert!(Value::Int(i64::MAX) < Value::Float(f64::INFINITY));
        assert!(Value::Int(i64::MIN) > Value::Float(f64::NEG_INFINITY));
        assert!(Value::Int(i64::MAX) < Value::Float(9_223_372_036_854_775_808.0));
        assert!(Value::Int(0) > Value::Float(-0.0));
        assert_eq!(Value::Int(0), Value::Float(0.0));

        let mut set = HashSet::new();
        set.insert(Value::Int(big + 1));
        set.insert(Value::Float(big as f64));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_between_is_inclusive() {
        let p = FilterPredicate::Between(Value::Int(10), Value::Int(20));
        assert!(p.matches(&Value::Float(10.0)));
        assert!(p.matches(&Value::Int(20)));
        assert!(!p.matches(&Value::Int(21)));
    }

    #[test]
    fn test_default_direction_is_descending() {
        assert_eq!(SortDirection::default(), SortDirection::Descending);
    }
}
