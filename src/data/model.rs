use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::SchemaError;

/// Columns every demographic dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = ["state", "district", "date", "demo_age_5_17"];

// ---------------------------------------------------------------------------
// Value – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common DataFrame dtypes.
/// Used as a `BTreeMap` / `BTreeSet` key downstream, so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Date(d) => d.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl Value {
    /// Numeric view of the value. Only integers and finite floats qualify;
    /// text that happens to look like a number is not coerced.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) if v.is_finite() => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Calendar-date view: native dates, or text in one of the accepted formats.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::String(s) => parse_calendar_date(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Calendar date parsing
// ---------------------------------------------------------------------------

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Parse a calendar date, discarding any time of day.
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// A single row: column_name → value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for assembling rows in code.
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(column.to_string(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// Look up a column, failing with [`SchemaError::MissingColumn`] if absent.
    pub fn require(&self, column: &str, row: usize) -> Result<&Value, SchemaError> {
        self.fields.get(column).ok_or_else(|| SchemaError::MissingColumn {
            column: column.to_string(),
            row,
        })
    }

    /// Numeric cell, failing when the column is absent or not a number.
    pub fn number(&self, column: &str, row: usize) -> Result<f64, SchemaError> {
        let value = self.require(column, row)?;
        value.as_f64().ok_or_else(|| SchemaError::NotNumeric {
            column: column.to_string(),
            row,
            value: value.to_string(),
        })
    }

    /// Calendar-date cell, failing when the column is absent or unparsable.
    pub fn date(&self, column: &str, row: usize) -> Result<NaiveDate, SchemaError> {
        let value = self.require(column, row)?;
        value.as_date().ok_or_else(|| SchemaError::InvalidDate {
            column: column.to_string(),
            row,
            value: value.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with pre-computed column indices.
/// Built once at load time and only ever read afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records, in source order.
    pub records: Vec<Record>,
    /// Sorted list of column names present in any record.
    pub column_names: Vec<String>,
    /// For each column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<Value>>,
}

impl Dataset {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut column_names_set: BTreeSet<String> = BTreeSet::new();
        let mut unique_values: BTreeMap<String, BTreeSet<Value>> = BTreeMap::new();

        for rec in &records {
            for (col, val) in &rec.fields {
                column_names_set.insert(col.clone());
                unique_values
                    .entry(col.clone())
                    .or_default()
                    .insert(val.clone());
            }
        }
        let column_names: Vec<String> = column_names_set.into_iter().collect();
        Dataset {
            records,
            column_names,
            unique_values,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first `n` records, for display previews.
    pub fn head(&self, n: usize) -> &[Record] {
        &self.records[..n.min(self.records.len())]
    }

    /// Fail with the first column (and row) that breaks the input contract.
    pub fn require_columns(&self, columns: &[&str]) -> Result<(), SchemaError> {
        for (row, rec) in self.records.iter().enumerate() {
            for col in columns {
                rec.require(col, row)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_common_date_layouts() {
        assert_eq!(parse_calendar_date("2025-03-01"), Some(ymd(2025, 3, 1)));
        assert_eq!(parse_calendar_date("01-03-2025"), Some(ymd(2025, 3, 1)));
        assert_eq!(parse_calendar_date("01/03/2025"), Some(ymd(2025, 3, 1)));
        assert_eq!(parse_calendar_date("2025/03/01"), Some(ymd(2025, 3, 1)));
    }

    #[test]
    fn time_of_day_is_discarded() {
        assert_eq!(
            parse_calendar_date("2025-03-01 23:59:00"),
            Some(ymd(2025, 3, 1))
        );
        assert_eq!(
            parse_calendar_date("2025-03-01T08:00:00+05:30"),
            Some(ymd(2025, 3, 1))
        );
    }

    #[test]
    fn rejects_garbage_dates() {
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("yesterday"), None);
        assert_eq!(parse_calendar_date("2025-13-40"), None);
    }

    #[test]
    fn numeric_view_does_not_coerce_text() {
        assert_eq!(Value::Integer(4).as_f64(), Some(4.0));
        assert_eq!(Value::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::from("4").as_f64(), None);
        assert_eq!(Value::Null.as_f64(), None);
        assert_eq!(Value::Float(f64::NAN).as_f64(), None);
        assert_eq!(Value::Float(f64::INFINITY).as_f64(), None);
    }

    #[test]
    fn record_accessors_report_schema_errors() {
        let rec = Record::new().with("district", "Indore").with("date", "soon");
        assert!(matches!(
            rec.number("demo_age_5_17", 3),
            Err(SchemaError::MissingColumn { row: 3, .. })
        ));
        assert!(matches!(
            rec.number("district", 0),
            Err(SchemaError::NotNumeric { .. })
        ));
        assert!(matches!(
            rec.date("date", 0),
            Err(SchemaError::InvalidDate { .. })
        ));
    }

    #[test]
    fn dataset_indexes_columns_and_previews() {
        let ds = Dataset::from_records(vec![
            Record::new().with("state", "Goa").with("demo_age_5_17", 3i64),
            Record::new().with("state", "Goa").with("district", "North Goa"),
        ]);
        assert_eq!(ds.column_names, vec!["demo_age_5_17", "district", "state"]);
        assert_eq!(ds.unique_values["state"].len(), 1);
        assert_eq!(ds.head(1).len(), 1);
        assert_eq!(ds.head(50).len(), 2);
        let err = ds.require_columns(&["state", "district"]).unwrap_err();
        assert_eq!(err, SchemaError::MissingColumn { column: "district".into(), row: 0 });
    }
}
