use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::data::model::Record;
use crate::error::SchemaError;

/// One bucket of a [`TimeSeries`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Ascending by date, at most one point per date.
pub type TimeSeries = Vec<TimePoint>;

/// Sum `value_key` per calendar day over the records accepted by `filter`.
///
/// Only records that pass the filter are inspected. Any surviving record with
/// an unparsable date or a non-numeric value aborts the whole call; there is
/// no partial result.
pub fn time_series<F>(
    records: &[Record],
    date_key: &str,
    value_key: &str,
    filter: F,
) -> Result<TimeSeries, SchemaError>
where
    F: Fn(&Record) -> bool,
{
    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for (row, rec) in records.iter().enumerate() {
        if !filter(rec) {
            continue;
        }
        let date = rec.date(date_key, row)?;
        let value = rec.number(value_key, row)?;
        *buckets.entry(date).or_insert(0.0) += value;
    }

    Ok(buckets
        .into_iter()
        .map(|(date, value)| TimePoint { date, value })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;

    fn row(state: &str, date: &str, count: i64) -> Record {
        Record::new()
            .with("state", state)
            .with("date", date)
            .with("demo_age_5_17", count)
    }

    fn is_mp(rec: &Record) -> bool {
        rec.get("state") == Some(&Value::from("Madhya Pradesh"))
    }

    #[test]
    fn buckets_by_day_in_ascending_order() {
        let records = vec![
            row("Madhya Pradesh", "2025-03-02", 5),
            row("Madhya Pradesh", "2025-03-01 10:15:00", 2),
            row("Madhya Pradesh", "01-03-2025", 3),
            row("Maharashtra", "2025-03-01", 100),
        ];
        let series = time_series(&records, "date", "demo_age_5_17", is_mp).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(series[0].value, 5.0);
        assert_eq!(series[1].value, 5.0);
        let total: f64 = series.iter().map(|p| p.value).sum();
        assert_eq!(total, 10.0);
    }

    #[test]
    fn accepts_native_dates() {
        let day = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let records = vec![Record::new().with("date", day).with("demo_age_5_17", 4i64)];
        let series = time_series(&records, "date", "demo_age_5_17", |_| true).unwrap();
        assert_eq!(series, vec![TimePoint { date: day, value: 4.0 }]);
    }

    #[test]
    fn one_bad_date_fails_everything() {
        let records = vec![
            row("Madhya Pradesh", "2025-03-01", 1),
            row("Madhya Pradesh", "not a date", 1),
        ];
        let err = time_series(&records, "date", "demo_age_5_17", is_mp).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDate { row: 1, .. }));
    }

    #[test]
    fn filtered_out_rows_are_not_inspected() {
        let records = vec![
            row("Madhya Pradesh", "2025-03-01", 1),
            row("Maharashtra", "garbage", 1),
        ];
        assert!(time_series(&records, "date", "demo_age_5_17", is_mp).is_ok());
    }

    #[test]
    fn empty_after_filter_is_empty_series() {
        let records = vec![row("Maharashtra", "2025-03-01", 9)];
        let series = time_series(&records, "date", "demo_age_5_17", is_mp).unwrap();
        assert!(series.is_empty());
    }
}
