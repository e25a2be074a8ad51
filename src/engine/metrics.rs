use std::collections::BTreeSet;

use crate::data::model::Record;
use crate::error::SchemaError;

/// Headline numbers shown above the charts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KeyMetrics {
    /// Distinct districts.
    pub districts: usize,
    /// Sum of the value column.
    pub total_value: f64,
    /// Number of records.
    pub records: usize,
}

pub fn key_metrics(
    records: &[Record],
    district_key: &str,
    value_key: &str,
) -> Result<KeyMetrics, SchemaError> {
    let mut districts = BTreeSet::new();
    let mut total_value = 0.0;
    for (row, rec) in records.iter().enumerate() {
        districts.insert(rec.require(district_key, row)?);
        total_value += rec.number(value_key, row)?;
    }
    Ok(KeyMetrics {
        districts: districts.len(),
        total_value,
        records: records.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_districts_and_totals() {
        let records = vec![
            Record::new().with("district", "Indore").with("demo_age_5_17", 3i64),
            Record::new().with("district", "Indore").with("demo_age_5_17", 4i64),
            Record::new().with("district", "Sagar").with("demo_age_5_17", 1.5),
        ];
        let m = key_metrics(&records, "district", "demo_age_5_17").unwrap();
        assert_eq!(
            m,
            KeyMetrics {
                districts: 2,
                total_value: 8.5,
                records: 3
            }
        );
    }

    #[test]
    fn empty_input_gives_zeroes() {
        assert_eq!(
            key_metrics(&[], "district", "demo_age_5_17").unwrap(),
            KeyMetrics::default()
        );
    }
}
