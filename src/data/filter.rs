use std::collections::{BTreeMap, BTreeSet};

use super::model::{Dataset, Record, Value};

// ---------------------------------------------------------------------------
// Selection: the dashboard's state picker and value-range slider
// ---------------------------------------------------------------------------

/// Which rows the "filtered" panels look at.
///
/// `None` in either field means that constraint is off.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    /// Keep only rows whose state column equals this value.
    pub state: Option<String>,
    /// Keep only rows whose value column lies in this inclusive range.
    pub value_range: Option<(f64, f64)>,
}

impl Selection {
    /// Whether `record` passes the selection.
    ///
    /// A record lacking the state column never matches an active state filter;
    /// a record whose value is missing or non-numeric never matches an active range.
    pub fn matches(&self, record: &Record, state_key: &str, value_key: &str) -> bool {
        if let Some(state) = &self.state {
            match record.get(state_key) {
                Some(Value::String(s)) if s == state => {}
                _ => return false,
            }
        }
        if let Some((lo, hi)) = self.value_range {
            match record.get(value_key).and_then(Value::as_f64) {
                Some(v) if v >= lo && v <= hi => {}
                _ => return false,
            }
        }
        true
    }
}

/// Return indices of records that pass the selection.
pub fn selected_indices(
    dataset: &Dataset,
    selection: &Selection,
    state_key: &str,
    value_key: &str,
) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec, state_key, value_key))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Column filters: which unique values are selected per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of selected values.
/// If a column is absent, it means "no filter" (show all).
pub type FilterState = BTreeMap<String, BTreeSet<Value>>;

/// Initialise a [`FilterState`] with all values selected (i.e., show everything).
pub fn init_filter_state(dataset: &Dataset, columns: &[&str]) -> FilterState {
    columns
        .iter()
        .filter_map(|col| {
            dataset
                .unique_values
                .get(*col)
                .map(|vals| (col.to_string(), vals.clone()))
        })
        .collect()
}

/// Return indices of records that pass all column filters and the selection.
///
/// A record passes a column filter when:
/// * The column is not present in `filters` → passes (no constraint)
/// * The filter set for that column is empty → nothing selected → fails
/// * The record's value for that column is in the selected set → passes
pub fn filtered_indices(
    dataset: &Dataset,
    filters: &FilterState,
    selection: &Selection,
    state_key: &str,
    value_key: &str,
) -> Vec<usize> {
    selected_indices(dataset, selection, state_key, value_key)
        .into_iter()
        .filter(|&i| {
            let rec = &dataset.records[i];
            for (col, selected) in filters {
                if selected.is_empty() {
                    return false;
                }
                // Everything selected → no effective filter
                if let Some(all_vals) = dataset.unique_values.get(col) {
                    if selected.len() == all_vals.len() {
                        continue;
                    }
                }
                let value = rec.get(col).unwrap_or(&Value::Null);
                if !selected.contains(value) {
                    return false;
                }
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            Record::new()
                .with("state", "Madhya Pradesh")
                .with("district", "Indore")
                .with("demo_age_5_17", 6i64),
            Record::new()
                .with("state", "Madhya Pradesh")
                .with("district", "Bhopal")
                .with("demo_age_5_17", 40i64),
            Record::new()
                .with("state", "Maharashtra")
                .with("district", "Pune")
                .with("demo_age_5_17", 9i64),
            Record::new().with("state", "Maharashtra").with("district", "Nagpur"),
        ])
    }

    #[test]
    fn default_selection_keeps_everything() {
        let ds = dataset();
        let idx = selected_indices(&ds, &Selection::default(), "state", "demo_age_5_17");
        assert_eq!(idx, vec![0, 1, 2, 3]);
    }

    #[test]
    fn state_and_range_combine() {
        let ds = dataset();
        let sel = Selection {
            state: Some("Madhya Pradesh".into()),
            value_range: Some((5.0, 17.0)),
        };
        assert_eq!(selected_indices(&ds, &sel, "state", "demo_age_5_17"), vec![0]);
    }

    #[test]
    fn range_bounds_are_inclusive_and_skip_missing_values() {
        let ds = dataset();
        let sel = Selection {
            state: None,
            value_range: Some((9.0, 40.0)),
        };
        assert_eq!(selected_indices(&ds, &sel, "state", "demo_age_5_17"), vec![1, 2]);
    }

    #[test]
    fn column_filters_narrow_the_selection() {
        let ds = dataset();
        let mut filters = init_filter_state(&ds, &["district"]);
        assert_eq!(
            filtered_indices(&ds, &filters, &Selection::default(), "state", "demo_age_5_17"),
            vec![0, 1, 2, 3]
        );
        filters.get_mut("district").unwrap().remove(&Value::from("Pune"));
        assert_eq!(
            filtered_indices(&ds, &filters, &Selection::default(), "state", "demo_age_5_17"),
            vec![0, 1, 3]
        );
        filters.insert("district".into(), BTreeSet::new());
        assert!(filtered_indices(&ds, &filters, &Selection::default(), "state", "demo_age_5_17")
            .is_empty());
    }
}
