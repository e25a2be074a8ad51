use std::collections::BTreeMap;

use crate::data::model::Record;
use crate::error::SchemaError;

/// Category label → reduced value. One entry per category present in the input.
pub type GroupAggregate = BTreeMap<String, f64>;

/// How the values of one category are folded into a single number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Sum,
    Mean,
}

/// Partition `records` by `group_key` and reduce the `value_key` column of
/// each partition.
///
/// Every record must carry both columns and the value must be numeric; the
/// first violation aborts with a [`SchemaError`]. An empty slice yields an
/// empty aggregate.
pub fn aggregate(
    records: &[Record],
    group_key: &str,
    value_key: &str,
    reducer: Reducer,
) -> Result<GroupAggregate, SchemaError> {
    // category → (running sum, count)
    let mut partitions: BTreeMap<String, (f64, usize)> = BTreeMap::new();

    for (row, rec) in records.iter().enumerate() {
        let category = rec.require(group_key, row)?.to_string();
        let value = rec.number(value_key, row)?;
        let slot = partitions.entry(category).or_insert((0.0, 0));
        slot.0 += value;
        slot.1 += 1;
    }

    Ok(partitions
        .into_iter()
        .map(|(category, (sum, count))| {
            let reduced = match reducer {
                Reducer::Sum => sum,
                Reducer::Mean => sum / count as f64,
            };
            (category, reduced)
        })
        .collect())
}

/// Number of records per distinct value of `key`.
pub fn value_counts(records: &[Record], key: &str) -> Result<BTreeMap<String, usize>, SchemaError> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for (row, rec) in records.iter().enumerate() {
        let value = rec.require(key, row)?;
        *counts.entry(value.to_string()).or_default() += 1;
    }
    Ok(counts)
}
