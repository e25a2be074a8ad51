/// Aggregation & statistics engine: pure functions over borrowed records.
///
/// Data flow:
/// ```text
///   &[Record]
///      │
///      ├──► aggregate   group by category → sum / mean per category
///      │        │
///      │        ▼
///      │     rank        sort + truncate to top-N
///      │
///      └──► timeseries  filter → bucket by calendar date → sum
///               │
///               ▼
///            anomaly     flag points above mean + k·stddev
/// ```
///
/// Nothing here keeps state between calls or touches the filesystem.

pub mod aggregate;
pub mod anomaly;
pub mod metrics;
pub mod rank;
pub mod timeseries;

pub use aggregate::{aggregate, value_counts, GroupAggregate, Reducer};
pub use anomaly::{flag_anomalies, flag_anomalies_with, series_stats, SeriesStats};
pub use metrics::{key_metrics, KeyMetrics};
pub use rank::{top_n, Direction};
pub use timeseries::{time_series, TimePoint, TimeSeries};
