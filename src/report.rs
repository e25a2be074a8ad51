use std::collections::BTreeMap;

use crate::config::DashboardConfig;
use crate::data::filter::{filtered_indices, FilterState, Selection};
use crate::data::model::{Dataset, Record, Value};
use crate::engine::{
    aggregate, flag_anomalies_with, key_metrics, series_stats, time_series, top_n, value_counts,
    Direction, KeyMetrics, Reducer, SeriesStats, TimeSeries,
};
use crate::error::SchemaError;

// ---------------------------------------------------------------------------
// DashboardReport – everything the panels draw
// ---------------------------------------------------------------------------

/// All numbers behind one render of the dashboard, derived from a single
/// dataset, a selection and the per-column checkbox filters.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardReport {
    /// First rows of the dataset.
    pub preview: Vec<Record>,
    /// Headline numbers over the whole dataset.
    pub metrics: KeyMetrics,
    /// Highest district totals over the whole dataset.
    pub top_districts: Vec<(String, f64)>,
    /// Total per state over the whole dataset.
    pub state_totals: Vec<(String, f64)>,
    /// Rows passing the selection and column filters.
    pub selected_rows: usize,
    /// Distinct values of the value column among selected rows → how often each occurs.
    pub value_counts: BTreeMap<String, usize>,
    /// Selected rows per district.
    pub district_shares: BTreeMap<String, usize>,
    /// Daily totals for the focus state.
    pub trend: TimeSeries,
    /// Statistics of the full focus-state trend, when defined.
    pub trend_stats: Option<SeriesStats>,
    /// Trend points above the spike threshold.
    pub anomalies: TimeSeries,
    /// Districts of the focus state with the highest average value.
    pub high_mean_districts: Vec<(String, f64)>,
}

impl DashboardReport {
    pub fn build(
        dataset: &Dataset,
        selection: &Selection,
        filters: &FilterState,
        cfg: &DashboardConfig,
    ) -> Result<Self, SchemaError> {
        let records = dataset.records.as_slice();
        let state_key = cfg.state_column.as_str();
        let district_key = cfg.district_column.as_str();
        let value_key = cfg.value_column.as_str();

        let metrics = key_metrics(records, district_key, value_key)?;

        let district_sums = aggregate(records, district_key, value_key, Reducer::Sum)?;
        let top_districts = top_n(&district_sums, cfg.top_n, Direction::Descending);

        let state_sums = aggregate(records, state_key, value_key, Reducer::Sum)?;
        let state_totals = top_n(&state_sums, state_sums.len(), Direction::Descending);

        let selected: Vec<Record> =
            filtered_indices(dataset, filters, selection, state_key, value_key)
                .into_iter()
                .map(|i| records[i].clone())
                .collect();
        let counts = value_counts(&selected, value_key)?;
        let district_shares = value_counts(&selected, district_key)?;

        let focus = Value::String(cfg.focus_state.clone());
        let in_focus = |rec: &Record| rec.get(state_key) == Some(&focus);

        let trend = time_series(records, &cfg.date_column, value_key, in_focus)?;
        let trend_stats = series_stats(&trend, cfg.anomaly_sigmas);
        let anomalies = flag_anomalies_with(&trend, cfg.anomaly_sigmas);

        let focus_records: Vec<Record> =
            records.iter().filter(|r| in_focus(*r)).cloned().collect();
        let district_means = aggregate(&focus_records, district_key, value_key, Reducer::Mean)?;
        let high_mean_districts = top_n(&district_means, cfg.top_n, Direction::Descending);

        log::debug!(
            "report: {} records, {} selected, {} trend points, {} anomalies",
            records.len(),
            selected.len(),
            trend.len(),
            anomalies.len()
        );

        Ok(Self {
            preview: dataset.head(cfg.preview_rows).to_vec(),
            metrics,
            top_districts,
            state_totals,
            selected_rows: selected.len(),
            value_counts: counts,
            district_shares,
            trend,
            trend_stats,
            anomalies,
            high_mean_districts,
        })
    }
}
