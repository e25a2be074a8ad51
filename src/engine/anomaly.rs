use super::timeseries::TimePoint;

/// Default number of standard deviations above the mean that counts as a spike.
pub const DEFAULT_SIGMAS: f64 = 2.0;

/// Summary statistics of a series and the spike threshold derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub mean: f64,
    /// Sample standard deviation (divisor `n - 1`).
    pub std_dev: f64,
    pub threshold: f64,
}

/// Mean, sample standard deviation and `mean + sigmas * std_dev`.
///
/// Returns `None` for fewer than two points, where the sample deviation is undefined.
pub fn series_stats(series: &[TimePoint], sigmas: f64) -> Option<SeriesStats> {
    let n = series.len();
    if n < 2 {
        return None;
    }
    let mean = series.iter().map(|p| p.value).sum::<f64>() / n as f64;
    let variance = series
        .iter()
        .map(|p| {
            let diff = p.value - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n as f64 - 1.0);
    let std_dev = variance.sqrt();
    Some(SeriesStats {
        mean,
        std_dev,
        threshold: mean + sigmas * std_dev,
    })
}

/// Points strictly above `mean + sigmas * std_dev` of the whole series, in input order.
pub fn flag_anomalies_with(series: &[TimePoint], sigmas: f64) -> Vec<TimePoint> {
    let Some(stats) = series_stats(series, sigmas) else {
        return Vec::new();
    };
    series
        .iter()
        .filter(|p| p.value > stats.threshold)
        .copied()
        .collect()
}

/// Spikes more than two standard deviations above the mean.
pub fn flag_anomalies(series: &[TimePoint]) -> Vec<TimePoint> {
    flag_anomalies_with(series, DEFAULT_SIGMAS)
}
