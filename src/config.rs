use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::anomaly::DEFAULT_SIGMAS;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV_VAR: &str = "AADHAAR_DASH_CONFIG";

/// Dashboard settings. Every field has a default, so a config file only needs
/// the keys it wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub state_column: String,
    pub district_column: String,
    pub date_column: String,
    pub value_column: String,
    /// How many categories the ranking charts show.
    pub top_n: usize,
    /// Rows in the data preview table.
    pub preview_rows: usize,
    /// Standard deviations above the mean that count as a spike.
    pub anomaly_sigmas: f64,
    /// State used for the trend, pattern and spike panels.
    pub focus_state: String,
    /// Initial inclusive range of the value slider.
    pub age_range: (f64, f64),
    /// Data file opened at start-up.
    pub data_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            state_column: "state".into(),
            district_column: "district".into(),
            date_column: "date".into(),
            value_column: "demo_age_5_17".into(),
            top_n: 10,
            preview_rows: 20,
            anomaly_sigmas: DEFAULT_SIGMAS,
            focus_state: "Madhya Pradesh".into(),
            age_range: (5.0, 17.0),
            data_path: None,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Config from [`CONFIG_ENV_VAR`] if set and valid, otherwise defaults.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match Self::from_file(Path::new(&path)) {
            Ok(cfg) => {
                log::info!("Using config {}", Path::new(&path).display());
                cfg
            }
            Err(e) => {
                log::warn!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }

    /// Columns every loaded dataset must carry.
    pub fn required_columns(&self) -> [&str; 4] {
        [
            self.state_column.as_str(),
            self.district_column.as_str(),
            self.date_column.as_str(),
            self.value_column.as_str(),
        ]
    }
}
