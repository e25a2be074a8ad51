use std::collections::BTreeSet;
use std::path::Path;

use aadhaar_dash::data::filter::{filtered_indices, init_filter_state, FilterState, Selection};
use aadhaar_dash::data::loader;
use aadhaar_dash::{DashboardConfig, DashboardReport, Dataset, Value};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// State picker and value-range slider.
    pub selection: Selection,

    /// Per-district checkbox selections.
    pub filters: FilterState,

    /// Indices of records passing selection and checkboxes (cached).
    pub visible_indices: Vec<usize>,

    /// Panel data for the current dataset and selection.
    pub report: Option<DashboardReport>,

    /// Colours of the district share chart.
    pub district_colors: Option<ColorMap>,

    /// Distinct values of the state column, for the picker.
    pub states: Vec<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Load a file and ingest it, reporting failures in the status bar.
    pub fn load_path(&mut self, path: &Path) {
        self.loading = true;
        match loader::load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                self.loading = false;
            }
        }
    }

    /// Ingest a newly loaded dataset, initialise filters and the report.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.loading = false;
        if let Err(e) = dataset.require_columns(&self.config.required_columns()) {
            log::error!("Dataset rejected: {e}");
            self.status_message = Some(format!("Error: {e}"));
            return;
        }

        self.states = dataset
            .unique_values
            .get(&self.config.state_column)
            .map(|vals| vals.iter().map(Value::to_string).collect())
            .unwrap_or_default();

        // Default to the focus state when present, else the first state.
        let initial_state = self
            .states
            .iter()
            .find(|s| **s == self.config.focus_state)
            .or_else(|| self.states.first())
            .cloned();
        self.selection = Selection {
            state: initial_state,
            value_range: Some(self.config.age_range),
        };
        self.filters = init_filter_state(&dataset, &[self.config.district_column.as_str()]);

        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh();
    }

    /// Recompute the report and `visible_indices` after any change.
    pub fn refresh(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let cfg = &self.config;
        self.visible_indices = filtered_indices(
            ds,
            &self.filters,
            &self.selection,
            &cfg.state_column,
            &cfg.value_column,
        );
        match DashboardReport::build(ds, &self.selection, &self.filters, cfg) {
            Ok(report) => {
                self.district_colors = Some(ColorMap::new(report.district_shares.keys()));
                self.report = Some(report);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Report failed: {e}");
                self.report = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn set_state(&mut self, state: Option<String>) {
        self.selection.state = state;
        self.refresh();
    }

    pub fn set_value_range(&mut self, lo: f64, hi: f64) {
        self.selection.value_range = Some((lo.min(hi), lo.max(hi)));
        self.refresh();
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: &str, value: &Value) {
        let selected = self.filters.entry(column.to_string()).or_default();
        if selected.contains(value) {
            selected.remove(value);
        } else {
            selected.insert(value.clone());
        }
        self.refresh();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: &str) {
        if let Some(ds) = &self.dataset {
            if let Some(all_vals) = ds.unique_values.get(column) {
                self.filters.insert(column.to_string(), all_vals.clone());
                self.refresh();
            }
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: &str) {
        self.filters.insert(column.to_string(), BTreeSet::new());
        self.refresh();
    }
}
