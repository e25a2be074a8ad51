use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the closures.
    let district_col = state.config.district_column.clone();
    let districts = dataset
        .unique_values
        .get(&district_col)
        .cloned()
        .unwrap_or_default();
    let states = state.states.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- State selector ----
            ui.strong("State");
            let current = state.selection.state.clone();
            egui::ComboBox::from_id_salt("state_picker")
                .selected_text(current.as_deref().unwrap_or("All states"))
                .show_ui(ui, |ui: &mut Ui| {
                    if ui.selectable_label(current.is_none(), "All states").clicked() {
                        state.set_state(None);
                    }
                    for s in &states {
                        if ui
                            .selectable_label(current.as_deref() == Some(s.as_str()), s)
                            .clicked()
                        {
                            state.set_state(Some(s.clone()));
                        }
                    }
                });
            ui.separator();

            // ---- Value range ----
            ui.strong(format!("{} range", state.config.value_column));
            let (mut lo, mut hi) = state.selection.value_range.unwrap_or(state.config.age_range);
            let lo_changed = ui
                .add(egui::Slider::new(&mut lo, 0.0..=100.0).text("min"))
                .changed();
            let hi_changed = ui
                .add(egui::Slider::new(&mut hi, 0.0..=100.0).text("max"))
                .changed();
            if lo_changed || hi_changed {
                state.set_value_range(lo, hi);
            }
            ui.separator();

            // ---- Ranking / spike settings ----
            ui.strong("Ranking");
            let mut top_n = state.config.top_n;
            let mut sigmas = state.config.anomaly_sigmas;
            let top_changed = ui
                .add(egui::Slider::new(&mut top_n, 1..=30).text("top N"))
                .changed();
            let sigma_changed = ui
                .add(egui::Slider::new(&mut sigmas, 0.5..=4.0).text("spike σ"))
                .changed();
            if top_changed || sigma_changed {
                state.config.top_n = top_n;
                state.config.anomaly_sigmas = sigmas;
                state.refresh();
            }
            ui.separator();

            // ---- District checkboxes (collapsible) ----
            let n_selected = state.filters.get(&district_col).map_or(0, |s| s.len());
            let header_text = format!("{district_col}  ({n_selected}/{})", districts.len());

            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt(&district_col)
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all(&district_col);
                        }
                        if ui.small_button("None").clicked() {
                            state.select_none(&district_col);
                        }
                    });

                    for val in &districts {
                        let mut checked = state
                            .filters
                            .get(&district_col)
                            .is_some_and(|sel| sel.contains(val));
                        if ui.checkbox(&mut checked, val.to_string()).changed() {
                            state.toggle_filter_value(&district_col, val);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if state.loading {
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open demographic data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
