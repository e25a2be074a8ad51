use aadhaar_dash::engine::TimePoint;
use aadhaar_dash::{DashboardReport, Dataset};
use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, HLine, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{heat_scale, ColorMap};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render every dashboard section in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(report) = &state.report else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view the dashboard  (File → Open…)");
        });
        return;
    };
    let cfg = &state.config;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Key Metrics");
            key_metrics(ui, report);
            ui.separator();

            ui.heading("Data Preview");
            preview_table(ui, report, &preview_columns(state.dataset.as_ref()));
            ui.separator();

            ui.heading(format!("Top {} Districts (total {})", cfg.top_n, cfg.value_column));
            category_bars(ui, "top_districts", &report.top_districts, None);
            ui.separator();

            ui.heading("State Totals");
            let values: Vec<f64> = report.state_totals.iter().map(|(_, v)| *v).collect();
            category_bars(ui, "state_totals", &report.state_totals, Some(heat_scale(&values)));
            ui.separator();

            let scope = state.selection.state.as_deref().unwrap_or("all states");
            ui.heading(format!("Selection: {scope} ({} rows)", report.selected_rows));
            count_bars(ui, report);
            district_shares(ui, report, state.district_colors.as_ref());
            ui.separator();

            ui.heading(format!("Trend: {} over time ({})", cfg.value_column, cfg.focus_state));
            trend_plot(ui, report);
            ui.separator();

            ui.heading(format!("Districts with Consistently High Values ({})", cfg.focus_state));
            category_bars(ui, "high_mean", &report.high_mean_districts, None);
            ui.separator();

            ui.heading("Detected Spikes");
            anomaly_table(ui, report);
        });
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn key_metrics(ui: &mut Ui, report: &DashboardReport) {
    let m = &report.metrics;
    ui.columns(3, |cols| {
        metric(&mut cols[0], "Total Districts", m.districts.to_string());
        metric(&mut cols[1], "Total Population", format!("{}", m.total_value as i64));
        metric(&mut cols[2], "Total Records", m.records.to_string());
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        ui.label(RichText::new(value).size(26.0).strong());
    });
}

/// Every loaded column, not only the required ones.
fn preview_columns(dataset: Option<&Dataset>) -> Vec<&str> {
    dataset
        .map(|ds| ds.column_names.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

fn preview_table(ui: &mut Ui, report: &DashboardReport, columns: &[&str]) {
    ui.push_id("preview_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().at_least(90.0), columns.len())
            .header(20.0, |mut header| {
                for col in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(*col);
                    });
                }
            })
            .body(|mut body| {
                for rec in &report.preview {
                    body.row(18.0, |mut row| {
                        for col in columns {
                            row.col(|ui: &mut Ui| {
                                let text = rec.get(col).map(|v| v.to_string()).unwrap_or_default();
                                ui.label(text);
                            });
                        }
                    });
                }
            });
    });
}

/// Vertical bar chart of labelled values, with category names on the x axis.
fn category_bars(ui: &mut Ui, id: &str, entries: &[(String, f64)], colors: Option<Vec<Color32>>) {
    if entries.is_empty() {
        ui.label("No data.");
        return;
    }
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, (name, value))| {
            let fill = colors
                .as_ref()
                .and_then(|c| c.get(i).copied())
                .unwrap_or(Color32::LIGHT_BLUE);
            Bar::new(i as f64, *value).name(name).fill(fill).width(0.7)
        })
        .collect();

    let labels: Vec<String> = entries.iter().map(|(name, _)| name.clone()).collect();
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| index_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

fn count_bars(ui: &mut Ui, report: &DashboardReport) {
    // Sort numerically where possible so the axis reads left to right.
    let mut entries: Vec<(String, f64)> = report
        .value_counts
        .iter()
        .map(|(k, v)| (k.clone(), *v as f64))
        .collect();
    entries.sort_by(|(a, _), (b, _)| match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        _ => a.cmp(b),
    });
    ui.label("Records per value");
    category_bars(ui, "value_counts", &entries, None);
}

fn district_shares(ui: &mut Ui, report: &DashboardReport, colors: Option<&ColorMap>) {
    let total: usize = report.district_shares.values().sum();
    if total == 0 {
        return;
    }
    ui.label("District-wise distribution");
    for (district, count) in &report.district_shares {
        let pct = 100.0 * *count as f64 / total as f64;
        let color = colors.map_or(Color32::GRAY, |cm| cm.color_for(district));
        ui.horizontal(|ui: &mut Ui| {
            ui.label(RichText::new("■").color(color));
            ui.label(format!("{district}: {pct:.1}%"));
        });
    }
}

fn trend_plot(ui: &mut Ui, report: &DashboardReport) {
    if report.trend.is_empty() {
        ui.label("No dated records for this state.");
        return;
    }
    let line: PlotPoints = report.trend.iter().map(point_xy).collect();
    let spikes: PlotPoints = report.anomalies.iter().map(point_xy).collect();

    Plot::new("trend")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_formatter(|mark, _range| day_label(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(line).name("daily total").width(1.5));
            plot_ui.points(
                Points::new(spikes)
                    .name("spike")
                    .radius(5.0)
                    .color(Color32::RED),
            );
            if let Some(stats) = report.trend_stats {
                plot_ui.hline(
                    HLine::new(stats.threshold)
                        .name("threshold")
                        .color(Color32::from_rgb(200, 120, 0)),
                );
            }
        });
}

fn anomaly_table(ui: &mut Ui, report: &DashboardReport) {
    if let Some(stats) = report.trend_stats {
        ui.label(format!(
            "mean {:.1}, std dev {:.1}, threshold {:.1}",
            stats.mean, stats.std_dev, stats.threshold
        ));
    }
    if report.anomalies.is_empty() {
        ui.label("No unusual spikes.");
        return;
    }
    ui.push_id("anomaly_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().at_least(120.0), 2)
            .header(20.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("date");
                });
                header.col(|ui: &mut Ui| {
                    ui.strong("total");
                });
            })
            .body(|mut body| {
                for p in &report.anomalies {
                    body.row(18.0, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(p.date.to_string());
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(format!("{}", p.value));
                        });
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

fn point_xy(p: &TimePoint) -> [f64; 2] {
    [p.date.num_days_from_ce() as f64, p.value]
}

fn day_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn index_label(labels: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_labels() {
        let labels = vec!["Indore".to_string(), "Bhopal".to_string()];
        assert_eq!(index_label(&labels, 1.0), "Bhopal");
        assert_eq!(index_label(&labels, 0.5), "");
        assert_eq!(index_label(&labels, 7.0), "");

        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(day_label(day.num_days_from_ce() as f64), "2025-03-01");
    }

    #[test]
    fn preview_shows_every_loaded_column() {
        let reader = csv::Reader::from_reader(
            "date,state,district,pincode,demo_age_5_17\n01-03-2025,Goa,North Goa,403001,4\n".as_bytes(),
        );
        let ds = aadhaar_dash::data::loader::read_csv(reader).unwrap();
        assert_eq!(
            preview_columns(Some(&ds)),
            vec!["date", "demo_age_5_17", "district", "pincode", "state"]
        );
        assert!(preview_columns(None).is_empty());
    }
}
