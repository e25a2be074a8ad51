use std::path::Path;
use std::sync::Arc;

use aadhaar_dash::data::filter::{FilterState, Selection};
use aadhaar_dash::data::loader::load_file;
use aadhaar_dash::data::model::REQUIRED_COLUMNS;
use aadhaar_dash::engine::{aggregate, flag_anomalies, time_series, top_n, Direction, Reducer};
use aadhaar_dash::{DashboardConfig, DashboardReport, SchemaError, Value};
use arrow::array::{Date32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;

/// Seven days for one state with a surge on the last day, plus a neighbour state.
fn spike_csv() -> String {
    let mut text = String::from("date,state,district,pincode,demo_age_5_17\n");
    for day in 1..=7 {
        let (a, b) = if day == 7 { (250, 250) } else { (5, 5) };
        text.push_str(&format!("2025-03-0{day},Madhya Pradesh,Indore,452001,{a}\n"));
        text.push_str(&format!("2025-03-0{day},Madhya Pradesh,Bhopal,462001,{b}\n"));
        text.push_str(&format!("2025-03-0{day},Maharashtra,Pune,411001,40\n"));
    }
    text
}

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn csv_file_through_full_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "mp.csv", &spike_csv());

    let dataset = load_file(&path).unwrap();
    assert_eq!(dataset.len(), 21);
    dataset.require_columns(&REQUIRED_COLUMNS).unwrap();

    let report = DashboardReport::build(
        &dataset,
        &Selection::default(),
        &FilterState::new(),
        &DashboardConfig::default(),
    )
    .unwrap();

    assert_eq!(report.metrics.districts, 3);
    assert_eq!(report.metrics.total_value, 10.0 * 6.0 + 500.0 + 40.0 * 7.0);
    assert_eq!(report.trend.len(), 7);
    assert_eq!(report.anomalies.len(), 1);
    assert_eq!(report.anomalies[0].date, NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());
    assert_eq!(report.anomalies[0].value, 500.0);
    assert_eq!(report.preview.len(), 20);
}

#[test]
fn engine_calls_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = load_file(&write(dir.path(), "mp.csv", &spike_csv())).unwrap();
    let records = dataset.records.as_slice();

    let run = || {
        let agg = aggregate(records, "district", "demo_age_5_17", Reducer::Sum).unwrap();
        let ranked = top_n(&agg, 2, Direction::Descending);
        let series = time_series(records, "date", "demo_age_5_17", |_| true).unwrap();
        let spikes = flag_anomalies(&series);
        (agg, ranked, series, spikes)
    };
    assert_eq!(run(), run());
}

#[test]
fn strict_date_policy_applies_to_loaded_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut text = spike_csv();
    text.push_str("sometime,Madhya Pradesh,Indore,452001,3\n");
    let dataset = load_file(&write(dir.path(), "bad.csv", &text)).unwrap();

    let err = DashboardReport::build(
        &dataset,
        &Selection::default(),
        &FilterState::new(),
        &DashboardConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDate { row: 21, .. }));
}

#[test]
fn missing_required_column_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "nodate.csv", "state,district,demo_age_5_17\nGoa,North Goa,4\n");
    let dataset = load_file(&path).unwrap();
    let err = dataset.require_columns(&REQUIRED_COLUMNS).unwrap_err();
    assert_eq!(err.column(), "date");
}

#[test]
fn json_records_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "rows.json",
        r#"[{"date": "05-01-2025", "state": "Goa", "district": "North Goa", "demo_age_5_17": 3}]"#,
    );
    let dataset = load_file(&path).unwrap();
    assert_eq!(
        dataset.records[0].get("date"),
        Some(&Value::Date(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()))
    );
}

#[test]
fn parquet_with_date32_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rows.parquet");

    let schema = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("state", DataType::Utf8, false),
        Field::new("district", DataType::Utf8, true),
        Field::new("demo_age_5_17", DataType::Int64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Date32Array::from(vec![20148, 20149])),
            Arc::new(StringArray::from(vec!["Goa", "Goa"])),
            Arc::new(StringArray::from(vec![Some("North Goa"), None])),
            Arc::new(Int64Array::from(vec![4, 6])),
        ],
    )
    .unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let dataset = load_file(&path).unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(
        dataset.records[0].get("date"),
        Some(&Value::Date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()))
    );
    assert_eq!(dataset.records[1].get("district"), Some(&Value::Null));
    assert_eq!(dataset.records[1].get("demo_age_5_17"), Some(&Value::Integer(6)));
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "rows.xlsx", "");
    let err = load_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Unsupported file extension"));
}
