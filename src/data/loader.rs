use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array,
    Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use chrono::{Days, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{parse_calendar_date, Dataset, Record, Value};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a demographic table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one record per line (recommended)
/// * `.json`    – `[{ "state": "...", "district": "...", ... }, ...]`
/// * `.parquet` – flat scalar columns, dates as `Date32` or text
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} records with columns {:?} from {}",
        dataset.len(),
        dataset.column_names,
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every other row a record.
/// Cell types are guessed per cell (see [`guess_value_type`]).
fn load_csv(path: &Path) -> Result<Dataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

/// Parse CSV from any reader; shared by the file loader and tests.
pub fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Dataset> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        if row.len() != headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields but found {}",
                headers.len(),
                row.len()
            );
        }

        let fields: BTreeMap<String, Value> = headers
            .iter()
            .zip(row.iter())
            .map(|(col, cell)| (col.clone(), guess_value_type(cell)))
            .collect();
        records.push(Record { fields });
    }

    Ok(Dataset::from_records(records))
}

/// Type a raw text cell: empty → Null, then integer, finite float, bool, date, text.
/// `NaN` / `inf` spellings stay text so they surface as non-numeric later.
pub fn guess_value_type(s: &str) -> Value {
    let s = s.trim();
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() {
            return Value::Float(f);
        }
    }
    if s == "true" || s == "false" {
        return Value::Bool(s == "true");
    }
    if let Some(d) = parse_calendar_date(s) {
        return Value::Date(d);
    }
    Value::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "date": "2025-03-01", "state": "Madhya Pradesh", "district": "Indore", "demo_age_5_17": 12 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let fields: BTreeMap<String, Value> = obj
            .iter()
            .map(|(key, val)| (key.clone(), json_to_value(val)))
            .collect();
        records.push(Record { fields });
    }

    Ok(Dataset::from_records(records))
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => match parse_calendar_date(s) {
            Some(d) => Value::Date(d),
            None => Value::String(s.clone()),
        },
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`), as well as the bundled sample generator.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let columns: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        for row in 0..batch.num_rows() {
            let mut fields = BTreeMap::new();
            for (col_idx, col_name) in &columns {
                let value = extract_value(batch.column(*col_idx), row)
                    .with_context(|| format!("Row {row}: failed to read '{col_name}'"))?;
                fields.insert(col_name.clone(), value);
            }
            records.push(Record { fields });
        }
    }

    Ok(Dataset::from_records(records))
}

// -- Parquet / Arrow helpers --

/// Arrow `Date32` counts days since 1970-01-01.
fn date32_to_naive(days: i32) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    if days >= 0 {
        epoch.checked_add_days(Days::new(days as u64))
    } else {
        epoch.checked_sub_days(Days::new(days.unsigned_abs() as u64))
    }
}

fn downcast<'a, T: 'static>(col: &'a Arc<dyn Array>) -> Result<&'a T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("unexpected array layout for {:?}", col.data_type()))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => {
            let s = downcast::<StringArray>(col)?.value(row);
            guess_text(s)
        }
        DataType::LargeUtf8 => guess_text(col.as_string::<i64>().value(row)),
        DataType::Int32 => Value::Integer(downcast::<Int32Array>(col)?.value(row) as i64),
        DataType::Int64 => Value::Integer(downcast::<Int64Array>(col)?.value(row)),
        DataType::Float32 => Value::Float(downcast::<Float32Array>(col)?.value(row) as f64),
        DataType::Float64 => Value::Float(downcast::<Float64Array>(col)?.value(row)),
        DataType::Boolean => Value::Bool(downcast::<BooleanArray>(col)?.value(row)),
        DataType::Date32 => {
            let days = downcast::<Date32Array>(col)?.value(row);
            let date = date32_to_naive(days)
                .with_context(|| format!("Date32 value {days} is out of range"))?;
            Value::Date(date)
        }
        other => bail!("Unsupported column type {other:?}"),
    };
    Ok(value)
}

/// Text cells from Parquet keep their text unless they are calendar dates.
fn guess_text(s: &str) -> Value {
    match parse_calendar_date(s) {
        Some(d) => Value::Date(d),
        None => Value::String(s.to_string()),
    }
}
