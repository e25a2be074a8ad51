use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Date32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Days, NaiveDate};
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    date: NaiveDate,
    state: &'static str,
    district: &'static str,
    pincode: i64,
    demo_age_5_17: i64,
}

const REGIONS: [(&str, &[(&str, f64)]); 3] = [
    (
        "Madhya Pradesh",
        &[
            ("Indore", 14.0),
            ("Bhopal", 12.0),
            ("Jabalpur", 9.0),
            ("Gwalior", 8.0),
            ("Ujjain", 6.0),
            ("Sagar", 5.0),
            ("Rewa", 5.0),
            ("Satna", 4.0),
            ("Dewas", 4.0),
            ("Chhindwara", 3.0),
            ("Khargone", 3.0),
        ],
    ),
    (
        "Maharashtra",
        &[("Pune", 15.0), ("Nagpur", 11.0), ("Nashik", 8.0)],
    ),
    ("Chhattisgarh", &[("Raipur", 9.0), ("Bilaspur", 6.0)]),
];

/// Days (offset from the start date) with a state-wide surge in updates.
const SPIKE_DAYS: [u64; 2] = [23, 51];

fn generate_rows(days: u64) -> Result<Vec<Row>> {
    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2025, 3, 1).context("invalid start date")?;
    let mut rows = Vec::new();

    for day in 0..days {
        let date = start + Days::new(day);
        let surge = if SPIKE_DAYS.contains(&day) { 6.0 } else { 1.0 };
        for (s_idx, (state, districts)) in REGIONS.iter().enumerate() {
            for (d_idx, (district, base)) in districts.iter().enumerate() {
                let expected = base * surge;
                let count = rng.gauss(expected, expected.sqrt()).round().max(0.0) as i64;
                rows.push(Row {
                    date,
                    state: *state,
                    district: *district,
                    pincode: 450_001 + (s_idx as i64) * 10_000 + d_idx as i64 * 10,
                    demo_age_5_17: count,
                });
            }
        }
    }
    Ok(rows)
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(["date", "state", "district", "pincode", "demo_age_5_17"])?;
    for row in rows {
        writer.write_record([
            row.date.format("%d-%m-%Y").to_string(),
            row.state.to_string(),
            row.district.to_string(),
            row.pincode.to_string(),
            row.demo_age_5_17.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("invalid epoch")?;
    let dates = Date32Array::from(
        rows.iter()
            .map(|r| (r.date - epoch).num_days() as i32)
            .collect::<Vec<_>>(),
    );
    let states = StringArray::from(rows.iter().map(|r| r.state).collect::<Vec<_>>());
    let districts = StringArray::from(rows.iter().map(|r| r.district).collect::<Vec<_>>());
    let pincodes = Int64Array::from(rows.iter().map(|r| r.pincode).collect::<Vec<_>>());
    let counts = Int64Array::from(rows.iter().map(|r| r.demo_age_5_17).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("state", DataType::Utf8, false),
        Field::new("district", DataType::Utf8, false),
        Field::new("pincode", DataType::Int64, false),
        Field::new("demo_age_5_17", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(dates),
            Arc::new(states),
            Arc::new(districts),
            Arc::new(pincodes),
            Arc::new(counts),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let output = std::env::args().nth(1).unwrap_or_else(|| "sample_data.csv".into());
    let path = Path::new(&output);
    let rows = generate_rows(90)?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => write_csv(path, &rows)?,
        Some("parquet") | Some("pq") => write_parquet(path, &rows)?,
        _ => bail!("output must end in .csv or .parquet: {output}"),
    }

    log::info!("Wrote {} records to {output}", rows.len());
    println!("Wrote {} records to {output}", rows.len());
    Ok(())
}
