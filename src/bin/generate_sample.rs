use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Decaying exponential with a constant offset, `a0 * exp(a1 * x) + a2`.
fn model(x: f64) -> f64 {
    5.0 * (-0.4 * x).exp() + 1.0
}

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let x: Vec<f64> = (0..40).map(|i| 0.25 * i as f64).collect();
    let xerr: Vec<f64> = x.iter().map(|_| 0.02).collect();
    let yerr: Vec<f64> = x.iter().map(|&xi| 0.05 + 0.02 * model(xi)).collect();
    let y: Vec<f64> = x
        .iter()
        .zip(&yerr)
        .map(|(&xi, &sigma)| model(xi) + rng.gauss(0.0, sigma))
        .collect();
    let run: Vec<String> = (0..x.len()).map(|i| format!("run_{}", i / 10)).collect();

    // ---- CSV ----
    let csv_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(csv_path).with_context(|| format!("creating {csv_path}"))?;
    writer.write_record(["x", "xerr", "y", "yerr", "run"])?;
    for i in 0..x.len() {
        writer.write_record([
            x[i].to_string(),
            xerr[i].to_string(),
            y[i].to_string(),
            yerr[i].to_string(),
            run[i].clone(),
        ])?;
    }
    writer.flush()?;

    // ---- Parquet ----
    let schema = Arc::new(Schema::new(vec![
        Field::new("x", DataType::Float64, false),
        Field::new("xerr", DataType::Float64, false),
        Field::new("y", DataType::Float64, false),
        Field::new("yerr", DataType::Float64, false),
        Field::new("run", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(x.clone())),
            Arc::new(Float64Array::from(xerr)),
            Arc::new(Float64Array::from(y)),
            Arc::new(Float64Array::from(yerr)),
            Arc::new(StringArray::from(run)),
        ],
    )
    .context("building record batch")?;

    let parquet_path = "sample_data.parquet";
    let file = std::fs::File::create(parquet_path).with_context(|| format!("creating {parquet_path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;

    println!(
        "Wrote {} records to {csv_path} and {parquet_path} (try the exponential function, guess 4 -0.5 0)",
        x.len()
    );
    Ok(())
}
