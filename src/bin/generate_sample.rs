use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const COLUMNS: [&str; 6] = [
    "Time (s)",
    "Manifold Pressure (psi)",
    "Chamber Pressure (psi)",
    "Ox Tank Weight (lb)",
    "Venturi P1 (psi)",
    "Venturi P2 (psi)",
];

const RATE_HZ: f64 = 100.0;
const DURATION_S: f64 = 12.0;

/// Valve opening fraction: closed, 1 s ramp at t=2, full from 3 to 8, 1 s close.
fn throttle(t: f64) -> f64 {
    match t {
        t if t < 2.0 => 0.0,
        t if t < 3.0 => t - 2.0,
        t if t < 8.0 => 1.0,
        t if t < 9.0 => 9.0 - t,
        _ => 0.0,
    }
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

/// One column per entry of `COLUMNS`.
fn simulate(rng: &mut SimpleRng) -> Vec<Vec<f64>> {
    let n = (DURATION_S * RATE_HZ) as usize + 1;
    let mut cols = vec![Vec::with_capacity(n); COLUMNS.len()];

    // Tank drains at 2.5 lb/s at full throttle.
    let mut weight = 60.0;
    for i in 0..n {
        let t = i as f64 / RATE_HZ;
        let open = throttle(t);
        weight -= 2.5 * open / RATE_HZ;

        let manifold = 14.7 + 485.0 * open;
        let chamber = 14.7 + 300.0 * open;
        let p1 = 14.7 + 520.0 * open;
        let p2 = p1 - 20.0 * open;

        cols[0].push(t);
        cols[1].push(manifold + rng.gauss(0.0, 2.0));
        cols[2].push(chamber + rng.gauss(0.0, 2.0));
        cols[3].push(weight + rng.gauss(0.0, 0.05));
        cols[4].push(p1 + rng.gauss(0.0, 0.5));
        cols[5].push(p2 + rng.gauss(0.0, 0.5));
    }
    cols
}

fn write_csv(path: &Path, cols: &[Vec<f64>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(COLUMNS)?;
    for row in 0..cols[0].len() {
        writer.write_record(cols.iter().map(|c| format!("{:.4}", c[row])))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, cols: &[Vec<f64>]) -> Result<()> {
    let schema = Arc::new(Schema::new(
        COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, false))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = cols
        .iter()
        .map(|c| Arc::new(Float64Array::from(c.clone())) as ArrayRef)
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("Failed to create RecordBatch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_hotfire.csv".to_string());
    let path = Path::new(&output);

    let mut rng = SimpleRng::new(42);
    let cols = simulate(&mut rng);

    match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") | Some("pq") => write_parquet(path, &cols)?,
        _ => write_csv(path, &cols)?,
    }

    println!(
        "Wrote {} rows × {} channels to {}",
        cols[0].len(),
        COLUMNS.len(),
        path.display()
    );
    Ok(())
}
