use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// One output row, in the column order of the real listings export.
#[derive(Serialize)]
struct Row {
    price: u32,
    model_year: Option<f64>,
    model: &'static str,
    condition: &'static str,
    cylinders: Option<f64>,
    fuel: &'static str,
    odometer: Option<f64>,
    transmission: &'static str,
    #[serde(rename = "type")]
    body_type: &'static str,
    paint_color: Option<&'static str>,
    is_4wd: Option<f64>,
    date_posted: String,
    days_listed: u32,
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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.below(items.len())]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// (model, body type, cylinders, base price)
const MODELS: [(&str, &str, f64, f64); 12] = [
    ("ford f-150", "pickup", 8.0, 26_000.0),
    ("ford focus", "sedan", 4.0, 14_000.0),
    ("ford escape", "SUV", 4.0, 19_000.0),
    ("chevrolet silverado 1500", "truck", 8.0, 27_000.0),
    ("chevrolet malibu", "sedan", 4.0, 15_000.0),
    ("toyota camry", "sedan", 4.0, 18_000.0),
    ("toyota tacoma", "pickup", 6.0, 25_000.0),
    ("honda civic", "sedan", 4.0, 16_000.0),
    ("honda cr-v", "SUV", 4.0, 20_000.0),
    ("ram 1500", "pickup", 8.0, 28_000.0),
    ("jeep wrangler", "SUV", 6.0, 24_000.0),
    ("nissan altima", "sedan", 4.0, 14_500.0),
];

const CONDITIONS: [&str; 5] = ["excellent", "good", "like new", "fair", "salvage"];
const FUELS: [&str; 4] = ["gas", "gas", "diesel", "hybrid"];
const TRANSMISSIONS: [&str; 3] = ["automatic", "automatic", "manual"];
const COLORS: [&str; 6] = ["white", "black", "silver", "red", "blue", "grey"];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let first_day = NaiveDate::from_ymd_opt(2018, 5, 1).context("invalid start date")?;
    let span_days = 365;
    let n_rows = 5_000;

    let output_path = "vehicles_us.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    for _ in 0..n_rows {
        let (model, body_type, cylinders, base_price) = rng.pick(&MODELS);
        let year = 2000 + rng.below(20) as i32;
        let age = (2019 - year).max(0) as f64;
        let odometer = (age * 12_000.0 + rng.gauss(0.0, 15_000.0)).max(0.0).round();
        let price = (base_price * 0.88f64.powf(age) - odometer * 0.02 + rng.gauss(0.0, 1_500.0))
            .max(500.0)
            .round();
        let posted = first_day + Duration::days(rng.below(span_days) as i64);

        let row = Row {
            price: price as u32,
            // Roughly 7% of the real export lacks a model year.
            model_year: (rng.next_f64() > 0.07).then_some(year as f64),
            model,
            condition: rng.pick(&CONDITIONS),
            cylinders: (rng.next_f64() > 0.1).then_some(cylinders),
            fuel: rng.pick(&FUELS),
            odometer: (rng.next_f64() > 0.15).then_some(odometer),
            transmission: rng.pick(&TRANSMISSIONS),
            body_type,
            paint_color: (rng.next_f64() > 0.18).then(|| rng.pick(&COLORS)),
            is_4wd: (rng.next_f64() > 0.5).then_some(1.0),
            date_posted: posted.format("%Y-%m-%d").to_string(),
            days_listed: 1 + (rng.gauss(40.0, 25.0).abs() as u32),
        };
        writer.serialize(row).context("writing row")?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {n_rows} listings to {output_path}");
    Ok(())
}
