//! Writes a small synthetic Superstore-style dataset plus two demo model
//! artifacts under `demo/`, so the app is drivable out of the box:
//!
//! ```text
//! cargo run --bin generate_sample
//! cargo run
//! ```

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde_json::json;

const N_ROWS: usize = 120;

/// Minimal deterministic PRNG (splitmix64)
struct SampleRng {
    state: u64,
}

impl SampleRng {
    fn new(seed: u64) -> Self {
        SampleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() -> Result<()> {
    std::fs::create_dir_all("demo").context("creating demo directory")?;

    write_dataset("demo/sample_superstore.csv")?;
    write_segment_artifact("demo/segment_voting.json")?;
    write_sales_artifact("demo/sales_rf.json")?;

    println!("Wrote demo/sample_superstore.csv ({N_ROWS} rows)");
    println!("Wrote demo/segment_voting.json and demo/sales_rf.json");
    Ok(())
}

fn write_dataset(path: &str) -> Result<()> {
    let mut rng = SampleRng::new(42);
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;

    writer.write_record([
        "Row ID",
        "Order ID",
        "Order Date",
        "Ship Date",
        "Ship Mode",
        "Customer ID",
        "Segment",
        "Region",
        "Category",
        "Sales",
        "Quantity",
        "Discount",
        "Profit",
    ])?;

    let ship_modes = ["Standard Class", "Second Class", "First Class", "Same Day"];
    let segments = ["Consumer", "Consumer", "Corporate", "Home Office"];
    let regions = ["East", "West", "Central", "South"];
    let categories = [
        ("Furniture", 180.0),
        ("Office Supplies", 40.0),
        ("Technology", 320.0),
    ];

    for row_id in 1..=N_ROWS {
        let order = NaiveDate::from_ymd_opt(2023, rng.range(1, 12) as u32, rng.range(1, 28) as u32)
            .context("building order date")?;
        // A few orders have no recorded ship date; the app imputes ShipDays.
        let ship = (rng.next_f64() > 0.05).then(|| order + Duration::days(rng.range(1, 7)));

        let (category, base_price) = *rng.pick(&categories);
        let quantity = rng.range(1, 10);
        let discount = *rng.pick(&[0.0, 0.0, 0.1, 0.2]);
        let sales = base_price * quantity as f64 * (1.0 - discount) * (0.8 + 0.4 * rng.next_f64());
        let profit = sales * (0.25 - discount) * (0.5 + rng.next_f64());

        writer.write_record([
            row_id.to_string(),
            format!("US-2023-{:06}", 100_000 + row_id * 7),
            order.format("%m/%d/%Y").to_string(),
            ship.map(|d| d.format("%m/%d/%Y").to_string()).unwrap_or_default(),
            (*rng.pick(&ship_modes)).to_string(),
            format!("C-{:05}", rng.range(10_000, 19_999)),
            (*rng.pick(&segments)).to_string(),
            (*rng.pick(&regions)).to_string(),
            category.to_string(),
            format!("{sales:.2}"),
            quantity.to_string(),
            discount.to_string(),
            format!("{profit:.2}"),
        ])?;
    }

    writer.flush().context("flushing dataset")?;
    Ok(())
}

/// A small hand-built voting classifier over the derived features.
fn write_segment_artifact(path: &str) -> Result<()> {
    let artifact = json!({
        "model": {
            "kind": "tree_ensemble",
            "aggregate": "majority",
            "trees": [
                {
                    "feature": "ShipDays", "threshold": 2.5,
                    "left": { "value": "Corporate" },
                    "right": {
                        "feature": "Quantity", "threshold": 5.5,
                        "left": { "value": "Consumer" },
                        "right": { "value": "Home Office" }
                    }
                },
                {
                    "feature": "OrderMonth", "threshold": 6.5,
                    "left": { "value": "Consumer" },
                    "right": { "value": "Corporate" }
                },
                {
                    "feature": "Quantity", "threshold": 3.5,
                    "left": { "value": "Consumer" },
                    "right": {
                        "feature": "ShipDays", "threshold": 5.5,
                        "left": { "value": "Corporate" },
                        "right": { "value": "Home Office" }
                    }
                }
            ]
        },
        "drop_cols": ["Row ID", "Order ID", "Customer ID"],
        "target_col": "Segment"
    });

    std::fs::write(path, serde_json::to_string_pretty(&artifact)?)
        .with_context(|| format!("writing {path}"))?;
    Ok(())
}

/// A small hand-built random-forest regressor for the sale amount.
fn write_sales_artifact(path: &str) -> Result<()> {
    let artifact = json!({
        "model": {
            "kind": "tree_ensemble",
            "aggregate": "mean",
            "trees": [
                {
                    "feature": "Quantity", "threshold": 3.5,
                    "left": { "value": 140.0 },
                    "right": { "value": 520.0 }
                },
                {
                    "feature": "Discount", "threshold": 0.05,
                    "left": { "value": 430.0 },
                    "right": { "value": 270.0 }
                },
                {
                    "feature": "ShipDays", "threshold": 3.5,
                    "left": { "value": 360.0 },
                    "right": { "value": 310.0 }
                }
            ]
        },
        "drop_cols": ["Row ID", "Order ID", "Customer ID"],
        "target_col": "Sales"
    });

    std::fs::write(path, serde_json::to_string_pretty(&artifact)?)
        .with_context(|| format!("writing {path}"))?;
    Ok(())
}
