//! Quick check of rate sheet loading
//!
//! Run with: cargo run --package rate-store --example load_rates

use rate_store::RateSnapshot;
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let path = Path::new("data/rates.tsv");

    let start = Instant::now();
    let snapshot = RateSnapshot::load_from_file(path)?;
    let elapsed = start.elapsed();

    let diagnostics = snapshot.diagnostics();
    println!("Loaded {} rows in {:?}", diagnostics.total_rows, elapsed);
    println!("Skipped {} malformed rows", diagnostics.skipped_rows);
    println!("Insurers: {}", snapshot.projections().companies.join(", "));
    println!("States: {}", snapshot.projections().states.join(", "));

    Ok(())
}
