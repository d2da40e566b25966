//! Example: Select candidate rows for a query
//!
//! Run with: cargo run --package quote --example select_candidates
//!
//! This example shows how to:
//! 1. Load a rate snapshot
//! 2. Build a resolved payout query
//! 3. Validate it
//! 4. Select the candidate rows the matcher would evaluate

use quote::{request, CandidateSelector, PayoutQuery, VehicleAge};
use rate_store::{BusinessType, RateSnapshot, VehicleCategory};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("debug")
        .init();

    println!("=== Candidate Selection Example ===\n");

    println!("Loading rate snapshot...");
    let start = Instant::now();
    let snapshot = Arc::new(RateSnapshot::load_from_file(Path::new("data/rates.tsv"))?);
    println!("Loaded {} rows in {:?}\n", snapshot.len(), start.elapsed());

    let mut query = PayoutQuery::new(
        "Tamil Nadu",
        VehicleCategory::TwoWheeler,
        "Bike",
        BusinessType::Old,
        "Package",
    );
    query.fuel_type = Some("Petrol".to_string());
    query.age = VehicleAge::Years(3);

    request::validate(&query)?;
    println!("Query: {} / {} / {}", query.state_code(), query.category, query.vehicle_type);

    let selector = CandidateSelector::new(snapshot.clone());
    let start = Instant::now();
    let candidates = selector.get_candidates(&query);
    println!(
        "Selected {} candidates in {:?}",
        candidates.len(),
        start.elapsed()
    );

    for candidate in candidates.iter().take(10) {
        let row = snapshot.get_row(candidate.row_id).unwrap();
        println!("  #{:<3} {:<22} {:>6.2}%", row.row_id, row.company, row.payout);
    }

    Ok(())
}
