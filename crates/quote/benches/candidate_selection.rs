//! Benchmarks for candidate selection
//!
//! Run with: cargo bench --package quote
//!
//! Benchmarks selection against a synthetic snapshot large enough to
//! make partition lookups visible.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quote::{CandidateSelector, PayoutQuery};
use rate_store::{BusinessType, RateRow, RateSnapshot, RtoRule, VehicleCategory};
use std::collections::BTreeMap;
use std::sync::Arc;

fn build_snapshot(rows: usize) -> Arc<RateSnapshot> {
    let categories = ["Two Wheeler", "Private Car", "GCV", "PCV", "Misc"];
    let mut snapshot = RateSnapshot::new();
    for i in 0..rows {
        snapshot.insert_row(RateRow {
            row_id: 0,
            company: format!("Insurer {}", i % 12),
            state: "TN".to_string(),
            vehicle_category: categories[i % categories.len()].to_string(),
            vehicle_type: "Bike".to_string(),
            make: String::new(),
            model: String::new(),
            fuel_type: "Petrol".to_string(),
            cc_slab: String::new(),
            watt_slab: String::new(),
            business_type: String::new(),
            policy_type: "Package".to_string(),
            rto: RtoRule::applies_to_all(),
            age_min: None,
            age_max: None,
            gvw_min: None,
            gvw_max: None,
            date_from: None,
            date_till: None,
            payout: (i % 60) as f64,
            condition: String::new(),
            rank_override: None,
            extras: BTreeMap::new(),
        });
    }
    snapshot.finalize();
    Arc::new(snapshot)
}

fn bench_get_candidates(c: &mut Criterion) {
    let snapshot = build_snapshot(10_000);
    let selector = CandidateSelector::new(snapshot);
    let query = PayoutQuery::new(
        "TN",
        VehicleCategory::TwoWheeler,
        "Bike",
        BusinessType::Old,
        "Package",
    );

    c.bench_function("selector_get_candidates", |b| {
        b.iter(|| {
            let candidates = selector.get_candidates(black_box(&query));
            black_box(candidates)
        })
    });
}

criterion_group!(benches, bench_get_candidates);
criterion_main!(benches);
