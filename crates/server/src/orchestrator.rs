//! # Quote Orchestrator
//!
//! This module coordinates the entire quoting pipeline:
//! 1. Validate the resolved query
//! 2. Fetch the current snapshot from the row store
//! 3. Select candidate rows for the query's category
//! 4. Apply the eligibility filters
//! 5. Rank, pair and group the eligible rows
//! 6. Assemble the top-K result or an explicit no-match
//!
//! The orchestrator holds no per-request state; any number of quotes
//! may run concurrently against the same published snapshot.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::info;

use matcher::{
    assemble, first_failing_dimension, rank_and_group, MatchPipeline, PairingRule,
    QuoteOutcome, DEFAULT_TOP_K,
};
use quote::{request, CandidateSelector, PayoutQuery, ValidationError};
use rate_store::{RateSnapshot, RowId};

use crate::store::{RowStore, StoreError};

/// Errors a quote request can surface.
///
/// Validation and store failures keep their own kinds; neither is ever
/// conflated with the success-shaped `QuoteOutcome::NoMatch`.
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Engine failure: {0}")]
    Engine(#[from] anyhow::Error),
}

/// One rejected candidate with the dimension that rejected it.
/// Operator diagnostics only — never part of the result contract.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub row_id: RowId,
    pub company: String,
    pub dimension: &'static str,
}

/// Main orchestrator that coordinates the quoting pipeline.
#[derive(Clone)]
pub struct QuoteOrchestrator {
    store: Arc<dyn RowStore>,
    pairing: PairingRule,
    top_k: usize,
}

impl QuoteOrchestrator {
    /// Create an orchestrator serving from the given store with the
    /// default pairing rule and top-K.
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            store,
            pairing: PairingRule::default(),
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// The snapshot currently being served, for read-only projections.
    pub fn snapshot(&self) -> Result<Arc<RateSnapshot>, StoreError> {
        self.store.snapshot()
    }

    /// Main entry point: evaluate one resolved query.
    pub fn get_quotes(&self, query: &PayoutQuery) -> Result<QuoteOutcome, QuoteError> {
        let start = Instant::now();

        // Validation runs before any row is scanned
        request::validate(query)?;

        let snapshot = self.store.snapshot()?;

        let candidates = CandidateSelector::new(snapshot.clone()).get_candidates(query);
        info!(
            "Selected {} candidates for {} / {}",
            candidates.len(),
            query.state_code(),
            query.category
        );

        let pipeline = MatchPipeline::standard(snapshot.clone());
        let eligible = pipeline.apply(candidates, query)?;
        info!("Eligible rows after filters: {}", eligible.len());

        let groups = rank_and_group(&snapshot, &eligible, &self.pairing);
        let outcome = assemble(groups, self.top_k);

        // Query analytics: one summary line per served request
        info!(
            "Quote served - state={} rto={:?} category={} vehicle={} fuel={:?} policy={} results={} in {:.2?}",
            query.state_code(),
            query.rto_code,
            query.category,
            query.vehicle_type,
            query.fuel_type,
            query.policy_type,
            outcome.entries().len(),
            start.elapsed()
        );

        Ok(outcome)
    }

    /// Why did each rejected candidate drop out?
    ///
    /// Walks the same candidate set as `get_quotes` and reports the
    /// first failing dimension per rejected row.
    pub fn explain_rejections(&self, query: &PayoutQuery) -> Result<Vec<Rejection>, QuoteError> {
        request::validate(query)?;
        let snapshot = self.store.snapshot()?;
        let candidates = CandidateSelector::new(snapshot.clone()).get_candidates(query);

        let mut rejections = Vec::new();
        for candidate in candidates {
            if let Some(row) = snapshot.get_row(candidate.row_id) {
                if let Some(dimension) = first_failing_dimension(row, query) {
                    rejections.push(Rejection {
                        row_id: row.row_id,
                        company: row.company.clone(),
                        dimension,
                    });
                }
            }
        }
        Ok(rejections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryRowStore;
    use quote::VehicleAge;
    use rate_store::{BusinessType, RateRow, RateSnapshot, RtoRule, VehicleCategory};
    use std::collections::BTreeMap;

    fn row(company: &str, state: &str, payout: f64) -> RateRow {
        RateRow {
            row_id: 0,
            company: company.to_string(),
            state: state.to_string(),
            vehicle_category: "Two Wheeler".to_string(),
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
            payout,
            condition: String::new(),
            rank_override: None,
            extras: BTreeMap::new(),
        }
    }

    fn orchestrator(rows: Vec<RateRow>) -> QuoteOrchestrator {
        let mut snapshot = RateSnapshot::new();
        for r in rows {
            snapshot.insert_row(r);
        }
        snapshot.finalize();
        let store = Arc::new(InMemoryRowStore::with_snapshot(Arc::new(snapshot)));
        QuoteOrchestrator::new(store)
    }

    fn bike_query() -> PayoutQuery {
        let mut q = PayoutQuery::new(
            "TN",
            VehicleCategory::TwoWheeler,
            "Bike",
            BusinessType::Old,
            "Package",
        );
        q.fuel_type = Some("Petrol".to_string());
        q.age = VehicleAge::Years(2);
        q
    }

    #[test]
    fn test_happy_path_ranks_by_payout() {
        let orchestrator = orchestrator(vec![
            row("Shriram", "TN", 40.0),
            row("Bajaj", "TN", 55.0),
        ]);

        let outcome = orchestrator.get_quotes(&bike_query()).unwrap();
        let entries = outcome.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].company, "Bajaj");
    }

    #[test]
    fn test_validation_failure_before_any_scan() {
        let orchestrator = orchestrator(vec![row("Shriram", "TN", 40.0)]);
        let mut query = bike_query();
        query.vehicle_type = String::new();

        assert!(matches!(
            orchestrator.get_quotes(&query),
            Err(QuoteError::Validation(_))
        ));
    }

    #[test]
    fn test_no_match_vs_unavailable_never_conflated() {
        // Zero eligible rows: success-shaped no-match
        let orchestrator = orchestrator(vec![row("Shriram", "KL", 40.0)]);
        let outcome = orchestrator.get_quotes(&bike_query()).unwrap();
        assert!(outcome.is_no_match());

        // No snapshot at all: a store error, not a no-match
        let empty = QuoteOrchestrator::new(Arc::new(InMemoryRowStore::empty()));
        assert!(matches!(
            empty.get_quotes(&bike_query()),
            Err(QuoteError::Store(StoreError::Unavailable(_)))
        ));
    }

    #[test]
    fn test_explain_rejections() {
        let orchestrator = orchestrator(vec![
            row("Shriram", "TN", 40.0),
            row("Bajaj", "KL", 55.0),
        ]);

        let rejections = orchestrator.explain_rejections(&bike_query()).unwrap();
        assert_eq!(rejections.len(), 1);
        assert_eq!(rejections[0].company, "Bajaj");
        assert_eq!(rejections[0].dimension, "state");
    }
}
