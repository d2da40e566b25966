//! Candidate selection from the rate snapshot.
//!
//! Selection is the cheap first cut: pull the category partition for
//! the query and hand it to the matcher as candidates, in import order.
//! Every predicate — including the category cell itself — is still
//! evaluated downstream, so selection is purely a performance step and
//! can never change the result set.

use crate::types::{Candidate, PayoutQuery};
use rate_store::RateSnapshot;
use std::sync::Arc;
use tracing::debug;

/// Pulls candidate rows for one query from a shared snapshot.
///
/// Rust concept: Arc lets many selectors (and concurrent requests)
/// share one immutable snapshot without copying it.
#[derive(Clone)]
pub struct CandidateSelector {
    snapshot: Arc<RateSnapshot>,
}

impl CandidateSelector {
    pub fn new(snapshot: Arc<RateSnapshot>) -> Self {
        Self { snapshot }
    }

    /// Candidate rows for the query's category, in import order.
    pub fn get_candidates(&self, query: &PayoutQuery) -> Vec<Candidate> {
        let ids = self.snapshot.category_rows(query.category);
        let candidates: Vec<Candidate> = ids
            .iter()
            .filter_map(|&id| self.snapshot.get_row(id))
            .map(|row| Candidate::new(row.row_id, row.payout))
            .collect();

        debug!(
            "Selected {} candidates for category {} ({} rows total)",
            candidates.len(),
            query.category,
            self.snapshot.len()
        );
        candidates
    }
}
