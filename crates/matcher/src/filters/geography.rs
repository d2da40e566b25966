//! Filter for the geographic dimensions: state and RTO.
//!
//! This is the first filter in the pipeline because geography is the
//! most selective dimension in real rate sheets.

use crate::dimension::Dimension;
use crate::filters::retain_matching;
use crate::traits::EligibilityFilter;
use anyhow::Result;
use quote::{Candidate, PayoutQuery};
use rate_store::RateSnapshot;
use std::sync::Arc;

/// Keeps candidates whose state and RTO predicates cover the query.
///
/// ## Algorithm
/// For each candidate:
/// 1. State cell: wildcard / exact / comma list / exclusion list, with
///    query-side "Others" reaching only the catch-all rows
/// 2. RTO rule: included codes, or applies-all minus exclusions; the
///    RTO dimension activates only when the caller submitted a code
pub struct GeographyFilter {
    snapshot: Arc<RateSnapshot>,
}

impl GeographyFilter {
    pub fn new(snapshot: Arc<RateSnapshot>) -> Self {
        Self { snapshot }
    }
}

impl EligibilityFilter for GeographyFilter {
    fn name(&self) -> &str {
        "GeographyFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        query: &PayoutQuery,
    ) -> Result<Vec<Candidate>> {
        Ok(retain_matching(
            &self.snapshot,
            candidates,
            &[Dimension::State, Dimension::Rto],
            query,
        ))
    }
}
