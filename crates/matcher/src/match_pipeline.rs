//! The MatchPipeline chains the per-dimension filters.
//!
//! This module provides the main MatchPipeline struct that composes the
//! eligibility conjunction from per-dimension filters using the builder
//! pattern.

use crate::dimension::Dimension;
use crate::filters::{
    FuelFilter, GeographyFilter, PolicyFilter, ValidityFilter, VehicleFilter,
};
use crate::traits::EligibilityFilter;
use anyhow::Result;
use quote::{Candidate, PayoutQuery};
use rate_store::{RateRow, RateSnapshot};
use std::sync::Arc;
use tracing;

/// Chains eligibility filters into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = MatchPipeline::standard(snapshot.clone());
/// let eligible = pipeline.apply(candidates, &query)?;
/// ```
pub struct MatchPipeline {
    filters: Vec<Box<dyn EligibilityFilter>>,
}

impl MatchPipeline {
    /// Create a new empty MatchPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The full eligibility conjunction in its fixed serving order.
    pub fn standard(snapshot: Arc<RateSnapshot>) -> Self {
        Self::new()
            .add_filter(GeographyFilter::new(snapshot.clone()))
            .add_filter(VehicleFilter::new(snapshot.clone()))
            .add_filter(FuelFilter::new(snapshot.clone()))
            .add_filter(PolicyFilter::new(snapshot.clone()))
            .add_filter(ValidityFilter::new(snapshot))
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl EligibilityFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// Each stage reduces the set; a candidate that fails any activated
    /// predicate is gone after the owning stage. Order within the set is
    /// preserved, which is what keeps payout ties deterministic later.
    pub fn apply(
        &self,
        candidates: Vec<Candidate>,
        query: &PayoutQuery,
    ) -> Result<Vec<Candidate>> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, query)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for MatchPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// First failing dimension for one row, if any.
///
/// Diagnostics only — operators use it to see why a row dropped out;
/// it never reaches the caller-facing result.
pub fn first_failing_dimension(row: &RateRow, query: &PayoutQuery) -> Option<&'static str> {
    Dimension::ALL
        .iter()
        .filter(|dim| dim.activated(query))
        .find(|dim| !dim.evaluate(row, query))
        .map(|dim| dim.label())
}
