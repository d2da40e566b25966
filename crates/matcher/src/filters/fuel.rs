//! Filter for the powertrain dimensions: fuel type and the CC/watt slab.
//!
//! The two slabs are mutually exclusive by fuel: combustion vehicles
//! carry a cubic-capacity slab, electric vehicles a motor-power slab.

use crate::dimension::Dimension;
use crate::filters::retain_matching;
use crate::traits::EligibilityFilter;
use anyhow::Result;
use quote::{Candidate, PayoutQuery};
use rate_store::RateSnapshot;
use std::sync::Arc;

/// Keeps candidates whose fuel and slab predicates cover the query.
pub struct FuelFilter {
    snapshot: Arc<RateSnapshot>,
}

impl FuelFilter {
    pub fn new(snapshot: Arc<RateSnapshot>) -> Self {
        Self { snapshot }
    }
}

impl EligibilityFilter for FuelFilter {
    fn name(&self) -> &str {
        "FuelFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        query: &PayoutQuery,
    ) -> Result<Vec<Candidate>> {
        Ok(retain_matching(
            &self.snapshot,
            candidates,
            &[Dimension::Fuel, Dimension::CcSlab, Dimension::WattSlab],
            query,
        ))
    }
}
