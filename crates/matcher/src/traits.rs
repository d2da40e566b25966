//! Core traits for the eligibility pipeline.
//!
//! This module defines the EligibilityFilter trait that allows
//! composable, extensible filters to be applied to candidate sets.

use anyhow::Result;
use quote::{Candidate, PayoutQuery};

/// Core trait for filtering candidate rows.
///
/// All filters must implement this trait to be used in the MatchPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be used in concurrent contexts
/// - Filters take ownership of the Vec<Candidate> and return a filtered Vec
/// - This allows for efficient reduction without unnecessary cloning
pub trait EligibilityFilter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `query` - The resolved payout query being matched
    ///
    /// # Returns
    /// * `Ok(Vec<Candidate>)` - The candidates whose rows survive this filter
    /// * `Err` - If filtering fails
    fn apply(
        &self,
        candidates: Vec<Candidate>,
        query: &PayoutQuery,
    ) -> Result<Vec<Candidate>>;
}
