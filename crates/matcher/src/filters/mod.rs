//! Filter implementations for the eligibility pipeline.
//!
//! Each filter owns one family of dimensions and reduces the candidate
//! set to the rows whose activated predicates all hold. Chained
//! together they form the full eligibility conjunction.

use crate::dimension::Dimension;
use quote::{Candidate, PayoutQuery};
use rate_store::RateSnapshot;

pub mod fuel;
pub mod geography;
pub mod policy;
pub mod validity;
pub mod vehicle;

// Re-export for convenience
pub use fuel::FuelFilter;
pub use geography::GeographyFilter;
pub use policy::PolicyFilter;
pub use validity::ValidityFilter;
pub use vehicle::VehicleFilter;

/// Keep the candidates whose row satisfies every activated dimension.
///
/// A candidate whose row id no longer resolves is dropped: a row we
/// cannot inspect must never surface a payout.
pub(crate) fn retain_matching(
    snapshot: &RateSnapshot,
    candidates: Vec<Candidate>,
    dimensions: &[Dimension],
    query: &PayoutQuery,
) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|candidate| match snapshot.get_row(candidate.row_id) {
            Some(row) => dimensions
                .iter()
                .filter(|dim| dim.activated(query))
                .all(|dim| dim.evaluate(row, query)),
            None => false,
        })
        .collect()
}
