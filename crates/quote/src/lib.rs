//! # Quote Crate
//!
//! This crate implements the query side of the payout engine: the
//! resolved request, its validation, and candidate selection.
//!
//! ## Components
//!
//! ### PayoutQuery
//! One resolved request from the POSP form:
//! - Every cascading dropdown already settled by the UI collaborator
//! - Optional dimensions are `None` for categories that don't collect them
//! - Consumed once, never mutated
//!
//! ### Validation
//! Domain checks that run before any row scan:
//! - Required fields for the resolved category
//! - GVW within 0..=50 tons, age within 1..=50
//! - CC/watt slab consistent with the fuel type
//!
//! ### CandidateSelector
//! Pulls the category partition out of the shared snapshot as the
//! candidate set for matching.
//!
//! ## Example Usage
//!
//! ```ignore
//! use quote::{request, CandidateSelector, PayoutQuery, VehicleAge};
//! use rate_store::{BusinessType, RateSnapshot, VehicleCategory};
//! use std::sync::Arc;
//!
//! let snapshot = Arc::new(RateSnapshot::load_from_file("data/rates.tsv".as_ref())?);
//!
//! let mut query = PayoutQuery::new(
//!     "Tamil Nadu",
//!     VehicleCategory::TwoWheeler,
//!     "Bike",
//!     BusinessType::Old,
//!     "Package",
//! );
//! query.fuel_type = Some("Petrol".to_string());
//! query.age = VehicleAge::Years(3);
//!
//! request::validate(&query)?;
//! let candidates = CandidateSelector::new(snapshot).get_candidates(&query);
//! ```

// Public modules
pub mod types;
pub mod request;
pub mod selector;

// Re-export commonly used types
pub use request::ValidationError;
pub use selector::CandidateSelector;
pub use types::{
    is_ev_fuel, normalize_state, Candidate, GvwRange, PayoutQuery, VehicleAge, GVW_LIMIT_TONS,
    RTO_ENABLED_STATES,
};

#[cfg(test)]
mod tests {
    use super::*;
    use rate_store::{BusinessType, VehicleCategory};

    #[test]
    fn test_candidate_creation() {
        let candidate = Candidate::new(7, 33.5);
        assert_eq!(candidate.row_id, 7);
        assert_eq!(candidate.payout, 33.5);
    }

    #[test]
    fn test_query_state_code() {
        let query = PayoutQuery::new(
            "Tamil Nadu",
            VehicleCategory::PrivateCar,
            "Sedan",
            BusinessType::New,
            "Bundle(1+3)",
        );
        assert_eq!(query.state_code(), "TN");
    }

    #[test]
    fn test_query_is_ev() {
        let mut query = PayoutQuery::new(
            "KL",
            VehicleCategory::TwoWheeler,
            "Scooter",
            BusinessType::Old,
            "Package",
        );
        assert!(!query.is_ev());
        query.fuel_type = Some("EV".to_string());
        assert!(query.is_ev());
    }
}
