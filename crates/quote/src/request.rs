//! Request validation for resolved payout queries.
//!
//! Validation runs once, before any row is scanned: a query that fails
//! here is answered immediately and never partially evaluated. Only
//! domain rules live here — cross-field locking (age vs. business type,
//! bundle policies) is the UI collaborator's job and is not re-derived.

use crate::types::{GvwRange, PayoutQuery, VehicleAge, GVW_LIMIT_TONS, RTO_ENABLED_STATES};
use thiserror::Error;

/// A query the engine refuses to evaluate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field for {category}: {field}")]
    MissingField {
        category: String,
        field: &'static str,
    },

    #[error("GVW must be between 0 and {GVW_LIMIT_TONS} tons, got {value}")]
    GvwOutOfRange { value: f64 },

    #[error("Vehicle age must be New or 1..=50, got {age}")]
    AgeOutOfRange { age: u32 },

    #[error("{slab} does not apply to fuel type {fuel:?}")]
    SlabFuelMismatch {
        slab: &'static str,
        fuel: Option<String>,
    },

    #[error("RTO codes are not collected for state {state}")]
    RtoNotCollected { state: String },
}

/// Validate a resolved query against its category's input contract.
pub fn validate(query: &PayoutQuery) -> Result<(), ValidationError> {
    let missing = |field: &'static str| ValidationError::MissingField {
        category: query.category.to_string(),
        field,
    };

    if query.state.trim().is_empty() {
        return Err(missing("state"));
    }
    if query.vehicle_type.trim().is_empty() {
        return Err(missing("vehicle_type"));
    }
    if query.policy_type.trim().is_empty() {
        return Err(missing("policy_type"));
    }

    if let VehicleAge::Years(n) = query.age {
        if n == 0 || n > 50 {
            return Err(ValidationError::AgeOutOfRange { age: n as u32 });
        }
    }

    if let Some(GvwRange { min, max }) = query.gvw {
        if !(0.0..=GVW_LIMIT_TONS).contains(&min) || min > max {
            return Err(ValidationError::GvwOutOfRange { value: min });
        }
        if !(0.0..=GVW_LIMIT_TONS).contains(&max) {
            return Err(ValidationError::GvwOutOfRange { value: max });
        }
    }

    // CC and watt slabs are mutually exclusive by fuel: a petrol bike
    // has no watt rating, an EV has no cubic capacity.
    if query.cc_slab.is_some() && query.is_ev() {
        return Err(ValidationError::SlabFuelMismatch {
            slab: "cc_slab",
            fuel: query.fuel_type.clone(),
        });
    }
    if query.watt_slab.is_some() && !query.is_ev() {
        return Err(ValidationError::SlabFuelMismatch {
            slab: "watt_slab",
            fuel: query.fuel_type.clone(),
        });
    }

    if query.rto_code.is_some() {
        let code = query.state_code();
        let enabled = RTO_ENABLED_STATES
            .iter()
            .any(|s| s.eq_ignore_ascii_case(&code));
        if !enabled {
            return Err(ValidationError::RtoNotCollected { state: code });
        }
    }

    Ok(())
}
