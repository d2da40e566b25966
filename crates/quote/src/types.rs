//! Query-side types: the resolved request and the candidate handle.
//!
//! A `PayoutQuery` is the engine's view of one submitted form after the
//! UI collaborator has resolved every cascading dropdown. It is built
//! fresh per request and never mutated.

use chrono::{Local, NaiveDate};
use rate_store::{BusinessType, RowId, VehicleCategory};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// States whose callers pick an RTO code from a dropdown.
/// Everyone else submits without one.
pub const RTO_ENABLED_STATES: [&str; 7] = ["TN", "KA", "KL", "AP", "MH", "TS", "PY"];

/// Upper bound of the GVW input domain in tons.
/// The caller clamps anything heavier down to this before submitting.
pub const GVW_LIMIT_TONS: f64 = 50.0;

/// One row selected for evaluation against a query.
///
/// Carries the payout so the ranking stage never has to chase the
/// snapshot again for its sort key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub row_id: RowId,
    pub payout: f64,
}

impl Candidate {
    pub fn new(row_id: RowId, payout: f64) -> Self {
        Self { row_id, payout }
    }
}

/// Vehicle age as submitted: the "New" sentinel or a year count.
///
/// Rust concept: enums with data model "one of several shapes" cleanly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleAge {
    New,
    Years(u8),
}

impl VehicleAge {
    /// Numeric age used for range matching.
    ///
    /// A brand-new vehicle matches the same rows as a one-year-old one;
    /// the UI enforces the same equivalence for business type.
    pub fn years(&self) -> u32 {
        match self {
            VehicleAge::New => 1,
            VehicleAge::Years(n) => *n as u32,
        }
    }
}

impl fmt::Display for VehicleAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleAge::New => write!(f, "New"),
            VehicleAge::Years(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for VehicleAge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.eq_ignore_ascii_case("new") {
            return Ok(VehicleAge::New);
        }
        t.parse::<u8>()
            .map(VehicleAge::Years)
            .map_err(|_| format!("invalid vehicle age: {t}"))
    }
}

/// Inclusive GVW interval in tons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GvwRange {
    pub min: f64,
    pub max: f64,
}

impl GvwRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A single entered value is the degenerate interval [v, v]
    pub fn point(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }
}

/// One resolved payout query.
///
/// Optional fields are `None` when the caller's category does not
/// collect them; an omitted dimension is simply never activated during
/// matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutQuery {
    /// State code ("TN") or display name ("Tamil Nadu")
    pub state: String,
    pub rto_code: Option<String>,
    pub category: VehicleCategory,
    pub vehicle_type: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub fuel_type: Option<String>,
    pub cc_slab: Option<String>,
    pub watt_slab: Option<String>,
    pub gvw: Option<GvwRange>,
    pub age: VehicleAge,
    pub business_type: BusinessType,
    pub policy_type: String,
    pub evaluation_date: NaiveDate,
}

impl PayoutQuery {
    /// Create a query with the always-collected dimensions; optional
    /// dimensions start as `None` and are set directly on the fields.
    pub fn new(
        state: impl Into<String>,
        category: VehicleCategory,
        vehicle_type: impl Into<String>,
        business_type: BusinessType,
        policy_type: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            rto_code: None,
            category,
            vehicle_type: vehicle_type.into(),
            make: None,
            model: None,
            fuel_type: None,
            cc_slab: None,
            watt_slab: None,
            gvw: None,
            age: VehicleAge::New,
            business_type,
            policy_type: policy_type.into(),
            evaluation_date: Local::now().date_naive(),
        }
    }

    /// State as the two/three-letter code the rate sheets use
    pub fn state_code(&self) -> String {
        normalize_state(&self.state)
    }

    /// Is the resolved fuel dimension electric?
    pub fn is_ev(&self) -> bool {
        self.fuel_type.as_deref().is_some_and(is_ev_fuel)
    }
}

/// Fuel tokens that count as electric
pub fn is_ev_fuel(fuel: &str) -> bool {
    let t = fuel.trim();
    t.eq_ignore_ascii_case("ev") || t.eq_ignore_ascii_case("electric")
}

/// Normalize a state display name to the code stored in rate sheets.
///
/// Callers may pass either form; unknown values pass through unchanged
/// (upper-cased when they already look like a code).
pub fn normalize_state(state: &str) -> String {
    let t = state.trim();
    match t.to_lowercase().as_str() {
        "tamil nadu" => "TN".to_string(),
        "kerala" => "KL".to_string(),
        "karnataka" => "KA".to_string(),
        "puducherry" | "pondicherry" => "PY".to_string(),
        "telangana" => "TS".to_string(),
        "andhra pradesh" => "AP".to_string(),
        "maharashtra" => "MH".to_string(),
        "madhya pradesh" => "MP".to_string(),
        "assam" => "AS".to_string(),
        "haryana" => "HR".to_string(),
        "rajasthan" => "RJ".to_string(),
        "uttar pradesh" => "UP".to_string(),
        "others" => "Others".to_string(),
        _ => {
            if t.len() <= 3 && t.chars().all(|c| c.is_ascii_alphabetic()) {
                t.to_uppercase()
            } else {
                t.to_string()
            }
        }
    }
}
