//! Core domain types for the payout rate sheets.
//!
//! This module defines the fundamental data structures used throughout the system.
//! Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (RowId)
//! - Structs with public fields
//! - Enums for fixed sets of values
//! - Derive macros for common traits
//! - BTreeMap for the typed extension map

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and keep ranking ties deterministic

/// Identifier of a rate row, equal to its position in import order.
///
/// Ranking ties are broken by import order, so the id doubles as the
/// stable tie-break key.
pub type RowId = u32;

// =============================================================================
// Closed Vocabularies
// =============================================================================

/// Vehicle category - demonstrates Rust enums for fixed value sets
///
/// The rate sheets use both codes ("GCV") and display names
/// ("Goods Carrying Vehicle"); `FromStr` accepts either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleCategory {
    TwoWheeler,
    PrivateCar,
    Gcv,
    Pcv,
    Misc,
}

impl VehicleCategory {
    /// All categories, in the order the import files are delivered
    pub const ALL: [VehicleCategory; 5] = [
        VehicleCategory::TwoWheeler,
        VehicleCategory::PrivateCar,
        VehicleCategory::Gcv,
        VehicleCategory::Pcv,
        VehicleCategory::Misc,
    ];

    /// Canonical token as stored in the rate sheets
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCategory::TwoWheeler => "Two Wheeler",
            VehicleCategory::PrivateCar => "Private Car",
            VehicleCategory::Gcv => "GCV",
            VehicleCategory::Pcv => "PCV",
            VehicleCategory::Misc => "Misc",
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VehicleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept codes, display names and hyphenated UI variants
        match s.trim().to_lowercase().replace('-', " ").as_str() {
            "two wheeler" | "twowheeler" => Ok(VehicleCategory::TwoWheeler),
            "private car" => Ok(VehicleCategory::PrivateCar),
            "gcv" | "goods carrying vehicle" => Ok(VehicleCategory::Gcv),
            "pcv" | "passenger carrying vehicle" => Ok(VehicleCategory::Pcv),
            "misc" | "miscellaneous" => Ok(VehicleCategory::Misc),
            other => Err(format!("unknown vehicle category: {other}")),
        }
    }
}

/// Business type of the request.
///
/// Renewal and Rollover are matching-equivalent to Old: rate sheets only
/// ever distinguish fresh business ("New") from everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessType {
    New,
    Old,
    Renewal,
    Rollover,
}

impl BusinessType {
    /// Canonical matching token: "new" or "old"
    pub fn canonical(&self) -> &'static str {
        match self {
            BusinessType::New => "new",
            _ => "old",
        }
    }
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BusinessType::New => "New",
            BusinessType::Old => "Old",
            BusinessType::Renewal => "Renewal",
            BusinessType::Rollover => "Rollover",
        };
        write!(f, "{s}")
    }
}

impl FromStr for BusinessType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(BusinessType::New),
            "old" => Ok(BusinessType::Old),
            "renewal" => Ok(BusinessType::Renewal),
            "rollover" => Ok(BusinessType::Rollover),
            other => Err(format!("unknown business type: {other}")),
        }
    }
}

// =============================================================================
// RTO Rule
// =============================================================================

/// Jurisdiction rule decomposed from the raw RTO_Code cell at parse time.
///
/// - blank cell            -> applies to every RTO
/// - "Except 01,02"        -> applies to every RTO but the listed ones
/// - "01,02,03"            -> applies only to the listed codes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RtoRule {
    pub applies_all: bool,
    pub included: Vec<String>,
    pub excluded: Vec<String>,
}

impl RtoRule {
    /// Rule that applies to every RTO (blank cell)
    pub fn applies_to_all() -> Self {
        Self {
            applies_all: true,
            included: Vec::new(),
            excluded: Vec::new(),
        }
    }

    /// Does this rule cover the given (normalized) RTO code?
    pub fn covers(&self, code: &str) -> bool {
        if self.applies_all {
            !self.excluded.iter().any(|c| c.eq_ignore_ascii_case(code))
        } else {
            self.included.iter().any(|c| c.eq_ignore_ascii_case(code))
        }
    }

    /// True for the blanket rule with no carve-outs.
    ///
    /// A query for RTO "Others" matches exactly these rows.
    pub fn is_unrestricted(&self) -> bool {
        self.applies_all && self.excluded.is_empty()
    }
}

// =============================================================================
// RateRow - One Eligibility Offer
// =============================================================================

/// A single payout offer from one insurer.
///
/// String cells keep the import collaborator's normalized shape (blank,
/// exact token, comma list, or `Except ...` exclusion list); the matcher
/// infers the predicate kind from the shape. Numeric and date cells are
/// parsed into typed fields up front so a corrupt row is rejected at load
/// time instead of silently matching.
///
/// Rust concepts:
/// - `Option<T>` for cells the sheet leaves open-ended
/// - `BTreeMap` for the extension map (stable iteration order)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRow {
    /// Import-order id, also the ranking tie-break key
    pub row_id: RowId,
    /// Insurer name, e.g. "National Insurance"
    pub company: String,

    // Predicate cells, normalized strings (blank = wildcard)
    pub state: String,
    pub vehicle_category: String,
    pub vehicle_type: String,
    pub make: String,
    pub model: String,
    pub fuel_type: String,
    pub cc_slab: String,
    pub watt_slab: String,
    pub business_type: String,
    pub policy_type: String,

    /// Jurisdiction rule, decomposed from the RTO_Code cell
    pub rto: RtoRule,

    // Numeric ranges, inclusive; `None` = open on that side
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub gvw_min: Option<f64>,
    pub gvw_max: Option<f64>,

    // Validity window; `None` = open on that side
    pub date_from: Option<NaiveDate>,
    pub date_till: Option<NaiveDate>,

    /// Payout percentage (55.0 means 55%)
    pub payout: f64,
    /// Free-text condition, e.g. "Commission on OD"
    pub condition: String,
    /// Stored rank override; when present it replaces the computed rank
    pub rank_override: Option<u32>,

    /// Extension map for sheet columns with no dedicated field.
    ///
    /// A dedicated typed field always wins over a same-named entry here;
    /// see [`RateRow::attr`].
    pub extras: BTreeMap<String, String>,
}

impl RateRow {
    /// Look up an attribute by sheet column name.
    ///
    /// Dedicated fields take precedence over the extension map, so an
    /// importer that writes "State" into both places can never shadow
    /// the typed value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        let dedicated = match name {
            "Company" => Some(self.company.as_str()),
            "State" => Some(self.state.as_str()),
            "Vehicle_Category" => Some(self.vehicle_category.as_str()),
            "Vehicle_Type" => Some(self.vehicle_type.as_str()),
            "Make" => Some(self.make.as_str()),
            "Model" => Some(self.model.as_str()),
            "Fuel_Type" => Some(self.fuel_type.as_str()),
            "CC_Slab" => Some(self.cc_slab.as_str()),
            "Watt_Slab" => Some(self.watt_slab.as_str()),
            "Business_Type" => Some(self.business_type.as_str()),
            "Policy_Type" => Some(self.policy_type.as_str()),
            "Conditions" => Some(self.condition.as_str()),
            _ => None,
        };
        dedicated.or_else(|| self.extras.get(name).map(|s| s.as_str()))
    }

    /// True when the condition text is empty or a placeholder token
    pub fn has_condition(&self) -> bool {
        let t = self.condition.trim();
        !(t.is_empty() || t.eq_ignore_ascii_case("no") || t.eq_ignore_ascii_case("n/a"))
    }
}
