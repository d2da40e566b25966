//! The fixed query-field / row-field mapping.
//!
//! Each variant binds one query dimension to the row cell it reads and
//! the predicate evaluation it uses. The exhaustive `match` arms make
//! the mapping a compile-time fact: adding a dimension without wiring
//! its source and semantics refuses to build. This replaces the
//! original system's runtime-patchable field map.

use crate::predicate;
use quote::PayoutQuery;
use rate_store::{parser, RateRow, VehicleCategory};

/// One matching dimension of the eligibility conjunction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    State,
    Rto,
    Category,
    VehicleType,
    Make,
    Model,
    Fuel,
    CcSlab,
    WattSlab,
    BusinessType,
    PolicyType,
    Age,
    Gvw,
    Validity,
}

impl Dimension {
    /// Every dimension, in conjunction order.
    pub const ALL: [Dimension; 14] = [
        Dimension::State,
        Dimension::Rto,
        Dimension::Category,
        Dimension::VehicleType,
        Dimension::Make,
        Dimension::Model,
        Dimension::Fuel,
        Dimension::CcSlab,
        Dimension::WattSlab,
        Dimension::BusinessType,
        Dimension::PolicyType,
        Dimension::Age,
        Dimension::Gvw,
        Dimension::Validity,
    ];

    /// Stable identifier used in diagnostics and explain output.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::State => "state",
            Dimension::Rto => "rto",
            Dimension::Category => "vehicle_category",
            Dimension::VehicleType => "vehicle_type",
            Dimension::Make => "make",
            Dimension::Model => "model",
            Dimension::Fuel => "fuel_type",
            Dimension::CcSlab => "cc_slab",
            Dimension::WattSlab => "watt_slab",
            Dimension::BusinessType => "business_type",
            Dimension::PolicyType => "policy_type",
            Dimension::Age => "vehicle_age",
            Dimension::Gvw => "gvw",
            Dimension::Validity => "date_window",
        }
    }

    /// Is this dimension part of the conjunction for the given query?
    ///
    /// Activation is category-conditional: a dimension the caller's
    /// category does not collect (or the caller left open) poses no
    /// constraint at all.
    pub fn activated(&self, query: &PayoutQuery) -> bool {
        match self {
            Dimension::State => true,
            // "Others" stays active for RTO: it restricts the set to
            // the blanket rows instead of lifting the constraint
            Dimension::Rto => query
                .rto_code
                .as_deref()
                .is_some_and(|c| !c.trim().is_empty() && !c.trim().eq_ignore_ascii_case("n/a")),
            Dimension::Category => true,
            Dimension::VehicleType => !query.vehicle_type.trim().is_empty(),
            Dimension::Make => collects_make_model(query) && provided(&query.make),
            Dimension::Model => collects_make_model(query) && provided(&query.model),
            Dimension::Fuel => provided(&query.fuel_type),
            // CC applies to combustion vehicles, watt to electric ones
            Dimension::CcSlab => provided(&query.cc_slab) && !query.is_ev(),
            Dimension::WattSlab => provided(&query.watt_slab) && query.is_ev(),
            Dimension::BusinessType => true,
            Dimension::PolicyType => !query.policy_type.trim().is_empty(),
            Dimension::Age => true,
            Dimension::Gvw => query.gvw.is_some() && is_gcv_four_wheeler_goods(query),
            Dimension::Validity => true,
        }
    }

    /// Evaluate this dimension's predicate for one row.
    ///
    /// Callers check `activated()` first; an unactivated dimension must
    /// not be evaluated (its query value may be absent).
    pub fn evaluate(&self, row: &RateRow, query: &PayoutQuery) -> bool {
        match self {
            Dimension::State => predicate::state_matches(&row.state, &query.state_code()),
            Dimension::Rto => rto_matches(row, query),
            Dimension::Category => {
                predicate::token_matches(&row.vehicle_category, query.category.as_str())
            }
            Dimension::VehicleType => {
                predicate::token_matches(&row.vehicle_type, &query.vehicle_type)
            }
            Dimension::Make => {
                predicate::token_matches(&row.make, query.make.as_deref().unwrap_or(""))
            }
            Dimension::Model => {
                predicate::token_matches(&row.model, query.model.as_deref().unwrap_or(""))
            }
            Dimension::Fuel => {
                predicate::token_matches(&row.fuel_type, query.fuel_type.as_deref().unwrap_or(""))
            }
            Dimension::CcSlab => {
                predicate::slab_matches(&row.cc_slab, query.cc_slab.as_deref().unwrap_or(""))
            }
            Dimension::WattSlab => {
                predicate::slab_matches(&row.watt_slab, query.watt_slab.as_deref().unwrap_or(""))
            }
            Dimension::BusinessType => {
                predicate::business_matches(&row.business_type, query.business_type)
            }
            Dimension::PolicyType => {
                predicate::token_matches(&row.policy_type, &query.policy_type)
            }
            Dimension::Age => {
                predicate::point_in_range(row.age_min, row.age_max, query.age.years())
            }
            Dimension::Gvw => match query.gvw {
                Some(range) => {
                    predicate::ranges_overlap(row.gvw_min, row.gvw_max, range.min, range.max)
                }
                None => true,
            },
            Dimension::Validity => {
                predicate::date_in_window(row.date_from, row.date_till, query.evaluation_date)
            }
        }
    }
}

/// A value counts as provided unless it is empty or a catch-all token
/// the UI uses for "no preference"
fn provided(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| {
        let t = v.trim();
        !t.is_empty() && !matches!(t.to_lowercase().as_str(), "other" | "others" | "all" | "n/a")
    })
}

/// Categories that collect make/model, minus the sub-types explicitly
/// excluded from make/model collection.
fn collects_make_model(query: &PayoutQuery) -> bool {
    let vehicle_type = query.vehicle_type.to_lowercase();
    match query.category {
        VehicleCategory::TwoWheeler | VehicleCategory::PrivateCar => true,
        VehicleCategory::Gcv => !vehicle_type.contains("flatbed"),
        VehicleCategory::Pcv => !vehicle_type.contains("bus"),
        VehicleCategory::Misc => false,
    }
}

/// GVW is only collected for goods carriers on four wheels
fn is_gcv_four_wheeler_goods(query: &PayoutQuery) -> bool {
    query.category == VehicleCategory::Gcv
        && query.vehicle_type.to_lowercase().contains("4 wheeler")
}

fn rto_matches(row: &RateRow, query: &PayoutQuery) -> bool {
    let raw = query.rto_code.as_deref().unwrap_or("");
    if raw.trim().eq_ignore_ascii_case("others") {
        // "Others" reaches only the blanket rows with no carve-outs
        return row.rto.is_unrestricted();
    }
    match parser::normalize_rto_token(raw) {
        Some(code) => row.rto.covers(&code),
        None => false,
    }
}
