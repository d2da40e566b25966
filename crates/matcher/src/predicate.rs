//! Predicate evaluation primitives.
//!
//! Every rate-sheet cell encodes exactly one predicate, and the kind is
//! inferred from the cell's shape alone:
//!
//! - blank / `All` / `N/A`      -> `Wildcard` (always true, except Business_Type)
//! - `Except X,Y` / `Declined X` -> `Exclusion` (true unless the value is listed)
//! - `X,Y,Z`                    -> `CommaOr` (true if the value is any token)
//! - anything else              -> `Exact`
//!
//! Numeric ranges and date windows are typed fields on the row, so their
//! kinds (`NumericPointInRange`, `NumericOverlap`, `DateWindow`) are fixed
//! by the dimension rather than inferred.
//!
//! All functions here are deterministic and side-effect-free; string
//! comparison is case-insensitive and whitespace-trimmed throughout.

use chrono::NaiveDate;
use rate_store::BusinessType;

/// The predicate vocabulary of a rate row field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateKind {
    Wildcard,
    Exact,
    CommaOr,
    Exclusion,
    NumericPointInRange,
    NumericOverlap,
    DateWindow,
}

/// Does this whole cell read as "applies to everything"?
fn is_wildcard_cell(cell: &str) -> bool {
    let t = cell.trim();
    t.is_empty() || matches!(t.to_lowercase().as_str(), "all" | "all make" | "n/a")
}

/// If the cell carries an exclusion prefix, return the remainder.
///
/// Both prefix spellings appear in real sheets: `Except Bolero,Scorpio`
/// and `Declined TVS`.
pub fn exclusion_rest(cell: &str) -> Option<&str> {
    let t = cell.trim();
    let low = t.to_lowercase();
    if low.starts_with("except ") {
        Some(t[7..].trim_start())
    } else if low.starts_with("declined ") {
        Some(t[9..].trim_start())
    } else {
        None
    }
}

/// Infer the predicate kind of a string cell from its shape.
pub fn classify(cell: &str) -> PredicateKind {
    if is_wildcard_cell(cell) {
        PredicateKind::Wildcard
    } else if exclusion_rest(cell).is_some() {
        PredicateKind::Exclusion
    } else if cell.contains(',') {
        PredicateKind::CommaOr
    } else {
        PredicateKind::Exact
    }
}

fn eq_token(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Evaluate a string predicate cell against one query value.
pub fn token_matches(cell: &str, value: &str) -> bool {
    match classify(cell) {
        PredicateKind::Wildcard => true,
        PredicateKind::Exact => eq_token(cell, value),
        PredicateKind::CommaOr => cell.split(',').any(|t| eq_token(t, value)),
        PredicateKind::Exclusion => {
            let rest = exclusion_rest(cell).unwrap_or("");
            !rest.split(',').any(|t| eq_token(t, value))
        }
        // Numeric/date kinds never appear on string cells; if one ever
        // does, fail closed rather than show a payout we can't justify.
        _ => false,
    }
}

/// Evaluate a CC/watt slab cell.
///
/// Sheets mark a slab column as not applicable with `No`; such a row
/// poses no slab constraint at all.
pub fn slab_matches(cell: &str, value: &str) -> bool {
    if cell.trim().eq_ignore_ascii_case("no") {
        return true;
    }
    token_matches(cell, value)
}

/// Evaluate a state cell, including the query-side `Others` catch-all.
///
/// `Others` means "none of the listed states": it reaches rows with a
/// blank state and rows shaped `Except ...`, but never a row naming
/// explicit states.
pub fn state_matches(cell: &str, query_state: &str) -> bool {
    if query_state.trim().eq_ignore_ascii_case("others") {
        return is_wildcard_cell(cell) || exclusion_rest(cell).is_some();
    }
    token_matches(cell, query_state)
}

/// Evaluate a Business_Type cell.
///
/// Blank is NOT a universal wildcard here: a blank cell serves existing
/// business only (Old / Renewal / Rollover), never New. Explicit cells
/// match with Renewal and Rollover folded into Old.
pub fn business_matches(cell: &str, business: BusinessType) -> bool {
    let t = cell.trim();
    if t.is_empty() {
        return business != BusinessType::New;
    }
    if matches!(t.to_lowercase().as_str(), "all" | "n/a") {
        return true;
    }
    let query_token = business.canonical();
    match classify(t) {
        PredicateKind::Exclusion => {
            let rest = exclusion_rest(t).unwrap_or("");
            !rest.split(',').any(|tok| business_token_is(tok, query_token))
        }
        _ => t.split(',').any(|tok| business_token_is(tok, query_token)),
    }
}

/// Compare one sheet token against the canonical query token,
/// folding renewal/rollover into old
fn business_token_is(token: &str, canonical: &str) -> bool {
    let folded = match token.trim().to_lowercase().as_str() {
        "new" => "new",
        "old" | "renewal" | "rollover" => "old",
        _ => return false,
    };
    folded == canonical
}

/// Inclusive point-in-range check; an absent bound is open on that side.
pub fn point_in_range(min: Option<u32>, max: Option<u32>, value: u32) -> bool {
    min.is_none_or(|m| m <= value) && max.is_none_or(|m| value <= m)
}

/// Inclusive interval-overlap check for GVW.
///
/// A fully blank row pair is a wildcard; a half-open row range is open
/// on the absent side. Overlap: `row_min <= query_max AND row_max >= query_min`.
pub fn ranges_overlap(
    row_min: Option<f64>,
    row_max: Option<f64>,
    query_min: f64,
    query_max: f64,
) -> bool {
    if row_min.is_none() && row_max.is_none() {
        return true;
    }
    row_min.is_none_or(|x| x <= query_max) && row_max.is_none_or(|y| y >= query_min)
}

/// Date validity window; either end may be open.
pub fn date_in_window(
    from: Option<NaiveDate>,
    till: Option<NaiveDate>,
    date: NaiveDate,
) -> bool {
    from.is_none_or(|f| date >= f) && till.is_none_or(|t| date <= t)
}
