//! The immutable in-memory rate snapshot.
//!
//! This is the heart of the rate-store crate. A snapshot owns every rate
//! row of one completed import, a per-category partition used for fast
//! candidate selection, and the derived distinct-value projections that
//! feed selection dropdowns.
//!
//! A snapshot is never mutated after `finalize()`: the serving path only
//! ever reads it through an `Arc`, and a new import publishes a whole new
//! snapshot instead of touching this one.
//!
//! Rust concepts demonstrated:
//! - HashMap<K, V> for O(1) partition lookups
//! - Borrowing: methods return `&T` (references) not `T` (owned values)
//! - Derived data rebuilt in one place instead of mutable global caches

use crate::error::Result;
use crate::parser;
use crate::types::{RateRow, RowId, VehicleCategory};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::info;

/// Load-time counters, surfaced for diagnostics only.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotDiagnostics {
    /// Rows accepted into the snapshot
    pub total_rows: usize,
    /// Rows rejected at load time (unparsable numeric/date cells,
    /// missing mandatory cells). Never an error: a rejected row is
    /// simply absent from every result.
    pub skipped_rows: usize,
}

/// Distinct selectable values derived from the row snapshot.
///
/// This is the replacement for the original system's free-floating
/// dropdown caches: a read-only projection recomputed whenever a
/// snapshot is built, never patched in place.
#[derive(Debug, Clone, Default)]
pub struct Projections {
    pub companies: Vec<String>,
    pub states: Vec<String>,
    pub vehicle_categories: Vec<String>,
    pub vehicle_types: HashMap<VehicleCategory, Vec<String>>,
    pub fuel_types: Vec<String>,
    pub policy_types: Vec<String>,
    pub business_types: Vec<String>,
    pub makes: Vec<String>,
    pub models: Vec<String>,
}

/// Immutable rate-row snapshot plus its derived indices.
#[derive(Debug, Default)]
pub struct RateSnapshot {
    rows: Vec<RateRow>,
    /// Row ids per vehicle category, in import order. A row whose
    /// category cell is blank (or an exclusion that doesn't name the
    /// category) appears under every category it can serve.
    by_category: HashMap<VehicleCategory, Vec<RowId>>,
    projections: Projections,
    diagnostics: SnapshotDiagnostics,
}

impl RateSnapshot {
    /// Creates a new, empty snapshot (used by tests and importers)
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a rate sheet from disk and build a finalized snapshot
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let parsed = parser::parse_rates(path)?;
        let skipped = parsed.skipped;
        let mut snapshot = Self::from_rows(parsed.rows, skipped);
        snapshot.finalize();
        info!(
            "Loaded rate snapshot from {}: {} rows ({} skipped)",
            path.display(),
            snapshot.diagnostics.total_rows,
            skipped
        );
        Ok(snapshot)
    }

    /// Build a snapshot from already-parsed rows (not yet finalized)
    pub fn from_rows(rows: Vec<RateRow>, skipped: usize) -> Self {
        Self {
            diagnostics: SnapshotDiagnostics {
                total_rows: rows.len(),
                skipped_rows: skipped,
            },
            rows,
            by_category: HashMap::new(),
            projections: Projections::default(),
        }
    }

    /// Insert a row, assigning the next import-order id.
    ///
    /// Call `finalize()` once all rows are in.
    pub fn insert_row(&mut self, mut row: RateRow) -> RowId {
        let id = self.rows.len() as RowId;
        row.row_id = id;
        self.rows.push(row);
        self.diagnostics.total_rows = self.rows.len();
        id
    }

    /// Rebuild the category partition and the distinct-value
    /// projections. Idempotent; must run before the snapshot serves.
    pub fn finalize(&mut self) {
        self.by_category = build_category_partition(&self.rows);
        self.projections = build_projections(&self.rows);
    }

    // Getters - Note: These return references (&T) not owned values (T)

    /// Get a row by id
    pub fn get_row(&self, id: RowId) -> Option<&RateRow> {
        self.rows.get(id as usize)
    }

    /// All rows in import order
    pub fn rows(&self) -> &[RateRow] {
        &self.rows
    }

    /// Row ids serving the given category, in import order.
    ///
    /// Returns an empty slice for a category with no rows.
    pub fn category_rows(&self, category: VehicleCategory) -> &[RowId] {
        self.by_category
            .get(&category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn projections(&self) -> &Projections {
        &self.projections
    }

    pub fn diagnostics(&self) -> SnapshotDiagnostics {
        self.diagnostics
    }

    /// Row count (for logging/validation)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Which categories can this row's Vehicle_Category cell serve?
fn row_categories(cell: &str) -> Vec<VehicleCategory> {
    let t = cell.trim();
    if t.is_empty() || t.eq_ignore_ascii_case("all") || t.eq_ignore_ascii_case("n/a") {
        return VehicleCategory::ALL.to_vec();
    }
    let low = t.to_lowercase();
    if let Some(rest) = low
        .strip_prefix("except ")
        .or_else(|| low.strip_prefix("declined "))
    {
        let excluded: Vec<VehicleCategory> = rest
            .split(',')
            .filter_map(|tok| tok.trim().parse().ok())
            .collect();
        return VehicleCategory::ALL
            .into_iter()
            .filter(|c| !excluded.contains(c))
            .collect();
    }
    t.split(',')
        .filter_map(|tok| tok.trim().parse().ok())
        .collect()
}

fn build_category_partition(rows: &[RateRow]) -> HashMap<VehicleCategory, Vec<RowId>> {
    let mut partition: HashMap<VehicleCategory, Vec<RowId>> = HashMap::new();
    for row in rows {
        for category in row_categories(&row.vehicle_category) {
            partition.entry(category).or_default().push(row.row_id);
        }
    }
    partition
}

/// Tokens that never surface as selectable values
fn is_hidden_token(token: &str) -> bool {
    let low = token.to_lowercase();
    matches!(low.as_str(), "" | "all" | "all make" | "n/a" | "no")
}

/// Split one predicate cell into selectable single values.
///
/// Comma cells contribute each token separately ("Petrol,Diesel" shows
/// as Petrol and Diesel, never as one combined option); exclusion cells
/// contribute nothing (their tokens are carve-outs, not offers).
fn selectable_tokens(cell: &str) -> Vec<&str> {
    let t = cell.trim();
    let low = t.to_lowercase();
    if low.starts_with("except ") || low.starts_with("declined ") {
        return Vec::new();
    }
    t.split(',')
        .map(str::trim)
        .filter(|tok| !is_hidden_token(tok))
        .collect()
}

/// Collect distinct tokens over one cell per row, case-insensitively
fn distinct_values<'a, F>(rows: &'a [RateRow], cell: F) -> Vec<String>
where
    F: Fn(&'a RateRow) -> &'a str,
{
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for row in rows {
        for token in selectable_tokens(cell(row)) {
            if seen.insert(token.to_lowercase()) {
                out.push(token.to_string());
            }
        }
    }
    out.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
    out
}

fn build_projections(rows: &[RateRow]) -> Projections {
    let mut states = distinct_values(rows, |r| r.state.as_str());
    // "Others" is always selectable: it is how a caller outside every
    // listed state reaches the catch-all rows.
    if !states.iter().any(|s| s.eq_ignore_ascii_case("others")) {
        states.push("Others".to_string());
    }

    let mut vehicle_types: HashMap<VehicleCategory, Vec<String>> = HashMap::new();
    for category in VehicleCategory::ALL {
        let mut seen = BTreeSet::new();
        let mut types = Vec::new();
        for row in rows {
            if !row_categories(&row.vehicle_category).contains(&category) {
                continue;
            }
            for token in selectable_tokens(&row.vehicle_type) {
                if seen.insert(token.to_lowercase()) {
                    types.push(token.to_string());
                }
            }
        }
        types.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
        if !types.is_empty() {
            vehicle_types.insert(category, types);
        }
    }

    Projections {
        companies: distinct_values(rows, |r| r.company.as_str()),
        states,
        vehicle_categories: distinct_values(rows, |r| r.vehicle_category.as_str()),
        vehicle_types,
        fuel_types: distinct_values(rows, |r| r.fuel_type.as_str()),
        policy_types: distinct_values(rows, |r| r.policy_type.as_str()),
        business_types: distinct_values(rows, |r| r.business_type.as_str()),
        makes: distinct_values(rows, |r| r.make.as_str()),
        models: distinct_values(rows, |r| r.model.as_str()),
    }
}
