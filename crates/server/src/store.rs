//! The row-store seam between the import path and the serving path.
//!
//! The engine never talks to storage directly; it asks a `RowStore`
//! for the current snapshot. A failing store is its own error kind —
//! a caller must always be able to tell "no eligible rows" apart from
//! "could not get the rows at all".

use rate_store::RateSnapshot;
use std::path::Path;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::info;

/// Errors from the row-store collaborator.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// The store cannot supply a snapshot. Fatal to the request; the
    /// engine does not retry — retry policy belongs to the caller.
    #[error("Rate snapshot unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the full candidate snapshot for a query.
///
/// Implementations must hand out complete snapshots only — the engine
/// assumes it sees every candidate row, never a partial page.
pub trait RowStore: Send + Sync {
    fn snapshot(&self) -> Result<Arc<RateSnapshot>, StoreError>;
}

/// In-memory store with atomic snapshot publication.
///
/// Serving reads clone the `Arc` and keep the snapshot they started
/// with; an import builds a fresh snapshot offline and swaps it in with
/// `publish`. Readers and the importer never share a mutable snapshot.
pub struct InMemoryRowStore {
    current: RwLock<Option<Arc<RateSnapshot>>>,
}

impl InMemoryRowStore {
    /// A store with no published import yet: every snapshot request
    /// fails as unavailable.
    pub fn empty() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    pub fn with_snapshot(snapshot: Arc<RateSnapshot>) -> Self {
        Self {
            current: RwLock::new(Some(snapshot)),
        }
    }

    /// Load a rate sheet from disk and publish it.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let snapshot = RateSnapshot::load_from_file(path)?;
        Ok(Self::with_snapshot(Arc::new(snapshot)))
    }

    /// Atomically replace the served snapshot.
    ///
    /// In-flight requests keep the snapshot they already hold.
    pub fn publish(&self, snapshot: Arc<RateSnapshot>) {
        let rows = snapshot.len();
        if let Ok(mut guard) = self.current.write() {
            *guard = Some(snapshot);
            info!("Published new rate snapshot with {} rows", rows);
        }
    }
}

impl RowStore for InMemoryRowStore {
    fn snapshot(&self) -> Result<Arc<RateSnapshot>, StoreError> {
        let guard = self
            .current
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        guard
            .clone()
            .ok_or_else(|| StoreError::Unavailable("no completed import published".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rate_store::{RateRow, RtoRule};
    use std::collections::BTreeMap;

    fn one_row_snapshot() -> RateSnapshot {
        let mut snapshot = RateSnapshot::new();
        snapshot.insert_row(RateRow {
            row_id: 0,
            company: "Shriram".to_string(),
            state: String::new(),
            vehicle_category: String::new(),
            vehicle_type: String::new(),
            make: String::new(),
            model: String::new(),
            fuel_type: String::new(),
            cc_slab: String::new(),
            watt_slab: String::new(),
            business_type: String::new(),
            policy_type: String::new(),
            rto: RtoRule::applies_to_all(),
            age_min: None,
            age_max: None,
            gvw_min: None,
            gvw_max: None,
            date_from: None,
            date_till: None,
            payout: 10.0,
            condition: String::new(),
            rank_override: None,
            extras: BTreeMap::new(),
        });
        snapshot.finalize();
        snapshot
    }

    #[test]
    fn test_empty_store_is_unavailable() {
        let store = InMemoryRowStore::empty();
        assert!(matches!(
            store.snapshot(),
            Err(StoreError::Unavailable(_))
        ));
    }

    #[test]
    fn test_publish_swaps_snapshot() {
        let store = InMemoryRowStore::empty();
        let mut snapshot = RateSnapshot::new();
        snapshot.finalize();
        store.publish(Arc::new(snapshot));
        assert!(store.snapshot().is_ok());
    }

    #[test]
    fn test_readers_keep_their_snapshot() {
        let store = InMemoryRowStore::with_snapshot(Arc::new(one_row_snapshot()));

        let held = store.snapshot().unwrap();
        let mut empty = RateSnapshot::new();
        empty.finalize();
        store.publish(Arc::new(empty));

        // The held Arc still points at the snapshot the reader started with
        assert_eq!(held.len(), 1);
        assert_eq!(store.snapshot().unwrap().len(), 0);
    }
}
