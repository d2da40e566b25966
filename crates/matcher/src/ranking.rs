//! Rank & group stage.
//!
//! A pure function over the eligible-row sequence:
//! 1. Sort by payout descending; ties keep import order (the sort is
//!    stable and candidates arrive in import order)
//! 2. Fold the sorted rows into display units (OD/TP pairing)
//! 3. Assign ranks: a stored override wins, otherwise the unit's
//!    1-based sorted position
//! 4. Merge units sharing (company, rank) into one display group

use crate::pairing::PairingRule;
use quote::Candidate;
use rate_store::{RateSnapshot, RowId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// One condition line of a display group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutLine {
    pub condition: String,
    pub payout: f64,
    /// Originating row, kept for diagnostics
    pub row_id: RowId,
}

/// One display group: everything shown under a single rank number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedGroup {
    pub rank: u32,
    pub company: String,
    pub lines: Vec<PayoutLine>,
}

/// Sort, pair, rank and group the eligible rows.
pub fn rank_and_group(
    snapshot: &RateSnapshot,
    eligible: &[Candidate],
    pairing: &PairingRule,
) -> Vec<RankedGroup> {
    let mut rows: Vec<_> = eligible
        .iter()
        .filter_map(|c| snapshot.get_row(c.row_id))
        .collect();
    // Stable sort: equal payouts stay in import order
    rows.sort_by(|a, b| b.payout.partial_cmp(&a.payout).unwrap_or(Ordering::Equal));

    let units = pairing.pair(&rows);

    let mut groups: Vec<RankedGroup> = Vec::new();
    let mut index: HashMap<(String, u32), usize> = HashMap::new();
    for (pos, unit) in units.iter().enumerate() {
        let rank = unit
            .rows
            .iter()
            .find_map(|r| r.rank_override)
            .unwrap_or((pos + 1) as u32);
        let company = unit.primary().company.trim().to_string();
        let key = (company.to_lowercase(), rank);

        let lines = unit.rows.iter().map(|r| PayoutLine {
            condition: r.condition.trim().to_string(),
            payout: r.payout,
            row_id: r.row_id,
        });
        match index.get(&key) {
            Some(&i) => groups[i].lines.extend(lines),
            None => {
                index.insert(key, groups.len());
                groups.push(RankedGroup {
                    rank,
                    company,
                    lines: lines.collect(),
                });
            }
        }
    }
    groups
}
