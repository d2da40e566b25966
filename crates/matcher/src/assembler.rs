//! Result assembly: top-K truncation and the caller-facing outcome.

use crate::ranking::{PayoutLine, RankedGroup};
use serde::{Deserialize, Serialize};

/// Default number of display groups returned to the caller.
pub const DEFAULT_TOP_K: usize = 5;

/// One caller-facing result entry: a rank, a company and its condition
/// lines. Transient — built per response, discarded afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub rank: u32,
    pub company: String,
    pub lines: Vec<PayoutLine>,
}

/// The outcome of one well-formed query.
///
/// `NoMatch` is success-shaped, not an error: the query evaluated fine,
/// zero rows were eligible. Upstream failures never take this form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuoteOutcome {
    Matches { entries: Vec<RankedEntry> },
    NoMatch { message: String },
}

impl QuoteOutcome {
    pub fn is_no_match(&self) -> bool {
        matches!(self, QuoteOutcome::NoMatch { .. })
    }

    /// Entries of a matching outcome; empty for no-match.
    pub fn entries(&self) -> &[RankedEntry] {
        match self {
            QuoteOutcome::Matches { entries } => entries,
            QuoteOutcome::NoMatch { .. } => &[],
        }
    }
}

/// Truncate the grouped sequence to the top K groups, in rank order.
///
/// Groups are emitted whole or not at all; a group's lines are already
/// complete by the time it reaches this stage.
pub fn assemble(mut groups: Vec<RankedGroup>, top_k: usize) -> QuoteOutcome {
    if groups.is_empty() {
        return QuoteOutcome::NoMatch {
            message: "No matching payout offers for this combination.".to_string(),
        };
    }
    // Stable: equal ranks keep their payout order
    groups.sort_by_key(|g| g.rank);
    groups.truncate(top_k);
    QuoteOutcome::Matches {
        entries: groups
            .into_iter()
            .map(|g| RankedEntry {
                rank: g.rank,
                company: g.company,
                lines: g.lines,
            })
            .collect(),
    }
}
