//! Matching engine for payout eligibility and ranking.
//!
//! This crate provides:
//! - Predicate evaluation primitives (wildcard/comma/exclusion cells,
//!   numeric ranges, date windows)
//! - EligibilityFilter trait and per-dimension filter implementations
//! - MatchPipeline for composing the eligibility conjunction
//! - Rank & group stage with the pan-India OD/TP pairing rule
//! - Result assembly (top-K truncation, explicit no-match)
//!
//! ## Architecture
//! The engine is a single-pass pipeline per query:
//! 1. Filters reduce the candidate set to eligible rows
//! 2. Eligible rows are sorted by payout, paired, ranked and grouped
//! 3. The assembler truncates to the top K groups
//!
//! No state survives a call; concurrent queries share nothing but the
//! immutable snapshot.
//!
//! ## Example Usage
//! ```ignore
//! use matcher::{assemble, rank_and_group, MatchPipeline, PairingRule, DEFAULT_TOP_K};
//!
//! let pipeline = MatchPipeline::standard(snapshot.clone());
//! let eligible = pipeline.apply(candidates, &query)?;
//! let groups = rank_and_group(&snapshot, &eligible, &PairingRule::default());
//! let outcome = assemble(groups, DEFAULT_TOP_K);
//! ```

pub mod assembler;
pub mod dimension;
pub mod filters;
pub mod match_pipeline;
pub mod pairing;
pub mod predicate;
pub mod ranking;
pub mod traits;

// Re-export main types
pub use assembler::{assemble, QuoteOutcome, RankedEntry, DEFAULT_TOP_K};
pub use dimension::Dimension;
pub use match_pipeline::{first_failing_dimension, MatchPipeline};
pub use pairing::{commission_kind, CommissionKind, PairingRule, PAN_INDIA_INSURERS};
pub use predicate::PredicateKind;
pub use ranking::{rank_and_group, PayoutLine, RankedGroup};
pub use traits::EligibilityFilter;
