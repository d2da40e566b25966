//! Server crate for the POSP payout quote engine.
//!
//! This crate contains the orchestrator that coordinates all stages of
//! the quoting pipeline, the row-store seam, and the gRPC service.

pub mod orchestrator;
pub mod service;
pub mod store;

pub use orchestrator::{QuoteError, QuoteOrchestrator, Rejection};
pub use service::QuoteGrpcService;
pub use store::{InMemoryRowStore, RowStore, StoreError};
