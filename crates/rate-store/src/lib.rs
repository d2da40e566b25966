//! # Rate Store Crate
//!
//! This crate handles loading and indexing normalized payout rate sheets.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (RateRow, RtoRule, VehicleCategory, BusinessType)
//! - **parser**: Parse tab-separated rate sheets into Rust structs
//! - **snapshot**: Build the immutable snapshot with partition + projections
//! - **error**: Error types for sheet loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use rate_store::RateSnapshot;
//! use std::path::Path;
//!
//! // Load one completed import
//! let snapshot = RateSnapshot::load_from_file(Path::new("data/rates.tsv"))?;
//!
//! // Query data
//! let row = snapshot.get_row(0).unwrap();
//! println!("{} pays {}%", row.company, row.payout);
//! println!("{} insurers", snapshot.projections().companies.len());
//! ```
//!
//! ## Learning Goals
//!
//! This crate demonstrates several key Rust concepts:
//!
//! 1. **Ownership and Borrowing**: RateSnapshot owns the rows, methods return references
//! 2. **Error Handling**: Using Result<T> and custom error types
//! 3. **Type Safety**: Closed enums (VehicleCategory) instead of stringly-typed cells
//! 4. **Collections**: HashMap and BTreeMap for efficient lookups
//! 5. **Traits**: Implementing Display, FromStr, Error, etc.
//! 6. **Modules**: Organizing code into logical units
//! 7. **Parallel Processing**: Using Rayon for data-parallel parsing

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod snapshot;

// Re-export commonly used types for convenience
pub use error::{RateStoreError, Result};
pub use snapshot::{Projections, RateSnapshot, SnapshotDiagnostics};
pub use types::{
    // Type aliases
    RowId,
    // Core types
    RateRow,
    RtoRule,
    // Enums
    BusinessType,
    VehicleCategory,
};
