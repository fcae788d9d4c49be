//! Interest-rate pricing.
//!
//! Responsibilities:
//!
//! - hold the bracket tables (term and score adjustments)
//! - validate / normalize inputs according to `InputMode`
//! - produce `RateQuote`s and rate grids

pub mod engine;
pub mod grid;
pub mod table;

pub use engine::*;
pub use grid::*;
pub use table::*;
