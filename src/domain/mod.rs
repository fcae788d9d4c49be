//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - configuration enums (`InputMode`, `ModelChoice`)
//! - loan applications and their derived values (`LoanApplication`, `RateQuote`)
//! - assessment outputs (`RiskLevel`, `Confidence`, `Recommendation`)

pub mod types;

pub use types::*;
