//! Risk assessment.
//!
//! Responsibilities:
//!
//! - derive loan metrics (DTI, loan-to-income, payment-to-income)
//! - flag rule-based risk factors from payment history
//! - combine pricing, amortization and a default model into an `Assessment`
//! - assess whole books in parallel and summarize them

pub mod assessment;
pub mod book;
pub mod factors;
pub mod metrics;

pub use assessment::*;
pub use book::*;
pub use factors::*;
pub use metrics::*;
