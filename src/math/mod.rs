//! Mathematical utilities: loan amortization and the logistic link.

pub mod amortization;
pub mod logistic;

pub use amortization::*;
pub use logistic::*;
