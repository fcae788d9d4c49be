//! `credit-risk` library crate.
//!
//! The binary (`credit`) is a thin wrapper around this library so that:
//!
//! - the rate engine and risk logic are testable without spawning processes
//! - the pricing core can be embedded elsewhere (batch jobs, services)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod pricing;
pub mod report;
pub mod risk;
