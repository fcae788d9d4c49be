//! The rate engine: `(credit_score, term_months) -> annual rate`.
//!
//! The engine is immutable after construction and does no I/O, so a single
//! instance can be shared by reference across threads.

use crate::domain::{InputMode, RateQuote};
use crate::pricing::RateTable;

/// Lowest accepted credit score in strict / clamp modes.
pub const SCORE_MIN: f64 = 0.0;
/// Highest accepted credit score in strict / clamp modes.
pub const SCORE_MAX: f64 = 1000.0;

/// Pricing failures.
#[derive(Debug, Clone, PartialEq)]
pub enum RateError {
    /// Score or term outside what the configured `InputMode` accepts.
    InvalidInput(String),
    /// A rate table that cannot be evaluated deterministically.
    InvalidTable(String),
}

impl std::fmt::Display for RateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateError::InvalidInput(msg) => write!(f, "Invalid pricing input: {msg}"),
            RateError::InvalidTable(msg) => write!(f, "Invalid rate table: {msg}"),
        }
    }
}

impl std::error::Error for RateError {}

#[derive(Debug, Clone)]
pub struct RateEngine {
    table: RateTable,
    mode: InputMode,
}

impl Default for RateEngine {
    fn default() -> Self {
        Self {
            table: RateTable::default(),
            mode: InputMode::Strict,
        }
    }
}

impl RateEngine {
    /// Build an engine, validating the table first.
    pub fn new(table: RateTable, mode: InputMode) -> Result<Self, RateError> {
        table.validate()?;
        Ok(Self { table, mode })
    }

    /// The built-in table with the given input mode.
    pub fn with_mode(mode: InputMode) -> Self {
        Self {
            table: RateTable::default(),
            mode,
        }
    }

    pub fn table(&self) -> &RateTable {
        &self.table
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Price a loan and keep the breakdown.
    pub fn quote(&self, credit_score: f64, term_months: f64) -> Result<RateQuote, RateError> {
        let (credit_score, term_months) = self.normalize(credit_score, term_months)?;

        let base_rate = self.table.base_rate;
        let term_adjustment = self.table.term_adjustment(term_months);
        let score_adjustment = self.table.score_adjustment(credit_score);

        Ok(RateQuote {
            credit_score,
            term_months,
            base_rate,
            term_adjustment,
            score_adjustment,
            final_rate: base_rate + term_adjustment + score_adjustment,
        })
    }

    /// Annual rate in percent (unrounded).
    pub fn rate(&self, credit_score: f64, term_months: f64) -> Result<f64, RateError> {
        self.quote(credit_score, term_months).map(|q| q.final_rate)
    }

    fn normalize(&self, credit_score: f64, term_months: f64) -> Result<(f64, f64), RateError> {
        if self.mode == InputMode::Permissive {
            return Ok((credit_score, term_months));
        }

        if !credit_score.is_finite() {
            return Err(RateError::InvalidInput(format!(
                "credit_score must be finite, got {credit_score}"
            )));
        }
        if !term_months.is_finite() {
            return Err(RateError::InvalidInput(format!(
                "term_months must be finite, got {term_months}"
            )));
        }

        match self.mode {
            InputMode::Clamp => Ok((credit_score.clamp(SCORE_MIN, SCORE_MAX), term_months.max(1.0))),
            _ => {
                if !(SCORE_MIN..=SCORE_MAX).contains(&credit_score) {
                    return Err(RateError::InvalidInput(format!(
                        "credit_score must be within {SCORE_MIN}..={SCORE_MAX}, got {credit_score}"
                    )));
                }
                if term_months <= 0.0 {
                    return Err(RateError::InvalidInput(format!(
                        "term_months must be > 0, got {term_months}"
                    )));
                }
                Ok((credit_score, term_months))
            }
        }
    }
}

/// Price with the built-in table in strict mode.
pub fn compute_rate(credit_score: f64, term_months: f64) -> Result<f64, RateError> {
    RateEngine::default().rate(credit_score, term_months)
}
