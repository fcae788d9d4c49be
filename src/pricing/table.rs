//! Bracket tables for the rate rule.
//!
//! The annual rate is a base rate plus two independent adjustments:
//!
//! - a **term** adjustment, looked up in brackets with inclusive *upper* bounds
//!   evaluated in ascending order (first match wins)
//! - a **score** adjustment, looked up in brackets with inclusive *lower* bounds
//!   evaluated in descending order (first match wins)
//!
//! Inputs falling past the last bracket take the table's overflow / floor value.
//! Comparisons are plain `<=` / `>=`, so a NaN input never matches a bracket and
//! lands on the overflow / floor value.

use serde::{Deserialize, Serialize};

use crate::pricing::RateError;

/// Base annual rate in percent (1.5% a month compounded).
pub const BASE_RATE: f64 = 19.56;

/// A single `(bound, adjustment)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub bound: f64,
    /// Percentage points added to the base rate.
    pub adjustment: f64,
}

impl Bracket {
    pub const fn new(bound: f64, adjustment: f64) -> Self {
        Self { bound, adjustment }
    }
}

const TERM_BRACKETS: [Bracket; 3] = [
    Bracket::new(12.0, 0.0),
    Bracket::new(24.0, 2.0),
    Bracket::new(36.0, 4.0),
];
const TERM_OVERFLOW: f64 = 6.0;

const SCORE_BRACKETS: [Bracket; 4] = [
    Bracket::new(800.0, -4.0),
    Bracket::new(700.0, -2.0),
    Bracket::new(600.0, 0.0),
    Bracket::new(500.0, 2.0),
];
const SCORE_FLOOR: f64 = 4.0;

/// Editable rate table (also the JSON schema for `--rate-table`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub base_rate: f64,
    /// Ascending inclusive upper bounds on `term_months`.
    pub term_brackets: Vec<Bracket>,
    /// Adjustment for terms above the last upper bound.
    pub term_overflow: f64,
    /// Descending inclusive lower bounds on `credit_score`.
    pub score_brackets: Vec<Bracket>,
    /// Adjustment for scores below the last lower bound.
    pub score_floor: f64,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            base_rate: BASE_RATE,
            term_brackets: TERM_BRACKETS.to_vec(),
            term_overflow: TERM_OVERFLOW,
            score_brackets: SCORE_BRACKETS.to_vec(),
            score_floor: SCORE_FLOOR,
        }
    }
}

impl RateTable {
    /// Term adjustment in percentage points.
    pub fn term_adjustment(&self, term_months: f64) -> f64 {
        self.term_brackets
            .iter()
            .find(|b| term_months <= b.bound)
            .map(|b| b.adjustment)
            .unwrap_or(self.term_overflow)
    }

    /// Score adjustment in percentage points.
    pub fn score_adjustment(&self, credit_score: f64) -> f64 {
        self.score_brackets
            .iter()
            .find(|b| credit_score >= b.bound)
            .map(|b| b.adjustment)
            .unwrap_or(self.score_floor)
    }

    /// Check that every value is finite and the bounds are strictly ordered.
    pub fn validate(&self) -> Result<(), RateError> {
        if !(self.base_rate.is_finite()
            && self.term_overflow.is_finite()
            && self.score_floor.is_finite())
        {
            return Err(RateError::InvalidTable(
                "base_rate, term_overflow and score_floor must be finite".to_string(),
            ));
        }

        check_brackets("term_brackets", &self.term_brackets, |prev, next| next > prev)?;
        check_brackets("score_brackets", &self.score_brackets, |prev, next| next < prev)?;
        Ok(())
    }

    /// Human-readable labels for each term bracket, overflow last.
    pub fn term_labels(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .term_brackets
            .iter()
            .map(|b| format!("<={}", fmt_bound(b.bound)))
            .collect();
        if let Some(last) = self.term_brackets.last() {
            out.push(format!(">{}", fmt_bound(last.bound)));
        } else {
            out.push("any".to_string());
        }
        out
    }

    /// Human-readable labels for each score bracket, floor last.
    pub fn score_labels(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .score_brackets
            .iter()
            .map(|b| format!(">={}", fmt_bound(b.bound)))
            .collect();
        if let Some(last) = self.score_brackets.last() {
            out.push(format!("<{}", fmt_bound(last.bound)));
        } else {
            out.push("any".to_string());
        }
        out
    }
}

fn check_brackets(
    name: &str,
    brackets: &[Bracket],
    ordered: impl Fn(f64, f64) -> bool,
) -> Result<(), RateError> {
    for b in brackets {
        if !(b.bound.is_finite() && b.adjustment.is_finite()) {
            return Err(RateError::InvalidTable(format!(
                "{name}: bounds and adjustments must be finite"
            )));
        }
    }
    for w in brackets.windows(2) {
        if !ordered(w[0].bound, w[1].bound) {
            return Err(RateError::InvalidTable(format!(
                "{name}: bounds must be strictly ordered ({} then {})",
                w[0].bound, w[1].bound
            )));
        }
    }
    Ok(())
}

fn fmt_bound(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}
