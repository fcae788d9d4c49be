//! Book-level assessment: many applications, one engine, one model.
//!
//! Applications are independent, so they are assessed in parallel. Output order
//! matches input order.

use std::collections::HashMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::{LoanApplication, Recommendation, RiskLevel};
use crate::models::DefaultModel;
use crate::pricing::RateEngine;
use crate::risk::{Assessment, assess};

/// An application that could not be assessed.
#[derive(Debug, Clone)]
pub struct BookFailure {
    pub application_id: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct BookOutput {
    pub assessments: Vec<Assessment>,
    pub failures: Vec<BookFailure>,
}

/// Aggregate view of an assessed book.
#[derive(Debug, Clone)]
pub struct BookSummary {
    pub n: usize,
    pub high_risk: usize,
    pub low_risk: usize,
    pub by_recommendation: Vec<(Recommendation, usize)>,
    pub mean_rate: f64,
    pub min_rate: f64,
    pub max_rate: f64,
    pub mean_probability: f64,
    pub mean_commitment_pct: f64,
    /// Observed default rate over applications with a known outcome.
    pub observed_default_rate: Option<f64>,
    /// Share of applications with known outcomes where the risk level matched it.
    pub accuracy: Option<f64>,
}

pub fn assess_book(
    apps: &[LoanApplication],
    engine: &RateEngine,
    model: &dyn DefaultModel,
    first_due: Option<NaiveDate>,
) -> BookOutput {
    let results: Vec<_> = apps
        .par_iter()
        .map(|app| (app.id.clone(), assess(app, engine, model, first_due)))
        .collect();

    let mut assessments = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (id, result) in results {
        match result {
            Ok(a) => assessments.push(a),
            Err(e) => {
                debug!(id = %id, error = %e, "application skipped");
                failures.push(BookFailure {
                    application_id: id,
                    message: e.message().to_string(),
                });
            }
        }
    }

    info!(
        assessed = assessments.len(),
        failed = failures.len(),
        model = model.name(),
        "book assessed"
    );

    BookOutput {
        assessments,
        failures,
    }
}

/// Summarize a book; `None` when it is empty.
pub fn summarize(assessments: &[Assessment]) -> Option<BookSummary> {
    if assessments.is_empty() {
        return None;
    }
    let n = assessments.len();
    let nf = n as f64;

    let high_risk = assessments
        .iter()
        .filter(|a| a.risk_level == RiskLevel::High)
        .count();

    let mut counts: HashMap<Recommendation, usize> = HashMap::new();
    for a in assessments {
        *counts.entry(a.recommendation).or_default() += 1;
    }
    let by_recommendation = Recommendation::ALL
        .into_iter()
        .map(|r| (r, counts.get(&r).copied().unwrap_or(0)))
        .collect();

    let mut min_rate = f64::INFINITY;
    let mut max_rate = f64::NEG_INFINITY;
    let mut rate_sum = 0.0;
    let mut prob_sum = 0.0;
    let mut commitment_sum = 0.0;
    for a in assessments {
        let r = a.quote.final_rate;
        min_rate = min_rate.min(r);
        max_rate = max_rate.max(r);
        rate_sum += r;
        prob_sum += a.default_probability;
        commitment_sum += a.income_commitment_pct;
    }

    let known: Vec<(bool, RiskLevel)> = assessments
        .iter()
        .filter_map(|a| a.defaulted.map(|d| (d, a.risk_level)))
        .collect();
    let (observed_default_rate, accuracy) = if known.is_empty() {
        (None, None)
    } else {
        let k = known.len() as f64;
        let defaults = known.iter().filter(|(d, _)| *d).count() as f64;
        let hits = known
            .iter()
            .filter(|(d, level)| *d == (*level == RiskLevel::High))
            .count() as f64;
        (Some(defaults / k), Some(hits / k))
    };

    Some(BookSummary {
        n,
        high_risk,
        low_risk: n - high_risk,
        by_recommendation,
        mean_rate: rate_sum / nf,
        min_rate,
        max_rate,
        mean_probability: prob_sum / nf,
        mean_commitment_pct: commitment_sum / nf,
        observed_default_rate,
        accuracy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleModel;

    fn book() -> Vec<LoanApplication> {
        let good = LoanApplication::new("GOOD", 10_000.0, 90_000.0, 12, 820.0);

        let mut bad = LoanApplication::new("BAD", 20_000.0, 40_000.0, 60, 450.0);
        bad.avg_days_late = 10.0;
        bad.on_time_ratio = 0.5;
        bad.uses_overdraft = true;
        bad.defaulted = Some(true);

        let broken = LoanApplication::new("BROKEN", 5_000.0, 50_000.0, 0, 700.0);

        vec![good, bad, broken]
    }

    #[test]
    fn book_keeps_order_and_collects_failures() {
        let out = assess_book(&book(), &RateEngine::default(), &RuleModel, None);
        let ids: Vec<_> = out.assessments.iter().map(|a| a.application_id.as_str()).collect();
        assert_eq!(ids, vec!["GOOD", "BAD"]);
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].application_id, "BROKEN");
    }

    #[test]
    fn summary_counts_and_outcomes() {
        let out = assess_book(&book(), &RateEngine::default(), &RuleModel, None);
        let s = summarize(&out.assessments).unwrap();

        assert_eq!(s.n, 2);
        assert_eq!(s.high_risk, 1);
        assert_eq!(s.low_risk, 1);
        assert!((s.min_rate - 15.56).abs() < 1e-9);
        assert!((s.max_rate - 29.56).abs() < 1e-9);
        assert_eq!(s.observed_default_rate, Some(1.0));
        assert_eq!(s.accuracy, Some(1.0));

        let total: usize = s.by_recommendation.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn empty_book_has_no_summary() {
        assert!(summarize(&[]).is_none());
    }
}
