//! CSV exports.
//!
//! Exports are meant to be easy to consume in spreadsheets or downstream scripts.
//! Numbers are written unrounded; formatting is left to the consumer.

use std::fs::File;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::domain::LoanApplication;
use crate::error::AppError;
use crate::math::InstallmentPlan;
use crate::risk::Assessment;

/// Flat per-application row for book exports.
#[derive(Debug, Serialize)]
struct BookRow<'a> {
    id: &'a str,
    credit_score: f64,
    term_months: f64,
    rate_pct: f64,
    installment: f64,
    total_interest: f64,
    dti_pct: f64,
    loan_to_income: f64,
    default_probability: f64,
    risk_level: &'static str,
    confidence: &'static str,
    income_commitment_pct: f64,
    recommendation: &'static str,
    risk_factors: String,
    defaulted: Option<bool>,
}

impl<'a> From<&'a Assessment> for BookRow<'a> {
    fn from(a: &'a Assessment) -> Self {
        Self {
            id: &a.application_id,
            credit_score: a.quote.credit_score,
            term_months: a.quote.term_months,
            rate_pct: a.quote.final_rate,
            installment: a.plan.installment,
            total_interest: a.plan.total_interest,
            dti_pct: a.metrics.dti_pct,
            loan_to_income: a.metrics.loan_to_income,
            default_probability: a.default_probability,
            risk_level: a.risk_level.display_name(),
            confidence: a.confidence.display_name(),
            income_commitment_pct: a.income_commitment_pct,
            recommendation: a.recommendation.display_name(),
            risk_factors: a.risk_factors.join("; "),
            defaulted: a.defaulted,
        }
    }
}

/// Write the amortization schedule of a plan.
pub fn write_schedule_csv(path: &Path, plan: &InstallmentPlan) -> Result<(), AppError> {
    write_rows(path, "schedule", plan.schedule.iter())
}

/// Write one row per assessed application.
pub fn write_book_csv(path: &Path, assessments: &[Assessment]) -> Result<(), AppError> {
    write_rows(path, "book", assessments.iter().map(BookRow::from))
}

/// Write raw applications (readable back by `io::ingest`).
pub fn write_applications_csv(path: &Path, applications: &[LoanApplication]) -> Result<(), AppError> {
    write_rows(path, "applications", applications.iter())
}

fn write_rows<T: Serialize>(
    path: &Path,
    what: &str,
    rows: impl Iterator<Item = T>,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create {what} CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    let mut n = 0usize;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::new(2, format!("Failed to write {what} CSV row: {e}")))?;
        n += 1;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush {what} CSV: {e}")))?;

    info!(path = %path.display(), rows = n, "{what} exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SimulationConfig, simulate_applications};
    use crate::io::load_applications;
    use crate::math::amortization_schedule;
    use crate::models::RuleModel;
    use crate::pricing::RateEngine;
    use crate::risk::assess_book;

    #[test]
    fn applications_round_trip_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apps.csv");

        let apps = simulate_applications(&SimulationConfig { count: 20, seed: 3 }).unwrap();
        write_applications_csv(&path, &apps).unwrap();

        let book = load_applications(&path).unwrap();
        assert!(book.row_errors.is_empty());
        assert_eq!(book.applications.len(), 20);
        assert_eq!(book.applications[0].id, apps[0].id);
        assert_eq!(book.applications[7].defaulted, apps[7].defaulted);
        assert_eq!(book.applications[7].uses_overdraft, apps[7].uses_overdraft);
    }

    #[test]
    fn schedule_and_book_exports_have_headers() {
        let dir = tempfile::tempdir().unwrap();

        let plan = amortization_schedule(10_000.0, 21.56, 6, None).unwrap();
        let schedule_path = dir.path().join("schedule.csv");
        write_schedule_csv(&schedule_path, &plan).unwrap();
        let text = std::fs::read_to_string(&schedule_path).unwrap();
        assert!(text.starts_with("month,due_date,payment,principal,interest,balance"));
        assert_eq!(text.lines().count(), 7);

        let apps = simulate_applications(&SimulationConfig { count: 5, seed: 9 }).unwrap();
        let out = assess_book(&apps, &RateEngine::default(), &RuleModel, None);
        let book_path = dir.path().join("book.csv");
        write_book_csv(&book_path, &out.assessments).unwrap();
        let text = std::fs::read_to_string(&book_path).unwrap();
        assert!(text.starts_with("id,credit_score,term_months,rate_pct"));
        assert_eq!(text.lines().count(), out.assessments.len() + 1);
    }
}
