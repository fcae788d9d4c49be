//! Shared "book pipeline" logic used by the `simulate` and `book` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! applications -> parallel assessment -> summary
//!
//! The commands can then focus on where applications come from and on printing.

use std::path::Path;

use chrono::NaiveDate;
use tracing::warn;

use crate::data::{SimulationConfig, simulate_applications};
use crate::domain::LoanApplication;
use crate::error::AppError;
use crate::io::{RowError, load_applications};
use crate::models::DefaultModel;
use crate::pricing::RateEngine;
use crate::risk::{BookOutput, BookSummary, assess_book, summarize};

/// All computed outputs of a single book run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub applications: Vec<LoanApplication>,
    /// CSV rows that never became applications (empty for simulated books).
    pub row_errors: Vec<RowError>,
    pub book: BookOutput,
    pub summary: BookSummary,
}

/// Generate a synthetic book and assess it.
pub fn run_simulation(
    config: &SimulationConfig,
    engine: &RateEngine,
    model: &dyn DefaultModel,
) -> Result<RunOutput, AppError> {
    let applications = simulate_applications(config)?;
    run_book(applications, Vec::new(), engine, model, None)
}

/// Load a book from CSV and assess it.
pub fn run_csv(
    path: &Path,
    engine: &RateEngine,
    model: &dyn DefaultModel,
) -> Result<RunOutput, AppError> {
    let ingested = load_applications(path)?;
    if !ingested.row_errors.is_empty() {
        warn!(
            skipped = ingested.row_errors.len(),
            rows = ingested.rows_read,
            "some CSV rows were skipped"
        );
    }
    run_book(ingested.applications, ingested.row_errors, engine, model, None)
}

/// Assess an in-memory book.
pub fn run_book(
    applications: Vec<LoanApplication>,
    row_errors: Vec<RowError>,
    engine: &RateEngine,
    model: &dyn DefaultModel,
    first_due: Option<NaiveDate>,
) -> Result<RunOutput, AppError> {
    let book = assess_book(&applications, engine, model, first_due);

    let Some(summary) = summarize(&book.assessments) else {
        return Err(AppError::new(
            3,
            format!(
                "No application could be assessed ({} failed).",
                book.failures.len()
            ),
        ));
    };

    Ok(RunOutput {
        applications,
        row_errors,
        book,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleModel;

    #[test]
    fn simulation_is_reproducible() {
        let cfg = SimulationConfig { count: 200, seed: 11 };
        let engine = RateEngine::default();
        let a = run_simulation(&cfg, &engine, &RuleModel).unwrap();
        let b = run_simulation(&cfg, &engine, &RuleModel).unwrap();

        assert_eq!(a.applications, b.applications);
        assert_eq!(a.summary.n, 200);
        assert_eq!(a.summary.mean_rate.to_bits(), b.summary.mean_rate.to_bits());
        assert!(a.summary.observed_default_rate.is_some());
    }

    #[test]
    fn csv_book_reports_row_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.csv");
        std::fs::write(
            &path,
            "id,loan_amount,annual_income,term_months,credit_score\n\
             A,10000,60000,24,720\n\
             B,oops,60000,24,720\n",
        )
        .unwrap();

        let run = run_csv(&path, &RateEngine::default(), &RuleModel).unwrap();
        assert_eq!(run.summary.n, 1);
        assert_eq!(run.row_errors.len(), 1);
        assert_eq!(run.row_errors[0].line, 3);
    }

    #[test]
    fn all_failures_is_insufficient_data() {
        let apps = vec![LoanApplication::new("X", 1000.0, 0.0, 12, 700.0)];
        let err = run_book(apps, Vec::new(), &RateEngine::default(), &RuleModel, None).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
