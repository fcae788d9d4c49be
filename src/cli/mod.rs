//! Command-line parsing for the credit pricing and risk toolkit.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pricing/risk code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{InputMode, ModelChoice};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "credit", version, about = "Loan pricing and credit-risk assessment")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Quote the annual rate for one score/term pair.
    Quote(QuoteArgs),
    /// Print a score x term rate matrix.
    Grid(GridArgs),
    /// Print (or write) the rate table in use.
    Table(TableArgs),
    /// Price a loan and print its amortization schedule.
    Schedule(ScheduleArgs),
    /// Assess a single applicant.
    Assess(AssessArgs),
    /// Generate a synthetic book, assess it and print a summary.
    Simulate(SimulateArgs),
    /// Assess a book of applications loaded from CSV.
    Book(BookArgs),
}

/// Rate-engine options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct PricingArgs {
    /// How out-of-domain scores/terms are handled.
    #[arg(long, value_enum, env = "CREDIT_INPUT_MODE", default_value_t = InputMode::Strict)]
    pub mode: InputMode,

    /// JSON rate table replacing the built-in brackets.
    #[arg(long = "rate-table", value_name = "JSON", env = "CREDIT_RATE_TABLE")]
    pub rate_table: Option<PathBuf>,
}

/// Default-model options.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Model kind. `logistic` requires `--model`.
    #[arg(long = "model-kind", value_enum, default_value_t = ModelChoice::Rules)]
    pub model_kind: ModelChoice,

    /// Logistic model JSON (feature names, coefficients, intercept).
    /// Giving a file implies `--model-kind logistic`.
    #[arg(long, value_name = "JSON", env = "CREDIT_MODEL")]
    pub model: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub pricing: PricingArgs,

    /// Credit score (conventionally 0..=1000).
    #[arg(long, allow_negative_numbers = true)]
    pub score: f64,

    /// Term in months.
    #[arg(long, allow_negative_numbers = true)]
    pub term: f64,

    /// Print the quote as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct GridArgs {
    #[command(flatten)]
    pub pricing: PricingArgs,

    /// Scores (rows), comma-separated.
    #[arg(long, value_delimiter = ',', default_values_t = vec![450.0, 550.0, 650.0, 750.0, 850.0])]
    pub scores: Vec<f64>,

    /// Terms in months (columns), comma-separated. Defaults to the offered terms.
    #[arg(long, value_delimiter = ',')]
    pub terms: Vec<f64>,

    /// Print the grid as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct TableArgs {
    #[command(flatten)]
    pub pricing: PricingArgs,

    /// Write the table to a JSON file (a starting point for custom tables).
    #[arg(long, value_name = "JSON")]
    pub write: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub pricing: PricingArgs,

    /// Loan amount.
    #[arg(long)]
    pub amount: f64,

    #[arg(long)]
    pub score: f64,

    /// Term in months.
    #[arg(long)]
    pub term: u32,

    /// First due date (YYYY-MM-DD); later dates step by one month.
    #[arg(long, value_parser = crate::io::parse_date)]
    pub start: Option<chrono::NaiveDate>,

    /// Print only the summary, not every installment.
    #[arg(long)]
    pub summary_only: bool,

    /// Export the schedule to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct AssessArgs {
    #[command(flatten)]
    pub pricing: PricingArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Application identifier used in reports.
    #[arg(long, default_value = "APPLICANT")]
    pub id: String,

    /// Loan amount.
    #[arg(long)]
    pub amount: f64,

    /// Annual income.
    #[arg(long)]
    pub income: f64,

    #[arg(long)]
    pub score: f64,

    /// Term in months.
    #[arg(long)]
    pub term: u32,

    /// Outstanding debt.
    #[arg(long, default_value_t = 0.0)]
    pub debt: f64,

    /// Average days late per payment.
    #[arg(long, default_value_t = 0.0)]
    pub days_late: f64,

    /// Share of payments made on time (0..=1).
    #[arg(long, default_value_t = 1.0, value_parser = parse_ratio)]
    pub on_time: f64,

    /// Worst delay seen, in days.
    #[arg(long, default_value_t = 0.0)]
    pub max_days_late: f64,

    /// Age of the oldest account, in years.
    #[arg(long, default_value_t = 0.0)]
    pub account_age: f64,

    /// Average account balance.
    #[arg(long, default_value_t = 0.0)]
    pub balance: f64,

    /// Applicant regularly uses an overdraft.
    #[arg(long)]
    pub overdraft: bool,

    /// Credit inquiries in the last six months.
    #[arg(long, default_value_t = 0)]
    pub inquiries: u32,

    /// Applicant has other active loans.
    #[arg(long)]
    pub other_loans: bool,

    /// First due date (YYYY-MM-DD).
    #[arg(long, value_parser = crate::io::parse_date)]
    pub start: Option<chrono::NaiveDate>,

    /// Print the assessment as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub pricing: PricingArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Number of synthetic applications.
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub count: usize,

    /// Random seed (same seed, same book).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Show the top-N riskiest applications.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Export the generated applications to CSV (readable by `credit book`).
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the assessed book to CSV.
    #[arg(long = "export-book", value_name = "CSV")]
    pub export_book: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct BookArgs {
    #[command(flatten)]
    pub pricing: PricingArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Applications CSV.
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    /// Show the top-N riskiest applications.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Export the assessed book to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

/// A share in `0..=1`.
fn parse_ratio(s: &str) -> Result<f64, String> {
    let v: f64 = s.trim().parse().map_err(|_| format!("invalid number '{s}'"))?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(format!("must be within 0..=1, got {v}"))
    }
}
