//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during pricing and assessment
//! - exported to JSON/CSV
//! - reloaded later (rate tables, model files)

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How the rate engine treats inputs outside the conventional domain.
///
/// Scores are conventionally `0..=1000` and terms are positive month counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Reject non-finite values, scores outside `0..=1000` and terms `<= 0`.
    #[default]
    Strict,
    /// Reject non-finite values; clamp the score into `0..=1000` and raise the
    /// term to at least one month.
    Clamp,
    /// Legacy behavior: never fail, let out-of-domain values fall into the
    /// extreme brackets.
    Permissive,
}

/// Which default-probability model to use when none is loaded from a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelChoice {
    /// Additive rule model over the payment-history flags.
    Rules,
    /// Logistic model; requires `--model <JSON>`.
    Logistic,
}

/// A priced loan: the rate engine's output plus the inputs it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    pub credit_score: f64,
    pub term_months: f64,
    /// Base annual rate (percent).
    pub base_rate: f64,
    /// Term bracket adjustment (percentage points).
    pub term_adjustment: f64,
    /// Score bracket adjustment (percentage points).
    pub score_adjustment: f64,
    /// `base_rate + term_adjustment + score_adjustment`, percent per year, unrounded.
    pub final_rate: f64,
}

/// A loan application, either entered by hand, simulated or read from CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub id: String,
    pub loan_amount: f64,
    pub annual_income: f64,
    pub term_months: u32,
    pub credit_score: f64,

    /// Outstanding debt obligations (used for DTI).
    pub existing_debt: f64,

    // Payment history.
    pub avg_days_late: f64,
    /// Share of past installments paid on time, in `0..=1`.
    pub on_time_ratio: f64,
    pub max_days_late: f64,

    // Relationship with the bank.
    pub account_age_years: f64,
    pub avg_balance: f64,
    pub uses_overdraft: bool,

    // Bureau data.
    pub inquiries_6m: u32,
    pub has_other_loans: bool,

    /// Observed outcome, when known (simulated or historical data).
    pub defaulted: Option<bool>,
}

impl LoanApplication {
    /// An application with a clean payment history; callers override what they know.
    pub fn new(
        id: impl Into<String>,
        loan_amount: f64,
        annual_income: f64,
        term_months: u32,
        credit_score: f64,
    ) -> Self {
        Self {
            id: id.into(),
            loan_amount,
            annual_income,
            term_months,
            credit_score,
            existing_debt: 0.0,
            avg_days_late: 0.0,
            on_time_ratio: 1.0,
            max_days_late: 0.0,
            account_age_years: 0.0,
            avg_balance: 0.0,
            uses_overdraft: false,
            inquiries_6m: 0,
            has_other_loans: false,
            defaulted: None,
        }
    }

    /// Existing debt over annual income, in percent.
    pub fn dti_pct(&self) -> f64 {
        self.existing_debt / self.annual_income * 100.0
    }

    /// Principal over annual income.
    pub fn loan_to_income(&self) -> f64 {
        self.loan_amount / self.annual_income
    }
}

/// Binary risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    High,
}

impl RiskLevel {
    pub fn display_name(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW RISK",
            RiskLevel::High => "HIGH RISK",
        }
    }
}

/// How far the default probability is from the 50% decision boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn display_name(self) -> &'static str {
        match self {
            Confidence::Low => "LOW",
            Confidence::Medium => "MEDIUM",
            Confidence::High => "HIGH",
        }
    }
}

/// Final lending decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Recommendation {
    Approved,
    ApprovedWithCaveats,
    NotRecommended,
}

impl Recommendation {
    pub const ALL: [Recommendation; 3] = [
        Recommendation::Approved,
        Recommendation::ApprovedWithCaveats,
        Recommendation::NotRecommended,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Recommendation::Approved => "APPROVED",
            Recommendation::ApprovedWithCaveats => "APPROVED WITH CAVEATS",
            Recommendation::NotRecommended => "NOT RECOMMENDED",
        }
    }
}

/// A run's pricing configuration as understood by the pipeline.
///
/// This is derived from CLI flags / environment (plus defaults).
#[derive(Debug, Clone, Default)]
pub struct PricingConfig {
    pub input_mode: InputMode,
    /// Optional JSON rate table replacing the built-in brackets.
    pub rate_table: Option<PathBuf>,
}

/// Which model the pipeline should build, and from where.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub choice: ModelChoice,
    pub path: Option<PathBuf>,
}
