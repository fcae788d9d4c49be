//! Single-application assessment.
//!
//! Workflow:
//! price (rate engine) -> amortize -> metrics -> model probability -> classify -> recommend

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Confidence, LoanApplication, RateQuote, Recommendation, RiskLevel};
use crate::error::AppError;
use crate::math::{InstallmentPlan, amortization_schedule};
use crate::models::{DefaultModel, Features};
use crate::pricing::RateEngine;
use crate::risk::{COMMITMENT_LIMIT_PCT, LoanMetrics, risk_factors};

/// Probabilities above this are classified as high risk.
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub application_id: String,
    pub model: String,
    pub quote: RateQuote,
    pub plan: InstallmentPlan,
    pub metrics: LoanMetrics,
    pub default_probability: f64,
    pub risk_level: RiskLevel,
    pub confidence: Confidence,
    pub risk_factors: Vec<String>,
    /// Installment as a percentage of monthly income.
    pub income_commitment_pct: f64,
    pub recommendation: Recommendation,
    /// Observed outcome carried over from the application, if any.
    pub defaulted: Option<bool>,
}

impl Assessment {
    pub fn commitment_exceeded(&self) -> bool {
        self.income_commitment_pct > COMMITMENT_LIMIT_PCT
    }
}

/// Assess one application with a shared engine and model.
pub fn assess(
    app: &LoanApplication,
    engine: &RateEngine,
    model: &dyn DefaultModel,
    first_due: Option<NaiveDate>,
) -> Result<Assessment, AppError> {
    let quote = engine
        .quote(app.credit_score, app.term_months as f64)
        .map_err(|e| AppError::new(2, format!("{}: {e}", app.id)))?;

    let plan = amortization_schedule(app.loan_amount, quote.final_rate, app.term_months, first_due)
        .map_err(|e| AppError::new(2, format!("{}: {e}", app.id)))?;

    let metrics = LoanMetrics::compute(app, quote.final_rate)?;

    // Model and factors see the score as priced (clamp mode may have moved it).
    let priced = LoanApplication {
        credit_score: quote.credit_score,
        ..app.clone()
    };
    let features = Features::from_application(&priced, quote.final_rate);
    let default_probability = model.default_probability(&features);
    if !default_probability.is_finite() {
        return Err(AppError::new(
            4,
            format!("{}: model `{}` produced a non-finite probability.", app.id, model.name()),
        ));
    }

    let risk_level = classify(default_probability);
    let income_commitment_pct = crate::risk::income_commitment(plan.installment, app.annual_income);

    Ok(Assessment {
        application_id: app.id.clone(),
        model: model.name().to_string(),
        quote,
        plan,
        metrics,
        default_probability,
        risk_level,
        confidence: confidence(default_probability),
        risk_factors: risk_factors(&priced),
        income_commitment_pct,
        recommendation: recommend(risk_level, income_commitment_pct),
        defaulted: app.defaulted,
    })
}

pub fn classify(probability: f64) -> RiskLevel {
    if probability > DECISION_THRESHOLD {
        RiskLevel::High
    } else {
        RiskLevel::Low
    }
}

/// Distance from the decision threshold.
pub fn confidence(probability: f64) -> Confidence {
    let margin = (probability - DECISION_THRESHOLD).abs();
    if margin > 0.3 {
        Confidence::High
    } else if margin > 0.15 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

pub fn recommend(risk: RiskLevel, income_commitment_pct: f64) -> Recommendation {
    match risk {
        RiskLevel::High => Recommendation::NotRecommended,
        RiskLevel::Low if income_commitment_pct <= COMMITMENT_LIMIT_PCT => Recommendation::Approved,
        RiskLevel::Low => Recommendation::ApprovedWithCaveats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InputMode;
    use crate::models::{FEATURE_COUNT, Feature, LogisticModel, RuleModel};

    fn good_client() -> LoanApplication {
        let mut app = LoanApplication::new("GOOD", 15_000.0, 80_000.0, 12, 850.0);
        app.on_time_ratio = 0.98;
        app.account_age_years = 8.0;
        app.avg_balance = 15_000.0;
        app.inquiries_6m = 1;
        app
    }

    fn bad_client() -> LoanApplication {
        let mut app = LoanApplication::new("BAD", 25_000.0, 45_000.0, 48, 520.0);
        app.avg_days_late = 8.0;
        app.on_time_ratio = 0.7;
        app.max_days_late = 45.0;
        app.account_age_years = 1.0;
        app.avg_balance = -500.0;
        app.uses_overdraft = true;
        app.inquiries_6m = 5;
        app.has_other_loans = true;
        app
    }

    #[test]
    fn good_client_is_approved() {
        let a = assess(&good_client(), &RateEngine::default(), &RuleModel, None).unwrap();
        assert!((a.quote.final_rate - 15.56).abs() < 1e-9);
        assert_eq!(a.risk_level, RiskLevel::Low);
        assert_eq!(a.confidence, Confidence::High);
        assert!(a.risk_factors.is_empty());
        assert!(!a.commitment_exceeded());
        assert_eq!(a.recommendation, Recommendation::Approved);
        assert_eq!(a.model, "rules");
    }

    #[test]
    fn bad_client_is_not_recommended() {
        let a = assess(&bad_client(), &RateEngine::default(), &RuleModel, None).unwrap();
        assert!((a.quote.final_rate - 27.56).abs() < 1e-9);
        assert_eq!(a.risk_level, RiskLevel::High);
        assert_eq!(a.risk_factors.len(), 5);
        assert_eq!(a.recommendation, Recommendation::NotRecommended);
    }

    #[test]
    fn high_commitment_adds_caveats() {
        let mut app = good_client();
        app.annual_income = 30_000.0;
        app.loan_amount = 20_000.0;
        let a = assess(&app, &RateEngine::default(), &RuleModel, None).unwrap();
        assert!(a.commitment_exceeded());
        assert_eq!(a.recommendation, Recommendation::ApprovedWithCaveats);
    }

    #[test]
    fn invalid_score_surfaces_as_input_error() {
        let mut app = good_client();
        app.credit_score = 1500.0;
        let err = assess(&app, &RateEngine::default(), &RuleModel, None).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().starts_with("GOOD:"));
    }

    #[test]
    fn overlong_term_is_rejected() {
        let app = LoanApplication::new("LONG", 10_000.0, 60_000.0, 40_000, 700.0);
        let err = assess(&app, &RateEngine::default(), &RuleModel, None).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().starts_with("LONG:"));
    }

    #[test]
    fn clamped_score_reaches_model_and_factors() {
        let engine = RateEngine::with_mode(InputMode::Clamp);

        let mut high = good_client();
        high.credit_score = 1200.0;
        let a = assess(&high, &engine, &RuleModel, None).unwrap();
        assert_eq!(a.quote.credit_score, 1000.0);
        assert!(a.risk_factors.is_empty());

        // z = -10 + 0.01 * score is zero only for the clamped score.
        let mut coefficients = [0.0; FEATURE_COUNT];
        coefficients[Feature::CreditScore as usize] = 0.01;
        let model = LogisticModel::new(coefficients, -10.0).unwrap();
        let a = assess(&high, &engine, &model, None).unwrap();
        assert!((a.default_probability - 0.5).abs() < 1e-12);

        let mut low = good_client();
        low.credit_score = -50.0;
        let a = assess(&low, &engine, &RuleModel, None).unwrap();
        assert_eq!(a.quote.credit_score, 0.0);
        assert_eq!(a.risk_factors, vec!["Low credit score: 0"]);
        assert!((a.default_probability - 0.15).abs() < 1e-12);
    }

    #[test]
    fn confidence_bands() {
        assert_eq!(confidence(0.05), Confidence::High);
        assert_eq!(confidence(0.3), Confidence::Medium);
        assert_eq!(confidence(0.55), Confidence::Low);
        assert_eq!(classify(0.5), RiskLevel::Low);
        assert_eq!(classify(0.51), RiskLevel::High);
    }
}
