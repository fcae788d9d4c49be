//! Model input features.
//!
//! The feature order is fixed; model files refer to features by name and are
//! aligned to this order when loaded.
//!
//! Besides the raw application fields, the vector carries the affordability
//! ratios and two derived terms:
//!
//! - `int_rate_x_loan_to_income = interest_rate * loan_to_income`
//! - `risk_score = 0.4 * interest_rate + 0.3 * loan_to_income + 0.3 * dti`

use crate::domain::LoanApplication;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    LoanAmount,
    InterestRate,
    AnnualIncome,
    AvgDaysLate,
    OnTimeRatio,
    MaxDaysLate,
    AccountAgeYears,
    AvgBalance,
    UsesOverdraft,
    CreditScore,
    Inquiries6m,
    HasOtherLoans,
    /// Debt-to-income, in percent.
    Dti,
    LoanToIncome,
    IntRateXLoanToIncome,
    RiskScore,
}

pub const FEATURE_COUNT: usize = 16;

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::LoanAmount,
        Feature::InterestRate,
        Feature::AnnualIncome,
        Feature::AvgDaysLate,
        Feature::OnTimeRatio,
        Feature::MaxDaysLate,
        Feature::AccountAgeYears,
        Feature::AvgBalance,
        Feature::UsesOverdraft,
        Feature::CreditScore,
        Feature::Inquiries6m,
        Feature::HasOtherLoans,
        Feature::Dti,
        Feature::LoanToIncome,
        Feature::IntRateXLoanToIncome,
        Feature::RiskScore,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::LoanAmount => "loan_amount",
            Feature::InterestRate => "interest_rate",
            Feature::AnnualIncome => "annual_income",
            Feature::AvgDaysLate => "avg_days_late",
            Feature::OnTimeRatio => "on_time_ratio",
            Feature::MaxDaysLate => "max_days_late",
            Feature::AccountAgeYears => "account_age_years",
            Feature::AvgBalance => "avg_balance",
            Feature::UsesOverdraft => "uses_overdraft",
            Feature::CreditScore => "credit_score",
            Feature::Inquiries6m => "inquiries_6m",
            Feature::HasOtherLoans => "has_other_loans",
            Feature::Dti => "dti",
            Feature::LoanToIncome => "loan_to_income",
            Feature::IntRateXLoanToIncome => "int_rate_x_loan_to_income",
            Feature::RiskScore => "risk_score",
        }
    }

    pub fn from_name(name: &str) -> Option<Feature> {
        let name = name.trim().to_ascii_lowercase();
        Feature::ALL.into_iter().find(|f| f.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A dense feature vector in `Feature::ALL` order.
#[derive(Debug, Clone, PartialEq)]
pub struct Features {
    values: [f64; FEATURE_COUNT],
}

impl Features {
    /// Build features from an application and the rate it was priced at.
    pub fn from_application(app: &LoanApplication, interest_rate: f64) -> Self {
        let dti = app.dti_pct();
        let loan_to_income = app.loan_to_income();

        let mut values = [0.0; FEATURE_COUNT];
        for feature in Feature::ALL {
            values[feature.index()] = match feature {
                Feature::LoanAmount => app.loan_amount,
                Feature::InterestRate => interest_rate,
                Feature::AnnualIncome => app.annual_income,
                Feature::AvgDaysLate => app.avg_days_late,
                Feature::OnTimeRatio => app.on_time_ratio,
                Feature::MaxDaysLate => app.max_days_late,
                Feature::AccountAgeYears => app.account_age_years,
                Feature::AvgBalance => app.avg_balance,
                Feature::UsesOverdraft => flag(app.uses_overdraft),
                Feature::CreditScore => app.credit_score,
                Feature::Inquiries6m => app.inquiries_6m as f64,
                Feature::HasOtherLoans => flag(app.has_other_loans),
                Feature::Dti => dti,
                Feature::LoanToIncome => loan_to_income,
                Feature::IntRateXLoanToIncome => interest_rate * loan_to_income,
                Feature::RiskScore => 0.4 * interest_rate + 0.3 * loan_to_income + 0.3 * dti,
            };
        }
        Self { values }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

fn flag(v: bool) -> f64 {
    if v { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_in_order() {
        for (i, f) in Feature::ALL.into_iter().enumerate() {
            assert_eq!(f.index(), i);
            assert_eq!(Feature::from_name(f.name()), Some(f));
        }
        assert_eq!(Feature::from_name(" Credit_Score "), Some(Feature::CreditScore));
        assert_eq!(Feature::from_name("grade"), None);
    }

    #[test]
    fn flags_encode_as_zero_one() {
        let mut app = LoanApplication::new("A1", 15_000.0, 60_000.0, 24, 720.0);
        app.uses_overdraft = true;
        app.inquiries_6m = 4;

        let f = Features::from_application(&app, 21.56);
        assert_eq!(f.get(Feature::UsesOverdraft), 1.0);
        assert_eq!(f.get(Feature::HasOtherLoans), 0.0);
        assert_eq!(f.get(Feature::Inquiries6m), 4.0);
        assert_eq!(f.get(Feature::InterestRate), 21.56);
        assert_eq!(f.as_slice().len(), FEATURE_COUNT);
    }

    #[test]
    fn derived_ratios_follow_the_application() {
        let mut app = LoanApplication::new("A2", 12_500.0, 100_000.0, 24, 700.0);
        app.existing_debt = 12_500.0;

        let f = Features::from_application(&app, 20.0);
        assert!((f.get(Feature::Dti) - 12.5).abs() < 1e-12);
        assert!((f.get(Feature::LoanToIncome) - 0.125).abs() < 1e-12);
        assert!((f.get(Feature::IntRateXLoanToIncome) - 2.5).abs() < 1e-12);
        // 0.4 * 20 + 0.3 * 0.125 + 0.3 * 12.5
        assert!((f.get(Feature::RiskScore) - 11.7875).abs() < 1e-12);
    }
}
