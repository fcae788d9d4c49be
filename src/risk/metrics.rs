//! Loan affordability metrics.

use serde::Serialize;

use crate::domain::LoanApplication;
use crate::error::AppError;

/// DTI above this percentage is adverse.
pub const DTI_LIMIT_PCT: f64 = 20.0;
/// Loan-to-income above this ratio is adverse.
pub const LOAN_TO_INCOME_LIMIT: f64 = 0.3;
/// Annual rates above this percentage are adverse.
pub const RATE_LIMIT_PCT: f64 = 15.0;
/// Installments above this share of monthly income are flagged.
pub const COMMITMENT_LIMIT_PCT: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanMetrics {
    /// Existing debt over annual income, in percent.
    pub dti_pct: f64,
    /// Principal over annual income.
    pub loan_to_income: f64,
    /// One year of simple interest over annual income, capped at 1.
    pub payment_to_income: f64,
}

/// A single explanation line; `adverse` marks it as a reason for concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricNote {
    pub adverse: bool,
    pub message: String,
}

impl LoanMetrics {
    pub fn compute(app: &LoanApplication, annual_rate: f64) -> Result<Self, AppError> {
        if !(app.annual_income.is_finite() && app.annual_income > 0.0) {
            return Err(AppError::new(
                2,
                format!("Annual income must be > 0 for `{}`.", app.id),
            ));
        }

        Ok(Self {
            dti_pct: app.dti_pct(),
            loan_to_income: app.loan_to_income(),
            payment_to_income: (app.loan_amount * (annual_rate / 100.0) / app.annual_income).min(1.0),
        })
    }

    /// Explain each metric against its limit.
    pub fn notes(&self, annual_rate: f64) -> Vec<MetricNote> {
        let mut out = Vec::with_capacity(3);

        out.push(if self.dti_pct > DTI_LIMIT_PCT {
            adverse(format!("DTI is high ({:.1}% > {DTI_LIMIT_PCT:.0}%)", self.dti_pct))
        } else {
            favourable(format!("DTI is acceptable ({:.1}% <= {DTI_LIMIT_PCT:.0}%)", self.dti_pct))
        });

        out.push(if self.loan_to_income > LOAN_TO_INCOME_LIMIT {
            adverse(format!(
                "Loan is large relative to income ({:.2} > {LOAN_TO_INCOME_LIMIT})",
                self.loan_to_income
            ))
        } else {
            favourable(format!(
                "Loan fits the income ({:.2} <= {LOAN_TO_INCOME_LIMIT})",
                self.loan_to_income
            ))
        });

        out.push(if annual_rate > RATE_LIMIT_PCT {
            adverse(format!("Interest rate is high ({annual_rate:.2}% > {RATE_LIMIT_PCT:.0}%)"))
        } else {
            favourable(format!(
                "Interest rate is reasonable ({annual_rate:.2}% <= {RATE_LIMIT_PCT:.0}%)"
            ))
        });

        out
    }
}

/// Installment as a percentage of monthly income.
pub fn income_commitment(installment: f64, annual_income: f64) -> f64 {
    let monthly_income = annual_income / 12.0;
    if monthly_income <= 0.0 {
        return f64::INFINITY;
    }
    installment / monthly_income * 100.0
}

fn adverse(message: String) -> MetricNote {
    MetricNote {
        adverse: true,
        message,
    }
}

fn favourable(message: String) -> MetricNote {
    MetricNote {
        adverse: false,
        message,
    }
}
