//! Equal-installment (French / Price table) amortization.
//!
//! Given a principal `P`, a monthly rate `r` and `n` monthly payments, the fixed
//! installment is:
//!
//! ```text
//! PMT = P * r (1 + r)^n / ((1 + r)^n - 1)
//! ```
//!
//! with the limit `PMT = P / n` when `r = 0`. It is evaluated as
//! `P * r / (1 - (1 + r)^-n)` so long terms do not overflow `(1 + r)^n`.
//!
//! Annual rates are converted to monthly rates by compound equivalence,
//! `r = (1 + annual)^(1/12) - 1`, not by dividing by 12.

use chrono::{Months, NaiveDate};
use serde::Serialize;

/// Longest accepted term (50 years).
pub const MAX_TERM_MONTHS: u32 = 600;

/// Loan math failures (bad principal, term or rate).
#[derive(Debug, Clone, PartialEq)]
pub enum LoanMathError {
    InvalidPrincipal(f64),
    InvalidTerm(u32),
    InvalidRate(f64),
    /// The plan overflowed `f64` (e.g. an enormous principal).
    NonFinite,
}

impl std::fmt::Display for LoanMathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoanMathError::InvalidPrincipal(v) => {
                write!(f, "Loan amount must be finite and > 0, got {v}")
            }
            LoanMathError::InvalidTerm(v) => write!(
                f,
                "Loan term must be within 1..={MAX_TERM_MONTHS} months, got {v}"
            ),
            LoanMathError::InvalidRate(v) => {
                write!(f, "Annual rate must be finite and > -100%, got {v}")
            }
            LoanMathError::NonFinite => write!(f, "Loan plan is not representable (overflow)"),
        }
    }
}

impl std::error::Error for LoanMathError {}

/// One month of the amortization schedule.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub due_date: Option<NaiveDate>,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    /// Outstanding balance after this payment (floored at 0).
    pub balance: f64,
}

/// Full payment plan for a loan.
#[derive(Debug, Clone, Serialize)]
pub struct InstallmentPlan {
    pub principal: f64,
    /// Annual rate in percent.
    pub annual_rate: f64,
    /// Monthly rate as a decimal.
    pub monthly_rate: f64,
    pub months: u32,
    pub installment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
    pub schedule: Vec<ScheduleRow>,
}

/// Convert an annual percentage rate into the equivalent monthly decimal rate.
pub fn monthly_rate(annual_pct: f64) -> Result<f64, LoanMathError> {
    if !(annual_pct.is_finite() && annual_pct > -100.0) {
        return Err(LoanMathError::InvalidRate(annual_pct));
    }
    // (1 + a)^(1/12) - 1 computed via ln_1p / exp_m1 to keep precision for small rates.
    Ok(((annual_pct / 100.0).ln_1p() / 12.0).exp_m1())
}

/// Fixed monthly installment.
pub fn installment(principal: f64, monthly_rate: f64, months: u32) -> Result<f64, LoanMathError> {
    if !(principal.is_finite() && principal > 0.0) {
        return Err(LoanMathError::InvalidPrincipal(principal));
    }
    if months == 0 || months > MAX_TERM_MONTHS {
        return Err(LoanMathError::InvalidTerm(months));
    }
    if !(monthly_rate.is_finite() && monthly_rate > -1.0) {
        return Err(LoanMathError::InvalidRate(monthly_rate));
    }

    let n = months as f64;
    if monthly_rate.abs() < 1e-15 {
        return Ok(principal / n);
    }

    let discount = (1.0 + monthly_rate).powf(-n);
    let pmt = principal * monthly_rate / (1.0 - discount);
    if pmt.is_finite() && pmt > 0.0 {
        Ok(pmt)
    } else {
        Err(LoanMathError::NonFinite)
    }
}

/// `(total_paid, total_interest)` over the life of the loan.
pub fn total_cost(installment: f64, months: u32, principal: f64) -> (f64, f64) {
    let total_paid = installment * months as f64;
    (total_paid, total_paid - principal)
}

/// Build the full plan, optionally dating each installment from `first_due`.
pub fn amortization_schedule(
    principal: f64,
    annual_pct: f64,
    months: u32,
    first_due: Option<NaiveDate>,
) -> Result<InstallmentPlan, LoanMathError> {
    let r = monthly_rate(annual_pct)?;
    let pmt = installment(principal, r, months)?;
    let (total_paid, total_interest) = total_cost(pmt, months, principal);
    if !(total_paid.is_finite() && total_interest.is_finite()) {
        return Err(LoanMathError::NonFinite);
    }

    let mut schedule = Vec::with_capacity(months as usize);
    let mut balance = principal;
    for month in 1..=months {
        let interest = balance * r;
        let amortized = pmt - interest;
        balance -= amortized;

        if !balance.is_finite() {
            return Err(LoanMathError::NonFinite);
        }

        let due_date = first_due.and_then(|d| d.checked_add_months(Months::new(month - 1)));
        schedule.push(ScheduleRow {
            month,
            due_date,
            payment: pmt,
            principal: amortized,
            interest,
            balance: balance.max(0.0),
        });
    }

    Ok(InstallmentPlan {
        principal,
        annual_rate: annual_pct,
        monthly_rate: r,
        months,
        installment: pmt,
        total_paid,
        total_interest,
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_rate_is_compound_equivalent() {
        let r = monthly_rate(19.56).unwrap();
        assert!((r - 0.015).abs() < 1e-4, "got {r}");
        let back = (1.0 + r).powi(12) - 1.0;
        assert!((back - 0.1956).abs() < 1e-12);
        assert_eq!(monthly_rate(0.0).unwrap(), 0.0);
        assert!(monthly_rate(-100.0).is_err());
        assert!(monthly_rate(f64::NAN).is_err());
    }

    #[test]
    fn zero_rate_splits_principal_evenly() {
        let pmt = installment(1200.0, 0.0, 12).unwrap();
        assert!((pmt - 100.0).abs() < 1e-12);
    }

    #[test]
    fn installment_matches_closed_form() {
        // 10_000 at 1% a month over 12 months: textbook value 888.49.
        let pmt = installment(10_000.0, 0.01, 12).unwrap();
        assert!((pmt - 888.4879).abs() < 1e-3, "got {pmt}");
    }

    #[test]
    fn installment_rejects_bad_inputs() {
        assert_eq!(
            installment(0.0, 0.01, 12),
            Err(LoanMathError::InvalidPrincipal(0.0))
        );
        assert_eq!(installment(100.0, 0.01, 0), Err(LoanMathError::InvalidTerm(0)));
        assert_eq!(
            installment(100.0, 0.01, MAX_TERM_MONTHS + 1),
            Err(LoanMathError::InvalidTerm(MAX_TERM_MONTHS + 1))
        );
    }

    #[test]
    fn long_terms_are_rejected_before_allocating() {
        assert_eq!(
            amortization_schedule(10_000.0, 29.56, 40_000, None).unwrap_err(),
            LoanMathError::InvalidTerm(40_000)
        );
        assert_eq!(
            amortization_schedule(10_000.0, 29.56, u32::MAX, None).unwrap_err(),
            LoanMathError::InvalidTerm(u32::MAX)
        );
    }

    #[test]
    fn longest_term_stays_finite() {
        let plan = amortization_schedule(10_000.0, 29.56, MAX_TERM_MONTHS, None).unwrap();
        assert!(plan.installment.is_finite());
        assert!(plan.total_paid.is_finite());
        let last = plan.schedule.last().unwrap();
        assert!(last.balance.abs() < 1e-3, "final balance {}", last.balance);
    }

    #[test]
    fn overflowing_totals_are_an_error() {
        assert_eq!(
            amortization_schedule(f64::MAX, 50.0, 12, None).unwrap_err(),
            LoanMathError::NonFinite
        );
    }

    #[test]
    fn schedule_pays_off_the_loan() {
        let plan = amortization_schedule(20_000.0, 19.56, 24, None).unwrap();
        assert_eq!(plan.schedule.len(), 24);

        let last = plan.schedule.last().unwrap();
        assert!(last.balance.abs() < 1e-6, "final balance {}", last.balance);

        let principal_paid: f64 = plan.schedule.iter().map(|r| r.principal).sum();
        assert!((principal_paid - 20_000.0).abs() < 1e-6);

        let interest_paid: f64 = plan.schedule.iter().map(|r| r.interest).sum();
        assert!((interest_paid - plan.total_interest).abs() < 1e-6);
        assert!(plan.total_paid > plan.principal);

        // Interest share shrinks as the balance amortizes.
        assert!(plan.schedule[0].interest > plan.schedule[23].interest);
    }

    #[test]
    fn schedule_dates_advance_by_calendar_month() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let plan = amortization_schedule(1_000.0, 12.0, 3, Some(start)).unwrap();
        let dates: Vec<_> = plan.schedule.iter().map(|r| r.due_date.unwrap()).collect();
        assert_eq!(dates[0], start);
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        assert_eq!(dates[2], NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
    }
}
