//! Rule-based risk factors surfaced alongside the model's probability.

use crate::domain::LoanApplication;

pub const LATE_DAYS_LIMIT: f64 = 5.0;
pub const ON_TIME_RATIO_FLOOR: f64 = 0.8;
pub const LOW_SCORE_LIMIT: f64 = 600.0;
pub const INQUIRIES_LIMIT: u32 = 3;

/// Human-readable risk factors, in a fixed order.
pub fn risk_factors(app: &LoanApplication) -> Vec<String> {
    let mut out = Vec::new();

    if app.avg_days_late > LATE_DAYS_LIMIT {
        out.push(format!("Average of {:.1} days late on past payments", app.avg_days_late));
    }
    if app.on_time_ratio < ON_TIME_RATIO_FLOOR {
        out.push(format!(
            "Only {:.1}% of installments paid on time",
            app.on_time_ratio * 100.0
        ));
    }
    if app.credit_score < LOW_SCORE_LIMIT {
        out.push(format!("Low credit score: {:.0}", app.credit_score));
    }
    if app.uses_overdraft {
        out.push("Uses overdraft".to_string());
    }
    if app.inquiries_6m > INQUIRIES_LIMIT {
        out.push(format!("{} credit inquiries in the last 6 months", app.inquiries_6m));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_applicant_has_no_factors() {
        let app = LoanApplication::new("A1", 15_000.0, 80_000.0, 12, 850.0);
        assert!(risk_factors(&app).is_empty());
    }

    #[test]
    fn factors_are_reported_in_order() {
        let mut app = LoanApplication::new("A2", 25_000.0, 45_000.0, 48, 520.0);
        app.avg_days_late = 8.0;
        app.on_time_ratio = 0.7;
        app.uses_overdraft = true;
        app.inquiries_6m = 5;

        let factors = risk_factors(&app);
        assert_eq!(
            factors,
            vec![
                "Average of 8.0 days late on past payments",
                "Only 70.0% of installments paid on time",
                "Low credit score: 520",
                "Uses overdraft",
                "5 credit inquiries in the last 6 months",
            ]
        );
    }
}
