//! Additive rule model.
//!
//! Each adverse payment-history flag contributes a fixed amount of default
//! probability. The same weights drive the simulator, so on simulated books the
//! rule model's output is the true default probability.

use crate::models::{DefaultModel, Feature, Features};

/// `(weight, predicate)` pairs; the probability is the sum of matching weights.
const RULES: [(f64, fn(&Features) -> bool); 6] = [
    (0.30, |f| f.get(Feature::AvgDaysLate) > 5.0),
    (0.20, |f| f.get(Feature::OnTimeRatio) < 0.8),
    (0.15, |f| f.get(Feature::CreditScore) < 600.0),
    (0.15, |f| f.get(Feature::UsesOverdraft) == 1.0),
    (0.10, |f| f.get(Feature::Inquiries6m) > 3.0),
    (0.10, |f| f.get(Feature::HasOtherLoans) == 1.0),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleModel;

impl DefaultModel for RuleModel {
    fn name(&self) -> &str {
        "rules"
    }

    fn default_probability(&self, features: &Features) -> f64 {
        let p: f64 = RULES
            .iter()
            .filter(|(_, matches)| matches(features))
            .map(|(weight, _)| weight)
            .sum();
        p.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LoanApplication;

    #[test]
    fn clean_history_has_zero_probability() {
        let app = LoanApplication::new("A1", 15_000.0, 80_000.0, 12, 850.0);
        let p = RuleModel.default_probability(&Features::from_application(&app, 15.56));
        assert_eq!(p, 0.0);
    }

    #[test]
    fn every_flag_sums_to_one() {
        let mut app = LoanApplication::new("A2", 25_000.0, 45_000.0, 48, 520.0);
        app.avg_days_late = 8.0;
        app.on_time_ratio = 0.7;
        app.uses_overdraft = true;
        app.inquiries_6m = 5;
        app.has_other_loans = true;

        let p = RuleModel.default_probability(&Features::from_application(&app, 27.56));
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn thresholds_are_strict() {
        let mut app = LoanApplication::new("A3", 1_000.0, 50_000.0, 12, 600.0);
        app.avg_days_late = 5.0;
        app.on_time_ratio = 0.8;
        app.inquiries_6m = 3;
        let p = RuleModel.default_probability(&Features::from_application(&app, 19.56));
        assert_eq!(p, 0.0);
    }
}
