//! Synthetic loan application generation.
//!
//! Every field is drawn uniformly from a plausible range; the observed outcome is
//! a Bernoulli draw whose probability is the rule model's output for the drawn
//! applicant. Generation is deterministic for a given seed, and a smaller book
//! is a prefix of a larger one with the same seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Bernoulli, Uniform};
use tracing::debug;

use crate::domain::LoanApplication;
use crate::error::AppError;
use crate::models::{DefaultModel, Features, RuleModel};
use crate::pricing::OFFERED_TERMS;

/// Settings for `simulate_applications`.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub count: usize,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            seed: 42,
        }
    }
}

pub fn simulate_applications(config: &SimulationConfig) -> Result<Vec<LoanApplication>, AppError> {
    if config.count == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);

    let loan_amount = Uniform::new(1_000.0, 40_000.0);
    let annual_income = Uniform::new(30_000.0, 150_000.0);
    let avg_days_late = Uniform::new(0.0, 30.0);
    let unit = Uniform::new(0.0, 1.0);
    let max_days_late = Uniform::new(0.0, 90.0);
    let account_age = Uniform::new(0.0, 20.0);
    let avg_balance = Uniform::new(-1_000.0, 50_000.0);
    let credit_score = Uniform::new(0.0, 1000.0);
    let debt_share = Uniform::new(0.0, 0.5);

    let model = RuleModel;
    let mut out = Vec::with_capacity(config.count);

    for i in 0..config.count {
        let income = annual_income.sample(&mut rng);
        let term = OFFERED_TERMS[rng.gen_range(0..OFFERED_TERMS.len())];

        let mut app = LoanApplication {
            id: format!("SIM-{:05}", i + 1),
            loan_amount: loan_amount.sample(&mut rng),
            annual_income: income,
            term_months: term,
            credit_score: credit_score.sample(&mut rng),
            existing_debt: income * debt_share.sample(&mut rng),
            avg_days_late: avg_days_late.sample(&mut rng),
            on_time_ratio: unit.sample(&mut rng),
            max_days_late: max_days_late.sample(&mut rng),
            account_age_years: account_age.sample(&mut rng),
            avg_balance: avg_balance.sample(&mut rng),
            uses_overdraft: rng.gen_bool(0.5),
            inquiries_6m: rng.gen_range(0..10),
            has_other_loans: rng.gen_bool(0.5),
            defaulted: None,
        };

        // The rule model ignores the rate, so 0.0 is a safe placeholder here.
        let p = model.default_probability(&Features::from_application(&app, 0.0));
        let outcome = Bernoulli::new(p)
            .map_err(|e| AppError::new(4, format!("Default distribution error: {e}")))?;
        app.defaulted = Some(outcome.sample(&mut rng));

        out.push(app);
    }

    debug!(count = out.len(), seed = config.seed, "simulated applications");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_book() {
        let cfg = SimulationConfig { count: 50, seed: 7 };
        let a = simulate_applications(&cfg).unwrap();
        let b = simulate_applications(&cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn smaller_book_is_a_prefix() {
        let small = simulate_applications(&SimulationConfig { count: 10, seed: 1 }).unwrap();
        let large = simulate_applications(&SimulationConfig { count: 30, seed: 1 }).unwrap();
        assert_eq!(small[..], large[..10]);
    }

    #[test]
    fn fields_stay_in_range() {
        let book = simulate_applications(&SimulationConfig { count: 500, seed: 42 }).unwrap();
        for app in &book {
            assert!((1_000.0..40_000.0).contains(&app.loan_amount));
            assert!((30_000.0..150_000.0).contains(&app.annual_income));
            assert!((0.0..1000.0).contains(&app.credit_score));
            assert!((0.0..=1.0).contains(&app.on_time_ratio));
            assert!(app.inquiries_6m < 10);
            assert!(OFFERED_TERMS.contains(&app.term_months));
            assert!(app.defaulted.is_some());
        }
    }

    #[test]
    fn zero_count_is_rejected() {
        assert!(simulate_applications(&SimulationConfig { count: 0, seed: 1 }).is_err());
    }
}
