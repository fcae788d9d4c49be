//! Logistic default model loaded from coefficients.
//!
//! `p = sigmoid(intercept + Σ β_j x_j)`
//!
//! Coefficients come from an external training run and are stored in a JSON
//! model file keyed by feature name. Features absent from the file get a zero
//! coefficient; unknown names are rejected.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::math::sigmoid;
use crate::models::{DefaultModel, Feature, Features, FEATURE_COUNT};

/// On-disk model schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    #[serde(default)]
    pub name: Option<String>,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

#[derive(Debug, Clone)]
pub struct LogisticModel {
    name: String,
    coefficients: DVector<f64>,
    intercept: f64,
}

impl LogisticModel {
    /// Build a model with coefficients already in `Feature::ALL` order.
    pub fn new(coefficients: [f64; FEATURE_COUNT], intercept: f64) -> Result<Self, AppError> {
        if !(intercept.is_finite() && coefficients.iter().all(|c| c.is_finite())) {
            return Err(AppError::new(2, "Model coefficients must be finite."));
        }
        Ok(Self {
            name: "logistic".to_string(),
            coefficients: DVector::from_row_slice(&coefficients),
            intercept,
        })
    }

    /// Align a model file's named coefficients to the feature order.
    pub fn from_file(file: &ModelFile) -> Result<Self, AppError> {
        if file.feature_names.len() != file.coefficients.len() {
            return Err(AppError::new(
                2,
                format!(
                    "Model file has {} feature names but {} coefficients.",
                    file.feature_names.len(),
                    file.coefficients.len()
                ),
            ));
        }

        let mut aligned = [0.0; FEATURE_COUNT];
        let mut seen = [false; FEATURE_COUNT];
        for (name, &coef) in file.feature_names.iter().zip(&file.coefficients) {
            let feature = Feature::from_name(name)
                .ok_or_else(|| AppError::new(2, format!("Unknown model feature: `{name}`")))?;
            let idx = feature as usize;
            if seen[idx] {
                return Err(AppError::new(2, format!("Duplicate model feature: `{name}`")));
            }
            seen[idx] = true;
            aligned[idx] = coef;
        }

        let mut model = Self::new(aligned, file.intercept)?;
        if let Some(name) = &file.name {
            model.name = name.clone();
        }
        Ok(model)
    }

    pub fn coefficient(&self, feature: Feature) -> f64 {
        self.coefficients[feature as usize]
    }
}

impl DefaultModel for LogisticModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_probability(&self, features: &Features) -> f64 {
        let x = DVector::from_row_slice(features.as_slice());
        sigmoid(self.intercept + self.coefficients.dot(&x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LoanApplication;

    fn file(names: &[&str], coefs: &[f64], intercept: f64) -> ModelFile {
        ModelFile {
            name: None,
            feature_names: names.iter().map(|s| s.to_string()).collect(),
            coefficients: coefs.to_vec(),
            intercept,
        }
    }

    #[test]
    fn intercept_only_model() {
        let model = LogisticModel::from_file(&file(&[], &[], 0.0)).unwrap();
        let app = LoanApplication::new("A1", 10_000.0, 50_000.0, 12, 700.0);
        let p = model.default_probability(&Features::from_application(&app, 17.56));
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn coefficients_align_by_name() {
        let model = LogisticModel::from_file(&file(
            &["credit_score", "uses_overdraft"],
            &[-0.01, 2.0],
            5.0,
        ))
        .unwrap();
        assert_eq!(model.coefficient(Feature::CreditScore), -0.01);
        assert_eq!(model.coefficient(Feature::UsesOverdraft), 2.0);
        assert_eq!(model.coefficient(Feature::LoanAmount), 0.0);

        let mut app = LoanApplication::new("A1", 10_000.0, 50_000.0, 12, 500.0);
        let base = model.default_probability(&Features::from_application(&app, 19.56));
        // 5 - 0.01 * 500 = 0
        assert!((base - 0.5).abs() < 1e-12);

        app.uses_overdraft = true;
        let worse = model.default_probability(&Features::from_application(&app, 19.56));
        assert!(worse > base);
    }

    #[test]
    fn derived_features_align_by_name() {
        let model = LogisticModel::from_file(&file(
            &["dti", "loan_to_income", "int_rate_x_loan_to_income", "risk_score"],
            &[0.02, 1.5, 0.1, -0.05],
            -1.0,
        ))
        .unwrap();
        assert_eq!(model.coefficient(Feature::Dti), 0.02);
        assert_eq!(model.coefficient(Feature::RiskScore), -0.05);
        assert_eq!(model.coefficient(Feature::CreditScore), 0.0);

        let mut app = LoanApplication::new("A1", 10_000.0, 50_000.0, 12, 700.0);
        app.existing_debt = 5_000.0;
        let f = Features::from_application(&app, 17.56);

        let z = -1.0
            + 0.02 * f.get(Feature::Dti)
            + 1.5 * f.get(Feature::LoanToIncome)
            + 0.1 * f.get(Feature::IntRateXLoanToIncome)
            - 0.05 * f.get(Feature::RiskScore);
        assert!((model.default_probability(&f) - sigmoid(z)).abs() < 1e-12);
    }

    #[test]
    fn rejects_malformed_files() {
        assert!(LogisticModel::from_file(&file(&["credit_score"], &[], 0.0)).is_err());
        assert!(LogisticModel::from_file(&file(&["grade_b"], &[1.0], 0.0)).is_err());
        assert!(
            LogisticModel::from_file(&file(&["credit_score", "credit_score"], &[1.0, 1.0], 0.0))
                .is_err()
        );
        assert!(LogisticModel::from_file(&file(&[], &[], f64::NAN)).is_err());
    }
}
