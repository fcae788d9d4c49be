//! Application-level error type.
//!
//! Every failure that reaches `main` is an `AppError` carrying the process exit code:
//!
//! - `2`: invalid input, configuration or file I/O
//! - `3`: not enough usable data (e.g. no valid CSV rows)
//! - `4`: internal / numeric failure

use crate::math::LoanMathError;
use crate::pricing::RateError;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<RateError> for AppError {
    fn from(err: RateError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl From<LoanMathError> for AppError {
    fn from(err: LoanMathError) -> Self {
        AppError::new(2, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_error_maps_to_input_exit_code() {
        let err: AppError = RateError::InvalidInput("term_months must be > 0".to_string()).into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("term_months"));
    }
}
