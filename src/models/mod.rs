//! Default-probability models.
//!
//! Models are inference-only handles: they are built once (from constants or a
//! JSON model file) and passed by reference to whatever needs a probability.

pub mod features;
pub mod logistic;
pub mod rules;

pub use features::*;
pub use logistic::*;
pub use rules::*;

/// Anything that can turn an applicant's features into a default probability.
pub trait DefaultModel: Send + Sync {
    /// Short label for reports.
    fn name(&self) -> &str;

    /// Probability of default in `0..=1`.
    fn default_probability(&self, features: &Features) -> f64;
}
