//! Rate grids: the engine evaluated over a set of scores × terms.

use serde::Serialize;

use crate::pricing::{RateEngine, RateError};

/// Standard term offers (months).
pub const OFFERED_TERMS: [u32; 6] = [12, 18, 24, 36, 48, 60];

/// `rates[i][j]` is the rate for `scores[i]` and `terms[j]`.
#[derive(Debug, Clone, Serialize)]
pub struct RateGrid {
    pub scores: Vec<f64>,
    pub terms: Vec<f64>,
    pub rates: Vec<Vec<f64>>,
}

pub fn rate_grid(engine: &RateEngine, scores: &[f64], terms: &[f64]) -> Result<RateGrid, RateError> {
    let mut rates = Vec::with_capacity(scores.len());
    for &score in scores {
        let row = terms
            .iter()
            .map(|&term| engine.rate(score, term))
            .collect::<Result<Vec<_>, _>>()?;
        rates.push(row);
    }

    Ok(RateGrid {
        scores: scores.to_vec(),
        terms: terms.to_vec(),
        rates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_matches_point_quotes() {
        let engine = RateEngine::default();
        let terms: Vec<f64> = OFFERED_TERMS.iter().map(|&t| t as f64).collect();
        let grid = rate_grid(&engine, &[450.0, 850.0], &terms).unwrap();

        assert_eq!(grid.rates.len(), 2);
        assert_eq!(grid.rates[0].len(), OFFERED_TERMS.len());
        assert!((grid.rates[1][0] - 15.56).abs() < 1e-9);
        assert!((grid.rates[0][5] - 29.56).abs() < 1e-9);
    }

    #[test]
    fn grid_propagates_invalid_input() {
        let engine = RateEngine::default();
        assert!(rate_grid(&engine, &[700.0], &[12.0, 0.0]).is_err());
    }
}
