//! The candidate solution: a weight vector with its derived performance
//! and fitness.
//!
//! A [`Portfolio`] is an immutable value. It is constructed only through
//! [`Portfolio::evaluate`], which computes the annualized performance and
//! the fitness together, so no partially-derived state is ever
//! observable. Changing weights means constructing a new value.

use crate::stats::{annualized_performance, ReturnStatistics};
use rand::Rng;

/// Fitness sentinel for allocations breaching the risk ceiling: a hard
/// wall, not a smooth penalty.
pub const RISK_WALL: f64 = 99_999_999.0;

/// An evaluated candidate allocation. Lower fitness is better.
#[derive(Debug, Clone)]
pub struct Portfolio {
    /// Non-negative weights in asset-universe order, summing to 1.
    pub weights: Vec<f64>,
    /// Annualized expected return.
    pub expected_return: f64,
    /// Annualized volatility.
    pub volatility: f64,
    /// Minimization objective; see [`Portfolio::evaluate`].
    pub fitness: f64,
}

impl Portfolio {
    /// Evaluates a weight vector against the run statistics.
    ///
    /// Fitness: allocations with volatility above the ceiling get the
    /// [`RISK_WALL`] sentinel; otherwise the objective is the negated
    /// risk-adjusted return, so that high return is rewarded and
    /// volatility is penalized one-for-one.
    pub fn evaluate(weights: Vec<f64>, stats: &ReturnStatistics) -> Self {
        let (volatility, expected_return) = annualized_performance(&weights, stats);

        let fitness = if volatility > stats.max_risk {
            RISK_WALL
        } else {
            // The max(0, ..) term is always zero under this branch's
            // condition; kept to mirror the original objective exactly.
            -(expected_return - volatility - 0.01 * (volatility - stats.max_risk).max(0.0))
        };

        Self {
            weights,
            expected_return,
            volatility,
            fitness,
        }
    }

    /// Draws a random starting allocation: n uniform(0,1) weights
    /// normalized to sum 1. May breach the risk ceiling; the search
    /// moves off it via feasible perturbations.
    pub fn random<R: Rng>(stats: &ReturnStatistics, rng: &mut R) -> Self {
        let raw: Vec<f64> = (0..stats.num_assets())
            .map(|_| rng.random_range(0.0..1.0))
            .collect();
        let total: f64 = raw.iter().sum();
        let weights = raw.iter().map(|w| w / total).collect();
        Self::evaluate(weights, stats)
    }
}
