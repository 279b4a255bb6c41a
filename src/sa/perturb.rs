//! Neighbor generation: the perturbation operator.

use crate::error::{AnnealError, Result};
use crate::portfolio::Portfolio;
use crate::stats::ReturnStatistics;
use rand::seq::index::sample;
use rand::Rng;

/// Floor applied to every weight before renormalization; prevents an
/// asset from being starved out of the allocation entirely.
const WEIGHT_FLOOR: f64 = 0.01;

/// Clamps every component to `[0.01, 1.0]`, then renormalizes so the
/// components sum to 1.
fn clamp_normalize(weights: &mut [f64]) {
    for w in weights.iter_mut() {
        *w = w.clamp(WEIGHT_FLOOR, 1.0);
    }
    let total: f64 = weights.iter().sum();
    for w in weights.iter_mut() {
        *w /= total;
    }
}

/// Generates one admissible neighbor of `base`.
///
/// A candidate is built by nudging one random weight by a uniform delta
/// in `[-c_alpha, c_alpha]`, swapping two distinct random weights,
/// clamping, and renormalizing. Candidates whose volatility reaches the
/// risk ceiling are discarded and regenerated from the same base until
/// an admissible one is found or the retry budget runs out, in which
/// case the step fails with [`AnnealError::InfeasibleRegion`].
pub fn perturb<R: Rng>(
    base: &[f64],
    c_alpha: f64,
    stats: &ReturnStatistics,
    max_retries: usize,
    step: usize,
    rng: &mut R,
) -> Result<Portfolio> {
    let n = base.len();

    for _ in 0..max_retries {
        let mut weights = base.to_vec();

        let idx = rng.random_range(0..n);
        weights[idx] += rng.random_range(-c_alpha..c_alpha);

        // Independent of the nudge above: swap two distinct weights.
        if n >= 2 {
            let pair = sample(rng, n, 2);
            weights.swap(pair.index(0), pair.index(1));
        }

        clamp_normalize(&mut weights);

        let candidate = Portfolio::evaluate(weights, stats);
        if candidate.volatility < stats.max_risk {
            return Ok(candidate);
        }
    }

    Err(AnnealError::InfeasibleRegion {
        step,
        retries: max_retries,
    })
}
