//! The annealing loop.

use super::config::SaParams;
use super::perturb::perturb;
use crate::error::Result;
use crate::portfolio::Portfolio;
use crate::stats::ReturnStatistics;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Per-step shrink factor of the perturbation scale, independent of the
/// temperature schedule.
const SCALE_DECAY: f64 = 0.97;

/// Result of an annealing run.
#[derive(Debug, Clone)]
pub struct SaOutcome {
    /// The best feasible portfolio found.
    pub best: Portfolio,

    /// Number of steps executed.
    pub iterations: usize,

    /// Temperature when the search stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,

    /// Best fitness sampled at regular intervals for history tracking.
    pub fitness_history: Vec<f64>,
}

/// Executes the simulated annealing search.
pub struct Annealer;

impl Annealer {
    /// Runs one search over the given statistics.
    ///
    /// The search starts from a random allocation and at every step
    /// generates an admissible neighbor, applies the Metropolis
    /// acceptance rule against the current portfolio, shrinks the
    /// perturbation scale, and recomputes the temperature from the step
    /// index. It terminates when the step budget is spent or the
    /// temperature falls below the floor, whichever comes first.
    pub fn run(stats: &ReturnStatistics, params: &SaParams) -> Result<SaOutcome> {
        params.validate()?;

        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut current = Portfolio::random(stats, &mut rng);
        let mut best = current.clone();

        let mut c_alpha = params.alpha;
        let mut temperature = params.temp_max;
        let mut step = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;

        let history_interval = (params.max_steps / 100).max(1);
        let mut fitness_history = vec![best.fitness];

        while step < params.max_steps && temperature >= params.temp_min {
            let candidate = perturb(
                &current.weights,
                c_alpha,
                stats,
                params.max_retries,
                step,
                &mut rng,
            )?;
            let delta = candidate.fitness - current.fitness;

            // Metropolis acceptance criterion
            let accept = if candidate.fitness < current.fitness {
                improving_moves += 1;
                true
            } else {
                acceptance_probability(delta, temperature) > rng.random_range(0.0..1.0)
            };

            if accept {
                current = candidate;
                accepted_moves += 1;

                if current.fitness < best.fitness {
                    best = current.clone();
                }
            }

            c_alpha *= SCALE_DECAY;
            step += 1;
            temperature = params.temperature_at(step);

            if step % history_interval == 0 {
                fitness_history.push(best.fitness);
                debug!(
                    step,
                    temperature,
                    best_fitness = best.fitness,
                    best_volatility = best.volatility,
                    "annealing progress"
                );
            }
        }

        Ok(SaOutcome {
            best,
            iterations: step,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            fitness_history,
        })
    }

    /// Runs `restarts` independent seeded searches in parallel over one
    /// shared `ReturnStatistics` and keeps the best outcome. Seeds are
    /// derived from the base seed, so the result is deterministic for a
    /// seeded parameter set.
    #[cfg(feature = "parallel")]
    pub fn run_restarts(
        stats: &ReturnStatistics,
        params: &SaParams,
        restarts: usize,
    ) -> Result<SaOutcome> {
        use crate::error::AnnealError;
        use rayon::prelude::*;

        if restarts == 0 {
            return Err(AnnealError::Config("restarts must be at least 1".into()));
        }

        let base_seed = params.seed.unwrap_or_else(rand::random);
        let outcomes: Vec<SaOutcome> = (0..restarts)
            .into_par_iter()
            .map(|i| {
                let seeded = params.clone().with_seed(base_seed.wrapping_add(i as u64));
                Self::run(stats, &seeded)
            })
            .collect::<Result<_>>()?;

        // restarts >= 1, so the reduction cannot be empty
        Ok(outcomes
            .into_iter()
            .reduce(|a, b| if b.best.fitness < a.best.fitness { b } else { a })
            .unwrap())
    }
}

/// Metropolis acceptance probability `exp(-delta / temperature)`.
///
/// A non-finite result (overflowing exponent, temperature underflow) is
/// treated as probability 0, so numeric extremes can never force an
/// incorrect acceptance; the strict-improvement branch alone decides.
fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    let p = (-delta / temperature).exp();
    if p.is_finite() {
        p
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(n: usize, means: &[f64], diag: f64, max_risk: f64) -> ReturnStatistics {
        let covariance = (0..n)
            .map(|i| (0..n).map(|j| if i == j { diag } else { 0.0 }).collect())
            .collect();
        ReturnStatistics::from_moments(
            (0..n).map(|i| format!("A{i}")).collect(),
            means.to_vec(),
            covariance,
            max_risk,
        )
    }

    fn scenario_params() -> SaParams {
        SaParams::default()
            .with_max_steps(50)
            .with_temperatures(2500.0, 1.0)
            .with_alpha(0.1)
            .with_seed(42)
    }

    #[test]
    fn test_run_terminates_within_budget() {
        let stats = stats(3, &[0.001, 0.0005, 0.0008], 1e-4, 0.3);
        let outcome = Annealer::run(&stats, &scenario_params()).unwrap();
        assert!(outcome.iterations <= 50);
        assert!(outcome.final_temperature < 2500.0);
    }

    #[test]
    fn test_run_is_deterministic_for_fixed_seed() {
        let stats = stats(3, &[0.001, 0.0005, 0.0008], 1e-4, 0.3);
        let a = Annealer::run(&stats, &scenario_params()).unwrap();
        let b = Annealer::run(&stats, &scenario_params()).unwrap();
        assert_eq!(a.best.weights, b.best.weights);
        assert_eq!(a.best.expected_return, b.best.expected_return);
        assert_eq!(a.best.volatility, b.best.volatility);
        assert_eq!(a.accepted_moves, b.accepted_moves);
    }

    #[test]
    fn test_best_respects_risk_ceiling() {
        let stats = stats(3, &[0.001, 0.0005, 0.0008], 1e-4, 0.3);
        let outcome = Annealer::run(&stats, &scenario_params()).unwrap();
        assert!(outcome.best.volatility < 0.3);
        let sum: f64 = outcome.best.weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_fitness_history_non_increasing() {
        let stats = stats(3, &[0.001, 0.0005, 0.0008], 1e-4, 0.3);
        let params = scenario_params().with_max_steps(500);
        let outcome = Annealer::run(&stats, &params).unwrap();
        for window in outcome.fitness_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best fitness must never worsen: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_dominant_asset_attracts_weight() {
        // Asset 0 strictly dominates: higher mean, lower variance.
        let covariance = vec![vec![1e-5, 0.0], vec![0.0, 4e-4]];
        let stats = ReturnStatistics::from_moments(
            vec!["WIN".into(), "LOSE".into()],
            vec![0.002, 0.0002],
            covariance,
            0.3,
        );
        // low temperatures relative to the fitness scale: the run is
        // close to pure hill climbing, so the winner's weight ratchets up
        let params = SaParams::default()
            .with_max_steps(2000)
            .with_temperatures(0.01, 1e-4)
            .with_alpha(0.1)
            .with_seed(42);
        let outcome = Annealer::run(&stats, &params).unwrap();
        assert!(
            outcome.best.weights[0] > 0.8,
            "dominant asset should carry most of the allocation, got {:?}",
            outcome.best.weights
        );
    }

    #[test]
    fn test_near_zero_ceiling_fails_fast() {
        let stats = stats(3, &[0.001, 0.0005, 0.0008], 1e-4, 1e-6);
        let params = scenario_params().with_max_retries(100);
        let err = Annealer::run(&stats, &params).unwrap_err();
        assert!(matches!(
            err,
            crate::error::AnnealError::InfeasibleRegion { .. }
        ));
    }

    #[test]
    fn test_invalid_params_rejected_before_search() {
        let stats = stats(2, &[0.001, 0.001], 1e-4, 0.3);
        let params = SaParams::default().with_temperatures(1.0, 10.0);
        assert!(Annealer::run(&stats, &params).is_err());
    }

    #[test]
    fn test_acceptance_probability_handles_extremes() {
        // improving move at any temperature: probability above 1
        assert!(acceptance_probability(-1.0, 1.0) > 1.0);
        // overflowing exponent must degrade to probability 0, not inf
        assert_eq!(acceptance_probability(-1e300, 1e-300), 0.0);
        // worsening move at tiny temperature underflows to 0
        assert_eq!(acceptance_probability(1.0, 1e-300), 0.0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_restarts_no_worse_than_single() {
        let stats = stats(3, &[0.001, 0.0005, 0.0008], 1e-4, 0.3);
        let params = scenario_params().with_max_steps(200);
        let single = Annealer::run(&stats, &params).unwrap();
        let multi = Annealer::run_restarts(&stats, &params, 4).unwrap();
        assert!(multi.best.fitness <= single.best.fitness);
    }
}
