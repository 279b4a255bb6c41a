//! Annealing schedule parameters.

use crate::config::RunConfig;
use crate::error::{AnnealError, Result};

/// Parameters of the annealing search: step budget, temperature range,
/// initial perturbation scale and the per-step retry budget.
///
/// # Examples
///
/// ```
/// use portfolio_annealer::sa::SaParams;
///
/// let params = SaParams::default()
///     .with_max_steps(500)
///     .with_temperatures(2500.0, 1.0)
///     .with_alpha(0.1)
///     .with_seed(42);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SaParams {
    /// Step budget; the search runs at most this many iterations.
    pub max_steps: usize,

    /// Initial temperature. Higher values allow more exploration.
    pub temp_max: f64,

    /// Temperature floor. The search stops when temperature drops below it.
    pub temp_min: f64,

    /// Initial perturbation scale; shrinks by a factor of 0.97 each step.
    pub alpha: f64,

    /// Perturbation retry budget per step before the run aborts with
    /// `InfeasibleRegion`.
    pub max_retries: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaParams {
    fn default() -> Self {
        Self {
            max_steps: 1000,
            temp_max: 2500.0,
            temp_min: 1.0,
            alpha: 0.1,
            max_retries: 10_000,
            seed: None,
        }
    }
}

impl From<&RunConfig> for SaParams {
    fn from(config: &RunConfig) -> Self {
        Self {
            max_steps: config.max_steps,
            temp_max: config.temp_max,
            temp_min: config.temp_min,
            alpha: config.alpha,
            max_retries: config.max_retries,
            seed: config.seed,
        }
    }
}

impl SaParams {
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_temperatures(mut self, temp_max: f64, temp_min: f64) -> Self {
        self.temp_max = temp_max;
        self.temp_min = temp_min;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the parameters.
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(AnnealError::Config("max_steps must be at least 1".into()));
        }
        if self.temp_min <= 0.0 {
            return Err(AnnealError::Config(format!(
                "temp_min must be positive, got {}",
                self.temp_min
            )));
        }
        if self.temp_min >= self.temp_max {
            return Err(AnnealError::Config(format!(
                "temp_min {} must be less than temp_max {}",
                self.temp_min, self.temp_max
            )));
        }
        if self.alpha <= 0.0 || !self.alpha.is_finite() {
            return Err(AnnealError::Config(format!(
                "alpha must be positive, got {}",
                self.alpha
            )));
        }
        if self.max_retries == 0 {
            return Err(AnnealError::Config("max_retries must be at least 1".into()));
        }
        Ok(())
    }

    /// Constant exponent of the cooling schedule: `-ln(temp_max / temp_min)`.
    /// Negative for any valid parameter set.
    pub fn tfactor(&self) -> f64 {
        -(self.temp_max / self.temp_min).ln()
    }

    /// Temperature at a given step, recomputed from the step index
    /// rather than multiplicatively accumulated, so the schedule carries
    /// no floating-point drift:
    ///
    /// `temperature(step) = temp_max * exp(tfactor * step / max_steps)`
    ///
    /// Geometric decay with `temperature(0) = temp_max` and
    /// `temperature(max_steps) = temp_min` by construction.
    pub fn temperature_at(&self, step: usize) -> f64 {
        self.temp_max * (self.tfactor() * step as f64 / self.max_steps as f64).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ok() {
        assert!(SaParams::default().validate().is_ok());
    }

    #[test]
    fn test_validate_min_ge_max() {
        let params = SaParams::default().with_temperatures(1.0, 10.0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_zero_steps() {
        assert!(SaParams::default().with_max_steps(0).validate().is_err());
    }

    #[test]
    fn test_validate_bad_alpha() {
        assert!(SaParams::default().with_alpha(0.0).validate().is_err());
    }

    #[test]
    fn test_schedule_endpoints() {
        let params = SaParams::default()
            .with_max_steps(50)
            .with_temperatures(2500.0, 1.0);
        assert!((params.temperature_at(0) - 2500.0).abs() < 1e-9);
        assert!((params.temperature_at(50) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_schedule_strictly_decreasing() {
        let params = SaParams::default()
            .with_max_steps(100)
            .with_temperatures(2500.0, 1.0);
        for step in 0..100 {
            assert!(
                params.temperature_at(step + 1) < params.temperature_at(step),
                "temperature must strictly decrease at step {step}"
            );
        }
    }

    #[test]
    fn test_from_run_config() {
        let config = crate::config::RunConfig::default()
            .with_assets(["AAA"])
            .with_max_steps(77)
            .with_temperatures(100.0, 0.5)
            .with_seed(9);
        let params = SaParams::from(&config);
        assert_eq!(params.max_steps, 77);
        assert_eq!(params.seed, Some(9));
        assert!((params.temp_min - 0.5).abs() < 1e-12);
    }
}
