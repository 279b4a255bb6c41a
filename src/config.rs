//! Run configuration: the immutable parameter set for one annealing run.
//!
//! Parameters are typically loaded from a TOML file:
//!
//! ```toml
//! assets = ["PETR4.SA", "VALE3.SA", "ITUB4.SA"]
//! start = "2018-01-01"
//! end = "2023-03-31"
//! max_risk = 0.3
//! max_steps = 1000
//! temp_max = 2500.0
//! temp_min = 1.0
//! alpha = 0.1
//! ```

use crate::error::{AnnealError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Immutable run parameters: the asset universe, historical window, risk
/// ceiling and annealing schedule knobs.
///
/// Construct via [`RunConfig::from_file`] or the `with_*` builders, then
/// call [`validate`](RunConfig::validate) before starting a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Ordered asset universe; fixes vector indexing for all weight,
    /// return and covariance structures.
    pub assets: Vec<String>,

    /// Inclusive start of the historical window.
    pub start: NaiveDate,

    /// Exclusive end of the historical window.
    pub end: NaiveDate,

    /// Annualized volatility ceiling, fractional (0.3 = 30%).
    #[serde(default = "default_max_risk")]
    pub max_risk: f64,

    /// Step budget for the search.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Initial temperature.
    #[serde(default = "default_temp_max")]
    pub temp_max: f64,

    /// Temperature floor; the search stops when temperature drops below it.
    #[serde(default = "default_temp_min")]
    pub temp_min: f64,

    /// Initial perturbation scale, shrinking geometrically each step.
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Retry budget per perturbation step before the run aborts with
    /// `InfeasibleRegion`.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Random seed for reproducibility.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_max_risk() -> f64 {
    0.3
}
fn default_max_steps() -> usize {
    1000
}
fn default_temp_max() -> f64 {
    2500.0
}
fn default_temp_min() -> f64 {
    1.0
}
fn default_alpha() -> f64 {
    0.1
}
fn default_max_retries() -> usize {
    10_000
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            assets: Vec::new(),
            start: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2023, 3, 31).unwrap(),
            max_risk: default_max_risk(),
            max_steps: default_max_steps(),
            temp_max: default_temp_max(),
            temp_min: default_temp_min(),
            alpha: default_alpha(),
            max_retries: default_max_retries(),
            seed: None,
        }
    }
}

impl RunConfig {
    /// Loads and validates a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: RunConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assets = assets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_window(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_max_risk(mut self, max_risk: f64) -> Self {
        self.max_risk = max_risk;
        self
    }

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

    /// Validates the configuration.
    ///
    /// All failures surface as [`AnnealError::Config`] before any price
    /// data is touched.
    pub fn validate(&self) -> Result<()> {
        if self.assets.is_empty() {
            return Err(AnnealError::Config("asset list is empty".into()));
        }
        for (i, a) in self.assets.iter().enumerate() {
            if self.assets[..i].contains(a) {
                return Err(AnnealError::Config(format!("duplicate asset: {a}")));
            }
        }
        if self.start >= self.end {
            return Err(AnnealError::Config(format!(
                "start {} must precede end {}",
                self.start, self.end
            )));
        }
        if self.max_risk <= 0.0 || !self.max_risk.is_finite() {
            return Err(AnnealError::Config(format!(
                "max_risk must be positive, got {}",
                self.max_risk
            )));
        }
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
}
