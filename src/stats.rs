//! Return statistics derived from a historical price series.
//!
//! Computed once per run and shared by reference: the mean daily return
//! per asset and the sample covariance matrix of daily returns, plus the
//! risk ceiling the fitness function enforces. Never mutated mid-run.

use crate::error::{AnnealError, Result};
use crate::market::PriceSeries;

/// Trading days per year, the annualization factor.
pub const TRADING_DAYS: f64 = 252.0;

/// Per-asset mean daily returns and their covariance matrix, in the
/// asset ordering of the originating [`PriceSeries`].
#[derive(Debug, Clone)]
pub struct ReturnStatistics {
    /// Ordered asset universe; fixes indexing of the vectors below.
    pub assets: Vec<String>,
    /// Mean daily fractional return per asset.
    pub mean_returns: Vec<f64>,
    /// Sample covariance (n-1 denominator) of daily returns, symmetric.
    pub covariance: Vec<Vec<f64>>,
    /// Annualized volatility ceiling carried alongside the statistics.
    pub max_risk: f64,
}

impl ReturnStatistics {
    /// Derives statistics from aligned prices.
    ///
    /// Daily returns are simple day-over-day percentage changes, with
    /// the first (undefined) observation dropped. Fails with a data
    /// error if fewer than 2 aligned observations remain.
    pub fn from_prices(series: &PriceSeries, max_risk: f64) -> Result<Self> {
        let n_obs = series.len();
        let n_assets = series.assets.len();
        if n_obs < 2 {
            return Err(AnnealError::Data(format!(
                "need at least 2 aligned observations, got {n_obs}"
            )));
        }

        // returns[t][a] = prices[t+1][a] / prices[t][a] - 1
        let returns: Vec<Vec<f64>> = series
            .prices
            .windows(2)
            .map(|w| {
                (0..n_assets)
                    .map(|a| w[1][a] / w[0][a] - 1.0)
                    .collect()
            })
            .collect();
        let n = returns.len() as f64;

        let mean_returns: Vec<f64> = (0..n_assets)
            .map(|a| returns.iter().map(|row| row[a]).sum::<f64>() / n)
            .collect();

        // Sample covariance, matching the (n-1) denominator of the
        // statistics the mean/covariance pair is usually quoted with.
        let covariance: Vec<Vec<f64>> = (0..n_assets)
            .map(|i| {
                (0..n_assets)
                    .map(|j| {
                        returns
                            .iter()
                            .map(|row| (row[i] - mean_returns[i]) * (row[j] - mean_returns[j]))
                            .sum::<f64>()
                            / (n - 1.0).max(1.0)
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            assets: series.assets.clone(),
            mean_returns,
            covariance,
            max_risk,
        })
    }

    /// Builds statistics directly from precomputed moments. Used by
    /// tests and synthetic benchmarks.
    pub fn from_moments(
        assets: Vec<String>,
        mean_returns: Vec<f64>,
        covariance: Vec<Vec<f64>>,
        max_risk: f64,
    ) -> Self {
        Self {
            assets,
            mean_returns,
            covariance,
            max_risk,
        }
    }

    /// Number of assets in the universe.
    pub fn num_assets(&self) -> usize {
        self.assets.len()
    }
}

/// Annualized (volatility, expected return) for a weight vector under
/// the given statistics.
///
/// Pure; valid for any weight vector matching the asset ordering of
/// `stats`. Does not itself enforce that weights sum to 1 — that
/// contract is on the caller.
pub fn annualized_performance(weights: &[f64], stats: &ReturnStatistics) -> (f64, f64) {
    let expected_return: f64 = weights
        .iter()
        .zip(&stats.mean_returns)
        .map(|(w, m)| w * m)
        .sum::<f64>()
        * TRADING_DAYS;

    // w' Σ w
    let variance: f64 = stats
        .covariance
        .iter()
        .zip(weights)
        .map(|(row, wi)| wi * row.iter().zip(weights).map(|(c, wj)| c * wj).sum::<f64>())
        .sum();
    let volatility = variance.sqrt() * TRADING_DAYS.sqrt();

    (volatility, expected_return)
}
