//! Risk-capped portfolio allocation via simulated annealing.
//!
//! Searches for the weight allocation over a fixed asset universe that
//! maximizes risk-adjusted return subject to a hard annualized
//! volatility ceiling, using historical return statistics:
//!
//! - **[`market`]**: aligned historical price series and the
//!   market-data provider boundary (CSV-backed by default).
//! - **[`stats`]**: mean daily returns and the return covariance matrix
//!   derived once per run, plus annualized performance for any weight
//!   vector (standard Markowitz mean-variance formulation).
//! - **[`portfolio`]**: the immutable candidate value — weights,
//!   annualized performance and fitness, derived atomically.
//! - **[`sa`]**: the annealing search itself — exponential temperature
//!   schedule, perturbation operator with a feasibility pre-filter, and
//!   the Metropolis acceptance rule.
//! - **[`report`]**: plain-text rendering and persistence of the best
//!   allocation found.
//!
//! One batch run produces one static allocation from one historical
//! window; with the `parallel` feature, independent seeded restarts can
//! share a single immutable [`stats::ReturnStatistics`].
//!
//! # Example
//!
//! ```
//! use portfolio_annealer::sa::{Annealer, SaParams};
//! use portfolio_annealer::stats::ReturnStatistics;
//!
//! let stats = ReturnStatistics::from_moments(
//!     vec!["AAA".into(), "BBB".into()],
//!     vec![0.001, 0.0005],
//!     vec![vec![1e-4, 0.0], vec![0.0, 1e-4]],
//!     0.3,
//! );
//! let params = SaParams::default().with_max_steps(200).with_seed(42);
//! let outcome = Annealer::run(&stats, &params).unwrap();
//! assert!(outcome.best.volatility < 0.3);
//! ```

pub mod config;
pub mod error;
pub mod market;
pub mod portfolio;
pub mod report;
pub mod sa;
pub mod stats;

pub use config::RunConfig;
pub use error::{AnnealError, Result};
