//! Error types for the annealing run.

use thiserror::Error;

/// Main error type for a portfolio annealing run.
#[derive(Error, Debug)]
pub enum AnnealError {
    /// Malformed or inconsistent run parameters. Raised before any
    /// computation starts.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Insufficient or misaligned historical price data.
    #[error("data error: {0}")]
    Data(String),

    /// The perturbation operator exhausted its retry budget without
    /// finding a candidate inside the volatility ceiling.
    #[error("infeasible region: no admissible candidate after {retries} retries at step {step}")]
    InfeasibleRegion { step: usize, retries: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for annealing operations.
pub type Result<T> = std::result::Result<T, AnnealError>;
