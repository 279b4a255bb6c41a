//! Simulated annealing search over portfolio weight vectors.
//!
//! A single-solution trajectory search: starting from a random
//! allocation, each step perturbs the current weights, evaluates the
//! candidate under the Metropolis criterion, and cools the temperature
//! along an exponential schedule recomputed from the step index. Worse
//! candidates are accepted with a probability that decays with
//! temperature, so the search explores early and hill-climbs late.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Markowitz (1952), "Portfolio Selection"

mod config;
mod perturb;
mod runner;

pub use config::SaParams;
pub use perturb::perturb;
pub use runner::{Annealer, SaOutcome};
