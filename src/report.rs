//! Plain-text run report: rendering and persistence of the best
//! allocation found.

use crate::error::Result;
use crate::sa::SaOutcome;
use crate::stats::ReturnStatistics;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

/// Human-readable summary of an annealing run.
pub struct RunReport<'a> {
    outcome: &'a SaOutcome,
    stats: &'a ReturnStatistics,
}

impl<'a> RunReport<'a> {
    pub fn new(outcome: &'a SaOutcome, stats: &'a ReturnStatistics) -> Self {
        Self { outcome, stats }
    }

    /// Renders the report: per-asset weight percentages (3 decimals),
    /// the best annualized return and volatility, and the fitness
    /// sign-flipped so that higher is better for the reader.
    pub fn render(&self) -> String {
        let best = &self.outcome.best;
        let mut out = String::new();

        out.push_str("Best weight distribution:\n\n");
        for (asset, weight) in self.stats.assets.iter().zip(&best.weights) {
            let _ = writeln!(out, "{asset}: {:.3}", weight * 100.0);
        }
        out.push_str("\nResults:\n\n");
        let _ = writeln!(out, "Best return: {}", best.expected_return);
        let _ = writeln!(out, "Best risk: {}", best.volatility);
        let _ = writeln!(out, "Best fitness: {}", -best.fitness);

        out
    }

    /// Persists the rendered report to a text file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.render())?;
        info!(path = %path.display(), "report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::Portfolio;

    fn fixture() -> (SaOutcome, ReturnStatistics) {
        let stats = ReturnStatistics::from_moments(
            vec!["AAA".into(), "BBB".into()],
            vec![0.001, 0.0005],
            vec![vec![1e-4, 0.0], vec![0.0, 1e-4]],
            0.3,
        );
        let best = Portfolio::evaluate(vec![0.75, 0.25], &stats);
        let outcome = SaOutcome {
            best,
            iterations: 10,
            final_temperature: 1.0,
            accepted_moves: 5,
            improving_moves: 3,
            fitness_history: vec![],
        };
        (outcome, stats)
    }

    #[test]
    fn test_render_lists_weights_as_percentages() {
        let (outcome, stats) = fixture();
        let report = RunReport::new(&outcome, &stats).render();
        assert!(report.contains("AAA: 75.000"), "report was:\n{report}");
        assert!(report.contains("BBB: 25.000"));
    }

    #[test]
    fn test_render_flips_fitness_sign() {
        let (outcome, stats) = fixture();
        let report = RunReport::new(&outcome, &stats).render();
        let displayed = -outcome.best.fitness;
        assert!(displayed > 0.0, "feasible fitness should display positive");
        assert!(report.contains(&format!("Best fitness: {displayed}")));
    }

    #[test]
    fn test_write_to_persists_rendered_text() {
        let (outcome, stats) = fixture();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");
        let report = RunReport::new(&outcome, &stats);
        report.write_to(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), report.render());
    }
}
