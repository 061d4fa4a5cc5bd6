//! Solve configuration.
//!
//! [`SolveConfig`] selects the search strategy and carries everything a
//! solve needs: the time budget, the objective weights, and the
//! evolutionary knobs. Built with the builder pattern and checked with
//! [`SolveConfig::validate`] before use.

use serde::{Deserialize, Serialize};

use super::objective::ObjectiveWeights;

/// Search strategy selection.
///
/// Both strategies expose the same solve contract; callers pick one
/// here rather than invoking different entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Exact branch-and-bound search, bounded by the time budget.
    #[default]
    Exact,
    /// Population-based search admitted through the faculty oracle.
    Evolutionary,
}

/// Configuration for a solve.
///
/// # Defaults
///
/// ```
/// use u_timetable::solver::SolveConfig;
///
/// let config = SolveConfig::default();
/// assert_eq!(config.time_budget_secs, 180);
/// assert_eq!(config.population_size, 5);
/// assert_eq!(config.generations, 20);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveConfig {
    /// Which strategy runs the solve.
    pub strategy: Strategy,
    /// Wall-clock budget in seconds for the exact search.
    pub time_budget_secs: u64,
    /// Soft-objective weights.
    pub weights: ObjectiveWeights,
    /// Population size (evolutionary only).
    pub population_size: usize,
    /// Number of generations (evolutionary only).
    pub generations: usize,
    /// Random seed for reproducible evolutionary runs.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            time_budget_secs: 180,
            weights: ObjectiveWeights::default(),
            population_size: 5,
            generations: 20,
            seed: None,
        }
    }
}

impl SolveConfig {
    /// Sets the strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the time budget in seconds.
    pub fn with_time_budget_secs(mut self, secs: u64) -> Self {
        self.time_budget_secs = secs;
        self
    }

    /// Sets the objective weights.
    pub fn with_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_budget_secs == 0 {
            return Err("time_budget_secs must be positive".into());
        }
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.generations == 0 {
            return Err("generations must be at least 1".into());
        }
        self.weights.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SolveConfig::default();
        assert_eq!(config.strategy, Strategy::Exact);
        assert_eq!(config.time_budget_secs, 180);
        assert_eq!(config.population_size, 5);
        assert_eq!(config.generations, 20);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SolveConfig::default()
            .with_strategy(Strategy::Evolutionary)
            .with_time_budget_secs(10)
            .with_population_size(8)
            .with_generations(50)
            .with_seed(42);

        assert_eq!(config.strategy, Strategy::Evolutionary);
        assert_eq!(config.time_budget_secs, 10);
        assert_eq!(config.population_size, 8);
        assert_eq!(config.generations, 50);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_validate_zero_budget() {
        let config = SolveConfig::default().with_time_budget_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = SolveConfig::default().with_population_size(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_generations() {
        let config = SolveConfig::default().with_generations(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_weights() {
        let mut config = SolveConfig::default();
        config.weights.gap_penalty = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_strategy_serde() {
        let json = serde_json::to_string(&Strategy::Evolutionary).unwrap();
        assert_eq!(json, "\"evolutionary\"");
        let parsed: Strategy = serde_json::from_str("\"exact\"").unwrap();
        assert_eq!(parsed, Strategy::Exact);
    }
}
