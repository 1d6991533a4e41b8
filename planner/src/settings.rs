use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Engine tuning: budgets, heuristic weights and sampling behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlanningSettings {
    pub time_budget_ms: u64,
    pub max_depth: usize,
    pub goal_distance_weight: f64,
    pub action_cost_weight: f64,
    pub sampling: SamplingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingSettings {
    pub iterations: usize,
    pub max_rollout_length: usize,
    pub seed: Option<u64>,
}

impl Default for PlanningSettings {
    fn default() -> Self {
        Self {
            time_budget_ms: 5000,
            max_depth: 25,
            goal_distance_weight: 0.7,
            action_cost_weight: 0.3,
            sampling: SamplingSettings::default(),
        }
    }
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            iterations: 100,
            max_rollout_length: 20,
            seed: None,
        }
    }
}

impl PlanningSettings {
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("planner").required(false))
            .add_source(Environment::with_prefix("PLANNER").separator("__"));

        let s = builder.build()?;
        s.try_deserialize()
    }

    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    pub fn with_time_budget_ms(mut self, time_budget_ms: u64) -> Self {
        self.time_budget_ms = time_budget_ms;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable_without_a_config_file() {
        let settings = PlanningSettings::default();

        assert_eq!(settings.time_budget(), Duration::from_millis(5000));
        assert_eq!(settings.max_depth, 25);
        assert_eq!(settings.sampling.iterations, 100);
        assert_eq!(settings.sampling.seed, None);
    }

    #[test]
    fn loading_without_sources_falls_back_to_defaults() {
        let settings = PlanningSettings::new().unwrap();

        assert_eq!(settings.max_depth, PlanningSettings::default().max_depth);
    }
}
