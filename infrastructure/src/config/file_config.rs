//! Configuration file schema
//!
//! Deserialized from `atrium.toml` (see [`crate::config::loader`]). Every
//! section and field is optional and falls back to a built-in default.

use atrium_domain::ResolutionStrategy;
use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub coordinator: CoordinatorConfig,
    pub execution: ExecutionConfig,
    pub llm: LlmConfig,
}

/// Coordination round settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Periodic coordination interval in seconds (watch mode)
    pub interval_secs: u64,
    pub enabled: bool,
    /// Strategies compared each round
    pub strategies: Vec<ResolutionStrategy>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            enabled: true,
            strategies: vec![
                ResolutionStrategy::PriorityWeighted,
                ResolutionStrategy::SafetyFirst,
                ResolutionStrategy::EnergyBalance,
            ],
        }
    }
}

/// Execution engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Simultaneously in-flight device actions
    pub max_parallel_actions: usize,
    /// Simulated transient failure rate in [0, 1]
    pub failure_rate: f64,
    /// Cap on simulated device latency, seconds
    pub latency_cap_secs: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_parallel_actions: 5,
            failure_rate: 0.05,
            latency_cap_secs: 2.0,
        }
    }
}

/// Remote decision source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// When false (the default), agents run on rule logic alone
    pub enabled: bool,
    pub endpoint: Option<String>,
    /// Sliding-window admission: calls per minute
    pub max_requests_per_minute: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            max_requests_per_minute: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.coordinator.interval_secs, 300);
        assert_eq!(config.coordinator.strategies.len(), 3);
        assert_eq!(config.execution.max_parallel_actions, 5);
        assert_eq!(config.execution.failure_rate, 0.05);
        assert_eq!(config.llm.max_requests_per_minute, 5);
        assert!(!config.llm.enabled);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [coordinator]
            interval_secs = 60
            strategies = ["safety_first"]
            "#,
        )
        .unwrap();

        assert_eq!(config.coordinator.interval_secs, 60);
        assert_eq!(
            config.coordinator.strategies,
            vec![ResolutionStrategy::SafetyFirst]
        );
        // Untouched sections keep their defaults
        assert_eq!(config.execution.max_parallel_actions, 5);
    }
}
