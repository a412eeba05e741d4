// Configuration module for reading Snake.toml
// This module provides configuration management for the snake bot

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::Direction;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub strategy: StrategyConfig,
    pub debug: DebugConfig,
}

/// Timing and performance constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }
}

/// Decision policy constants
#[derive(Debug, Deserialize, Clone)]
pub struct StrategyConfig {
    /// Food farther than this many hops is ignored in favour of trapping
    pub max_food_distance: i32,
    /// Candidate paths must score strictly above this
    pub min_safety_score: f64,
    pub lookahead_enabled: bool,
    pub lookahead_depth: u8,
    /// Answer used when every direction collides immediately
    pub fallback_direction: Direction,
}

impl StrategyConfig {
    /// Lookahead depth to apply, or None when lookahead is switched off
    pub fn lookahead(&self) -> Option<u8> {
        self.lookahead_enabled.then_some(self.lookahead_depth)
    }
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 250,
                network_overhead_ms: 30,
            },
            strategy: StrategyConfig {
                max_food_distance: 20,
                min_safety_score: 0.8,
                lookahead_enabled: true,
                lookahead_depth: 0,
                fallback_direction: Direction::Down,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "snake_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_budget_calculation() {
        let config = Config::default_hardcoded();
        assert_eq!(config.timing.effective_budget_ms(), 220);
    }

    #[test]
    fn test_config_can_be_created() {
        let config = Config::default_hardcoded();
        assert_eq!(config.strategy.max_food_distance, 20);
        assert_eq!(config.strategy.fallback_direction, Direction::Down);
        assert_eq!(config.strategy.lookahead(), Some(0));
    }

    #[test]
    fn test_lookahead_can_be_disabled() {
        let mut config = Config::default_hardcoded();
        config.strategy.lookahead_enabled = false;
        config.strategy.lookahead_depth = 3;
        assert_eq!(config.strategy.lookahead(), None);
    }

    #[test]
    fn test_load_or_default_reads_snake_toml() {
        let config = Config::load_or_default();
        assert_eq!(config.timing.effective_budget_ms(), 220);
        assert!(!config.debug.enabled);
        assert_eq!(config.debug.log_file_path, "snake_debug.jsonl");
    }

    #[test]
    fn test_snake_toml_can_be_parsed() {
        // This test ensures Snake.toml is valid and can be parsed
        let result = Config::from_file("Snake.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Snake.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Snake.toml").expect("Snake.toml should be parseable");
        let hardcoded_config = Config::default_hardcoded();

        // Timing
        assert_eq!(
            file_config.timing.response_time_budget_ms,
            hardcoded_config.timing.response_time_budget_ms
        );
        assert_eq!(
            file_config.timing.network_overhead_ms,
            hardcoded_config.timing.network_overhead_ms
        );

        // Strategy
        assert_eq!(
            file_config.strategy.max_food_distance,
            hardcoded_config.strategy.max_food_distance
        );
        assert_eq!(
            file_config.strategy.min_safety_score,
            hardcoded_config.strategy.min_safety_score
        );
        assert_eq!(
            file_config.strategy.lookahead(),
            hardcoded_config.strategy.lookahead()
        );
        assert_eq!(
            file_config.strategy.fallback_direction,
            hardcoded_config.strategy.fallback_direction
        );

        // Debug
        assert_eq!(file_config.debug.enabled, hardcoded_config.debug.enabled);
        assert!(!file_config.debug.log_file_path.is_empty());
    }

    #[test]
    fn test_fallback_direction_parses_lowercase() {
        let config = Config::from_toml_str(
            r#"
            [timing]
            response_time_budget_ms = 500
            network_overhead_ms = 50

            [strategy]
            max_food_distance = 10
            min_safety_score = 0.5
            lookahead_enabled = false
            lookahead_depth = 1
            fallback_direction = "left"

            [debug]
            enabled = true
            log_file_path = "out.jsonl"
            "#,
        )
        .expect("inline config should parse");
        assert_eq!(config.strategy.fallback_direction, Direction::Left);
        assert_eq!(config.timing.effective_budget_ms(), 450);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        assert!(Config::from_file("nonexistent.toml").is_err());
        assert!(Config::from_toml_str("[timing]\nresponse_time_budget_ms = \"soon\"").is_err());
    }
}
