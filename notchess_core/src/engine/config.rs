use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("min_depth {min} is greater than max_depth {max}")]
    InvalidDepthRange { min: u8, max: u8 },
    #[error("victory_points must be positive")]
    ZeroVictoryPoints,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Score of a decided game. Heuristic scores stay two points inside it.
    pub victory_points: i32,

    // Iterative deepening
    pub min_depth: u8,
    pub max_depth: u8,
    pub time_limit_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            victory_points: 1000,
            min_depth: 2,
            max_depth: 20,
            time_limit_ms: 3000,
        }
    }
}

impl EngineConfig {
    /// Missing fields keep their defaults.
    pub fn load_from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.victory_points <= 0 {
            return Err(ConfigError::ZeroVictoryPoints);
        }
        if self.min_depth > self.max_depth {
            return Err(ConfigError::InvalidDepthRange {
                min: self.min_depth,
                max: self.max_depth,
            });
        }
        Ok(())
    }

    /// Largest magnitude a non-terminal evaluation may take.
    pub const fn heuristic_cap(&self) -> i32 {
        self.victory_points - 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_default() {
        let config = EngineConfig::load_from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.victory_points, 1000);
        assert_eq!(config.heuristic_cap(), 998);
    }

    #[test]
    fn test_load_config_partial() {
        let json = r#"{
            "max_depth": 6,
            "time_limit_ms": 250
        }"#;
        let config = EngineConfig::load_from_json(json).unwrap();
        assert_eq!(config.max_depth, 6);
        assert_eq!(config.time_limit_ms, 250);
        // Others should be default
        assert_eq!(config.min_depth, 2);
    }

    #[test]
    fn test_load_config_invalid_json() {
        let result = EngineConfig::load_from_json("{ invalid json }");
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_load_config_rejects_bad_values() {
        assert!(matches!(
            EngineConfig::load_from_json(r#"{"min_depth": 5, "max_depth": 3}"#),
            Err(ConfigError::InvalidDepthRange { min: 5, max: 3 })
        ));
        assert!(matches!(
            EngineConfig::load_from_json(r#"{"victory_points": 0}"#),
            Err(ConfigError::ZeroVictoryPoints)
        ));
    }
}
