use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::env::EnvironmentConfig;
use crate::error::ConfigError;
use crate::learner::{AlgorithmKind, LearnerConfig};
use crate::session::TrainingConfig;

/// One model's complete configuration, loadable from JSON at
/// `models/<task>/<model>_config.json`. The algorithm must be named
/// explicitly; every other section falls back to defaults. Unknown keys
/// are rejected so a typo cannot silently train with default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub algorithm: AlgorithmKind,
    #[serde(default)]
    pub learner: LearnerConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

impl ModelConfig {
    /// Load and validate a model configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: ModelConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.learner.learning_rate <= 0.0 {
            return Err(ConfigError::Validation(
                "learner.learning_rate must be > 0".into(),
            ));
        }
        if self.learner.gamma < 0.0 || self.learner.gamma > 1.0 {
            return Err(ConfigError::Validation(
                "learner.gamma must be in [0, 1]".into(),
            ));
        }
        if self.learner.batch_size == 0 {
            return Err(ConfigError::Validation(
                "learner.batch_size must be > 0".into(),
            ));
        }
        if self.learner.buffer_size < self.learner.batch_size {
            return Err(ConfigError::Validation(
                "learner.buffer_size must be >= learner.batch_size".into(),
            ));
        }
        if self.learner.exploration_fraction < 0.0 || self.learner.exploration_fraction > 1.0 {
            return Err(ConfigError::Validation(
                "learner.exploration_fraction must be in [0, 1]".into(),
            ));
        }
        if self.learner.exploration_final_eps < 0.0 || self.learner.exploration_final_eps > 1.0 {
            return Err(ConfigError::Validation(
                "learner.exploration_final_eps must be in [0, 1]".into(),
            ));
        }
        if self.training.training_steps == 0 {
            return Err(ConfigError::Validation(
                "training.training_steps must be > 0".into(),
            ));
        }
        if self.training.training_cycles == 0 {
            return Err(ConfigError::Validation(
                "training.training_cycles must be > 0".into(),
            ));
        }
        if self.environment.world_name.is_empty() {
            return Err(ConfigError::Validation(
                "environment.world_name must not be empty".into(),
            ));
        }
        if self.environment.time_step <= 0.0 {
            return Err(ConfigError::Validation(
                "environment.time_step must be > 0".into(),
            ));
        }
        if self.environment.max_steps == 0 {
            return Err(ConfigError::Validation(
                "environment.max_steps must be > 0".into(),
            ));
        }
        if self.environment.goal_radius <= 0.0 {
            return Err(ConfigError::Validation(
                "environment.goal_radius must be > 0".into(),
            ));
        }
        if self.environment.capture_radius <= 0.0 {
            return Err(ConfigError::Validation(
                "environment.capture_radius must be > 0".into(),
            ));
        }
        if self.environment.predator_speed < 0.0 {
            return Err(ConfigError::Validation(
                "environment.predator_speed must be >= 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_default_when_absent() {
        let config: ModelConfig = serde_json::from_str("{\"algorithm\": \"DQN\"}").unwrap();
        assert_eq!(config.algorithm, AlgorithmKind::Dqn);
        assert_eq!(config.learner, LearnerConfig::default());
        assert_eq!(config.environment.world_name, "21_05");
        config.validate().unwrap();
    }

    #[test]
    fn test_algorithm_is_required() {
        assert!(serde_json::from_str::<ModelConfig>("{}").is_err());
    }

    #[test]
    fn test_typical_model_file() {
        let json = r#"{
            "algorithm": "QRDQN",
            "learner": {"learning_rate": 0.0005, "buffer_size": 100000},
            "training": {"training_steps": 200000, "log_interval": 4},
            "environment": {"world_name": "21_05", "use_predator": true}
        }"#;
        let config: ModelConfig = serde_json::from_str(json).unwrap();
        config.validate().unwrap();
        assert_eq!(config.algorithm, AlgorithmKind::QrDqn);
        assert!((config.learner.learning_rate - 0.0005).abs() < 1e-12);
        assert_eq!(config.training.training_steps, 200_000);
        assert!(config.environment.use_predator);
        // Unset fields keep their defaults.
        assert_eq!(config.learner.batch_size, 64);
        assert_eq!(config.training.training_cycles, 1);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let top_level = "{\"algorithm\": \"DQN\", \"algorthm\": \"DQN\"}";
        assert!(serde_json::from_str::<ModelConfig>(top_level).is_err());
        let in_section = "{\"algorithm\": \"DQN\", \"learner\": {\"learnig_rate\": 0.1}}";
        assert!(serde_json::from_str::<ModelConfig>(in_section).is_err());
    }

    #[test]
    fn test_validation_bounds() {
        let mut config: ModelConfig = serde_json::from_str("{\"algorithm\": \"DQN\"}").unwrap();
        config.learner.gamma = 1.5;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("learner.gamma"));

        config.learner.gamma = 0.99;
        config.environment.time_step = 0.0;
        assert!(config.validate().is_err());

        config.environment.time_step = 0.25;
        config.learner.buffer_size = 8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dqn_a_config.json");
        std::fs::write(
            &path,
            "{\"algorithm\": \"DQN\", \"training\": {\"training_steps\": 0}}",
        )
        .unwrap();
        let err = ModelConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ModelConfig::load(Path::new("no_such_config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }
}
