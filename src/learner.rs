use std::error::Error;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::env::EnvironmentConfig;
use crate::replay::ReplayBuffer;

/// The training algorithms a model configuration can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlgorithmKind {
    Dqn,
    QrDqn,
    Her,
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlgorithmKind::Dqn => "DQN",
            AlgorithmKind::QrDqn => "QRDQN",
            AlgorithmKind::Her => "HER",
        };
        write!(f, "{}", name)
    }
}

/// Hyperparameters shared by the value-based learners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LearnerConfig {
    pub learning_rate: f64,
    pub gamma: f32,
    pub batch_size: usize,
    pub buffer_size: usize,
    pub learning_starts: usize,
    pub train_freq: usize,
    pub target_update_interval: usize,
    pub exploration_fraction: f64,
    pub exploration_final_eps: f64,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        LearnerConfig {
            learning_rate: 1e-4,
            gamma: 0.99,
            batch_size: 64,
            buffer_size: 50_000,
            learning_starts: 1000,
            train_freq: 4,
            target_update_interval: 1000,
            exploration_fraction: 0.1,
            exploration_final_eps: 0.05,
        }
    }
}

/// A trainable policy. Implementations own their environment and internal
/// replay storage; the session drives them through this interface only.
pub trait Learner {
    /// Run the training loop for the given number of steps.
    fn learn(&mut self, steps: usize, log_interval: usize) -> Result<(), Box<dyn Error>>;

    /// Greedy action for an observation.
    fn predict(&self, observation: &[f32]) -> Result<u32, Box<dyn Error>>;

    /// Persist the model to the given path.
    fn save(&self, path: &Path) -> Result<(), Box<dyn Error>>;

    /// Seed the learner's internal replay storage from a filled buffer.
    fn load_replay_buffer(&mut self, buffer: &ReplayBuffer) -> Result<(), Box<dyn Error>>;

    /// Persist the learner's internal replay storage.
    fn save_replay_buffer(&self, path: &Path) -> Result<(), Box<dyn Error>>;
}

/// Builds learners for a selected algorithm. The factory owns backend
/// concerns (network construction, environment instantiation); the session
/// only decides when to create, restore, and drive a learner.
pub trait LearnerFactory {
    /// Build a fresh learner.
    fn create(
        &self,
        kind: AlgorithmKind,
        learner: &LearnerConfig,
        environment: &EnvironmentConfig,
    ) -> Result<Box<dyn Learner>, Box<dyn Error>>;

    /// Restore a learner from a saved data file.
    fn load(
        &self,
        kind: AlgorithmKind,
        learner: &LearnerConfig,
        environment: &EnvironmentConfig,
        path: &Path,
    ) -> Result<Box<dyn Learner>, Box<dyn Error>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_names() {
        assert_eq!(
            serde_json::to_string(&AlgorithmKind::Dqn).unwrap(),
            "\"DQN\""
        );
        assert_eq!(
            serde_json::to_string(&AlgorithmKind::QrDqn).unwrap(),
            "\"QRDQN\""
        );
        assert_eq!(
            serde_json::from_str::<AlgorithmKind>("\"HER\"").unwrap(),
            AlgorithmKind::Her
        );
        assert_eq!(AlgorithmKind::QrDqn.to_string(), "QRDQN");
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() {
        assert!(serde_json::from_str::<AlgorithmKind>("\"PPO\"").is_err());
    }

    #[test]
    fn test_learner_config_defaults() {
        let config: LearnerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LearnerConfig::default());
        assert_eq!(config.batch_size, 64);
    }

    #[test]
    fn test_learner_config_partial_override() {
        let config: LearnerConfig =
            serde_json::from_str("{\"batch_size\": 32, \"gamma\": 0.95}").unwrap();
        assert_eq!(config.batch_size, 32);
        assert!((config.gamma - 0.95).abs() < 1e-6);
        assert_eq!(config.buffer_size, 50_000);
    }

    #[test]
    fn test_learner_config_rejects_unknown_keys() {
        assert!(serde_json::from_str::<LearnerConfig>("{\"learnig_rate\": 0.1}").is_err());
    }
}
