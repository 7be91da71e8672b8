use std::fs;

use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::env::Environment;
use crate::error::SessionError;
use crate::learner::{Learner, LearnerFactory};
use crate::paths::RunContext;
use crate::replay::ReplayBuffer;

/// Training-loop settings of a model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// Steps per training cycle.
    pub training_steps: usize,
    /// Episodes between the learner's own progress reports.
    pub log_interval: usize,
    /// Learn/save cycles per run.
    pub training_cycles: usize,
    /// Episodes played back when scoring a trained policy.
    pub playback_episodes: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            training_steps: 100_000,
            log_interval: 4,
            training_cycles: 1,
            playback_episodes: 100,
        }
    }
}

/// One training run: resolve the model configuration, create or resume the
/// learner, optionally seed it from a replayed buffer, then loop learn/save
/// cycles and persist the results under the run's directories.
pub struct TrainSession<'a> {
    context: RunContext,
    factory: &'a dyn LearnerFactory,
}

impl<'a> TrainSession<'a> {
    pub fn new(context: RunContext, factory: &'a dyn LearnerFactory) -> Self {
        TrainSession { context, factory }
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Run the training workflow. `seed_buffer` names a buffer file inside
    /// the run's buffers directory whose transitions seed the learner before
    /// the first cycle. Returns the trained learner so callers can score or
    /// inspect it.
    pub fn run(&self, seed_buffer: Option<&str>) -> Result<Box<dyn Learner>, SessionError> {
        let config_file = self.context.model_config_file();
        if !config_file.exists() {
            return Err(SessionError::ConfigMissing(config_file));
        }
        let config = ModelConfig::load(&config_file)?;

        let seed_file = match seed_buffer {
            Some(name) => {
                let path = self.context.in_buffer_file(name);
                if !path.exists() {
                    return Err(SessionError::BufferMissing(path));
                }
                Some(path)
            }
            None => None,
        };

        let data_file = self.context.data_file();
        let mut learner = if data_file.exists() {
            println!("Data file '{}' found, loading...", data_file.display());
            self.factory
                .load(config.algorithm, &config.learner, &config.environment, &data_file)
                .map_err(|e| SessionError::Learner(e.to_string()))?
        } else {
            println!("Data file '{}' not found", data_file.display());
            self.factory
                .create(config.algorithm, &config.learner, &config.environment)
                .map_err(|e| SessionError::Learner(e.to_string()))?
        };

        if let Some(path) = seed_file {
            println!("loading replay buffer file {}", path.display());
            let buffer = ReplayBuffer::load(&path)?;
            learner
                .load_replay_buffer(&buffer)
                .map_err(|e| SessionError::Learner(e.to_string()))?;
        }

        fs::create_dir_all(self.context.data_dir())?;
        fs::create_dir_all(self.context.buffers_dir())?;

        for _ in 0..config.training.training_cycles {
            learner
                .learn(config.training.training_steps, config.training.log_interval)
                .map_err(|e| SessionError::Learner(e.to_string()))?;
            println!("saving data file {}", data_file.display());
            learner
                .save(&data_file)
                .map_err(|e| SessionError::Learner(e.to_string()))?;
        }

        let buffer_file = self.context.buffer_file();
        println!("saving replay buffer file {}", buffer_file.display());
        learner
            .save_replay_buffer(&buffer_file)
            .map_err(|e| SessionError::Learner(e.to_string()))?;

        Ok(learner)
    }

    /// Score a trained policy over the run's configured number of playback
    /// episodes.
    pub fn playback(
        &self,
        learner: &dyn Learner,
        env: &mut dyn Environment,
    ) -> Result<Vec<f32>, SessionError> {
        let config_file = self.context.model_config_file();
        if !config_file.exists() {
            return Err(SessionError::ConfigMissing(config_file));
        }
        let config = ModelConfig::load(&config_file)?;
        playback_scores(learner, env, config.training.playback_episodes)
    }
}

/// Play the policy for a number of live episodes and collect the total
/// reward of each.
pub fn playback_scores(
    learner: &dyn Learner,
    env: &mut dyn Environment,
    episodes: usize,
) -> Result<Vec<f32>, SessionError> {
    let mut scores = Vec::with_capacity(episodes);
    for _ in 0..episodes {
        let (mut observation, _) = env.reset();
        let mut score = 0.0;
        loop {
            let action = learner
                .predict(&observation)
                .map_err(|e| SessionError::Learner(e.to_string()))?;
            let outcome = env.step(action);
            score += outcome.reward;
            observation = outcome.observation;
            if outcome.done || outcome.truncated {
                break;
            }
        }
        scores.push(score);
    }
    Ok(scores)
}
