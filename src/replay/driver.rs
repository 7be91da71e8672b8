use std::path::Path;

use crate::env::Environment;
use crate::error::ExperimentError;
use crate::experiment::{Experiment, PREY};
use crate::replay::buffer::{ReplayBuffer, Transition};
use crate::replay::resampler::StateResampler;

/// Buffer fill progress is reported every this many stored transitions.
const PROGRESS_INTERVAL: usize = 1000;

/// Load an experiment file and replay it into the buffer.
pub fn fill_from_file(
    path: &Path,
    env: &mut dyn Environment,
    buffer: &mut ReplayBuffer,
) -> Result<usize, ExperimentError> {
    let experiment = Experiment::load_from_file(path)?;
    Ok(fill_from_experiment(&experiment, env, buffer))
}

/// Replay every episode of an experiment through the environment, storing
/// one transition per consecutive pair of resampled ticks. Returns the
/// number of transitions added. Episodes without a prey trajectory are
/// skipped, and the walk stops once the buffer reaches capacity.
pub fn fill_from_experiment(
    experiment: &Experiment,
    env: &mut dyn Environment,
    buffer: &mut ReplayBuffer,
) -> usize {
    let actions = env.action_cells().clone();
    let time_step = env.time_step();
    let mut added = 0;
    for episode in &experiment.episodes {
        if buffer.is_full() {
            break;
        }
        let Some(ticks) = StateResampler::from_episode(episode, time_step, &actions) else {
            eprintln!("skipping episode without a {} trajectory", PREY);
            continue;
        };
        added += replay_episode(ticks, env, buffer);
    }
    added
}

/// Walk one episode's ticks. The first tick seeds the environment and the
/// previous observation; every later tick scores a step and stores the
/// transition. Ends early when the environment reports a terminal step or
/// the buffer fills up.
fn replay_episode(
    ticks: StateResampler<'_>,
    env: &mut dyn Environment,
    buffer: &mut ReplayBuffer,
) -> usize {
    let mut added = 0;
    let mut prev_observation: Option<Vec<f32>> = None;
    for tick in ticks {
        match prev_observation.take() {
            None => {
                let (observation, _) = env.replay_reset(&tick.states);
                prev_observation = Some(observation);
            }
            Some(previous) => {
                let outcome = env.replay_step(&tick.states, tick.action);
                buffer.add(Transition {
                    observation: previous,
                    next_observation: outcome.observation.clone(),
                    action: tick.action,
                    reward: outcome.reward,
                    done: outcome.done,
                });
                added += 1;
                prev_observation = Some(outcome.observation);
                if outcome.done {
                    break;
                }
                if buffer.len() % PROGRESS_INTERVAL == 0 {
                    println!(
                        "{} out of {} records so far",
                        buffer.len(),
                        buffer.capacity()
                    );
                }
                if buffer.is_full() {
                    break;
                }
            }
        }
    }
    added
}
