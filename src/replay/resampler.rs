use crate::env::{AgentState, AgentStates};
use crate::experiment::{Episode, PoseSample, Trajectory, PREDATOR, PREY};
use crate::world::{CellGroup, Location};

/// Rotation offset between the recording frame and the simulation frame.
const FRAME_OFFSET_DEGREES: f32 = 90.0;

/// One resampled tick: synchronized agent poses and the inferred action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResampledTick {
    pub states: AgentStates,
    pub action: u32,
}

/// Lazy fixed-interval walk over one episode's trajectories.
///
/// The cursor starts at the first prey sample's timestamp and advances by
/// `time_step` per tick; each tick takes the first prey sample at or after
/// the cursor and ends the walk when the trajectory runs out. The predator
/// pose, when present, is the latest sample at or before the cursor on its
/// own trajectory. Ticks are held back until the prey first lands on an
/// action cell; from then on every tick is yielded, and a tick whose
/// location matches no cell repeats the last inferred action (the prey is
/// still in transit toward that target). Prey headings are recomputed from
/// consecutive resampled locations, replacing the raw recorded orientation.
pub struct StateResampler<'a> {
    prey: Trajectory,
    predator: Option<Trajectory>,
    actions: &'a CellGroup,
    time_step: f64,
    cursor: f64,
    prey_index: usize,
    predator_index: usize,
    prev_location: Location,
    last_action: Option<u32>,
    exhausted: bool,
}

impl<'a> StateResampler<'a> {
    /// Build a resampler for one episode. Returns `None` when the episode
    /// has no prey trajectory to walk.
    pub fn from_episode(
        episode: &Episode,
        time_step: f64,
        actions: &'a CellGroup,
    ) -> Option<Self> {
        let mut by_agent = episode.split_by_agent();
        let prey = by_agent.remove(PREY)?;
        let first = prey.samples().first()?.clone();
        let predator = by_agent.remove(PREDATOR).filter(|t| !t.is_empty());
        Some(StateResampler {
            prey,
            predator,
            actions,
            time_step,
            cursor: first.time_stamp,
            prey_index: 0,
            predator_index: 0,
            prev_location: first.location,
            last_action: None,
            exhausted: false,
        })
    }
}

impl Iterator for StateResampler<'_> {
    type Item = ResampledTick;

    fn next(&mut self) -> Option<ResampledTick> {
        loop {
            if self.exhausted {
                return None;
            }
            self.cursor += self.time_step;

            let samples = self.prey.samples();
            while self.prey_index < samples.len()
                && samples[self.prey_index].time_stamp < self.cursor
            {
                self.prey_index += 1;
            }
            if self.prey_index == samples.len() {
                self.exhausted = true;
                return None;
            }

            let sample = &samples[self.prey_index];
            let mut prey = state_from(sample);
            if let Some(action) = self.actions.find(sample.location) {
                self.last_action = Some(action);
            }

            let predator = match &self.predator {
                Some(trajectory) => {
                    let samples = trajectory.samples();
                    while self.predator_index + 1 < samples.len()
                        && samples[self.predator_index + 1].time_stamp <= self.cursor
                    {
                        self.predator_index += 1;
                    }
                    Some(state_from(&samples[self.predator_index]))
                }
                None => None,
            };

            let prev_location = self.prev_location;
            self.prev_location = prey.location;

            if let Some(action) = self.last_action {
                prey.direction = prev_location.direction_to(prey.location);
                return Some(ResampledTick {
                    states: AgentStates { prey, predator },
                    action,
                });
            }
        }
    }
}

fn state_from(sample: &PoseSample) -> AgentState {
    AgentState {
        location: sample.location,
        direction: FRAME_OFFSET_DEGREES - sample.rotation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::Episode;
    use crate::world::{Location, World};

    fn sample(agent: &str, time_stamp: f64, x: f32, y: f32) -> PoseSample {
        PoseSample {
            agent_name: agent.to_string(),
            time_stamp,
            location: Location::new(x, y),
            rotation: 0.0,
        }
    }

    /// Prey walking along the bottom row of a 3x3 grid, one cell per 0.25 s.
    fn walking_episode() -> Episode {
        Episode {
            trajectories: vec![
                sample(PREY, 0.0, 0.0, 0.0),
                sample(PREY, 0.25, 0.1, 0.0),
                sample(PREY, 0.5, 0.2, 0.0),
                sample(PREY, 0.75, 0.2, 0.1),
            ],
        }
    }

    fn actions() -> CellGroup {
        World::grid(3, 3, 0.1).free_cells()
    }

    #[test]
    fn test_ticks_follow_the_trajectory() {
        let actions = actions();
        let ticks: Vec<ResampledTick> =
            StateResampler::from_episode(&walking_episode(), 0.25, &actions)
                .unwrap()
                .collect();
        assert_eq!(ticks.len(), 3);
        assert_eq!(ticks[0].action, 1);
        assert_eq!(ticks[1].action, 2);
        assert_eq!(ticks[2].action, 5);
        assert!((ticks[2].states.prey.location.y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_no_prey_yields_no_resampler() {
        let episode = Episode {
            trajectories: vec![sample(PREDATOR, 0.0, 0.5, 0.5)],
        };
        let actions = actions();
        assert!(StateResampler::from_episode(&episode, 0.25, &actions).is_none());
    }

    #[test]
    fn test_no_predator_states_have_prey_only() {
        let actions = actions();
        let ticks: Vec<ResampledTick> =
            StateResampler::from_episode(&walking_episode(), 0.25, &actions)
                .unwrap()
                .collect();
        assert!(ticks.iter().all(|t| t.states.predator.is_none()));
    }

    #[test]
    fn test_predator_uses_latest_sample_at_or_before_cursor() {
        let mut episode = walking_episode();
        episode.trajectories.push(sample(PREDATOR, 0.0, 0.9, 0.9));
        episode.trajectories.push(sample(PREDATOR, 0.3, 0.8, 0.8));
        let actions = actions();
        let ticks: Vec<ResampledTick> =
            StateResampler::from_episode(&episode, 0.25, &actions)
                .unwrap()
                .collect();
        // Cursor 0.25: only the 0.0 predator sample has passed.
        let first = ticks[0].states.predator.unwrap();
        assert!((first.location.x - 0.9).abs() < 1e-6);
        // Cursor 0.5: the 0.3 sample is now the latest.
        let second = ticks[1].states.predator.unwrap();
        assert!((second.location.x - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_gating_drops_ticks_before_first_action() {
        // Off-cell approach for two samples, then onto the grid.
        let episode = Episode {
            trajectories: vec![
                sample(PREY, 0.0, 0.05, 0.05),
                sample(PREY, 0.25, 0.15, 0.05),
                sample(PREY, 0.5, 0.1, 0.0),
                sample(PREY, 0.75, 0.2, 0.0),
            ],
        };
        let actions = actions();
        let ticks: Vec<ResampledTick> =
            StateResampler::from_episode(&episode, 0.25, &actions)
                .unwrap()
                .collect();
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].action, 1);
        assert!((ticks[0].states.prey.location.x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_unmatched_tick_after_start_repeats_last_action() {
        let episode = Episode {
            trajectories: vec![
                sample(PREY, 0.0, 0.0, 0.0),
                sample(PREY, 0.25, 0.1, 0.0),
                sample(PREY, 0.5, 0.15, 0.05),
                sample(PREY, 0.75, 0.2, 0.0),
            ],
        };
        let actions = actions();
        let ticks: Vec<ResampledTick> =
            StateResampler::from_episode(&episode, 0.25, &actions)
                .unwrap()
                .collect();
        assert_eq!(ticks.len(), 3);
        assert_eq!(ticks[0].action, 1);
        // The mid-trajectory sample matches no cell; the label carries over.
        assert_eq!(ticks[1].action, 1);
        assert_eq!(ticks[2].action, 2);
    }

    #[test]
    fn test_action_cell_zero_starts_the_walk() {
        let episode = Episode {
            trajectories: vec![
                sample(PREY, 0.0, 0.5, 0.5),
                sample(PREY, 0.25, 0.0, 0.0),
                sample(PREY, 0.5, 0.1, 0.0),
            ],
        };
        let actions = actions();
        let ticks: Vec<ResampledTick> =
            StateResampler::from_episode(&episode, 0.25, &actions)
                .unwrap()
                .collect();
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].action, 0);
    }

    #[test]
    fn test_heading_recomputed_from_travel() {
        let actions = actions();
        let ticks: Vec<ResampledTick> =
            StateResampler::from_episode(&walking_episode(), 0.25, &actions)
                .unwrap()
                .collect();
        // Moving along +x, then turning to +y.
        assert!((ticks[0].states.prey.direction - 0.0).abs() < 1e-4);
        assert!((ticks[1].states.prey.direction - 0.0).abs() < 1e-4);
        assert!((ticks[2].states.prey.direction - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_frame_offset() {
        let mut episode = walking_episode();
        episode.trajectories.push(sample(PREDATOR, 0.0, 0.9, 0.9));
        episode.trajectories[4].rotation = 30.0;
        let actions = actions();
        let ticks: Vec<ResampledTick> =
            StateResampler::from_episode(&episode, 0.25, &actions)
                .unwrap()
                .collect();
        // Predator headings come straight from the log, offset-corrected.
        let predator = ticks[0].states.predator.unwrap();
        assert!((predator.direction - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_determinism() {
        let episode = walking_episode();
        let actions = actions();
        let first: Vec<ResampledTick> =
            StateResampler::from_episode(&episode, 0.25, &actions)
                .unwrap()
                .collect();
        let second: Vec<ResampledTick> =
            StateResampler::from_episode(&episode, 0.25, &actions)
                .unwrap()
                .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_tick_count_bounded_by_duration() {
        // 10 samples spanning 2.5 s.
        let trajectories: Vec<PoseSample> = (0..10)
            .map(|i| sample(PREY, 2.5 * i as f64 / 9.0, 0.1 * i as f32, 0.0))
            .collect();
        let episode = Episode { trajectories };
        let actions = World::grid(1, 12, 0.1).free_cells();

        for (time_step, expected_max) in [(0.25, 10), (0.5, 5), (1.0, 2)] {
            let count = StateResampler::from_episode(&episode, time_step, &actions)
                .unwrap()
                .count();
            assert!(
                count <= expected_max,
                "time_step {} yielded {} ticks",
                time_step,
                count
            );
        }
    }

    #[test]
    fn test_fixed_interval_scenario() {
        // 10 samples spanning 2.5 s at 0.25 s resampling: exactly 10 ticks.
        let trajectories: Vec<PoseSample> = (0..10)
            .map(|i| sample(PREY, 2.5 * i as f64 / 9.0, 0.1 * i as f32, 0.0))
            .collect();
        let episode = Episode { trajectories };
        let actions = World::grid(1, 12, 0.1).free_cells();
        let count = StateResampler::from_episode(&episode, 0.25, &actions)
            .unwrap()
            .count();
        assert_eq!(count, 10);
    }
}
