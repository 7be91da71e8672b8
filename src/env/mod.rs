//! Replay-capable environment contract and the evade reference environment.

mod evade;

pub use evade::EvadeEnv;

use serde::{Deserialize, Serialize};

use crate::world::{CellGroup, Location};

/// Pose of one agent in simulation coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AgentState {
    pub location: Location,
    /// Heading in degrees.
    pub direction: f32,
}

/// Per-tick poses for the agents present in an episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentStates {
    pub prey: AgentState,
    pub predator: Option<AgentState>,
}

/// Additional per-step information.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepInfo {
    pub captured: bool,
    pub reached_goal: bool,
    pub steps: usize,
}

/// Result of stepping the environment.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub observation: Vec<f32>,
    pub reward: f32,
    pub done: bool,
    pub truncated: bool,
    pub info: StepInfo,
}

/// Reward shaping for the evade task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewardStructure {
    /// Reward added on every tick.
    pub step_cost: f32,
    /// Reward added when the predator reaches the prey.
    pub capture_penalty: f32,
    /// Reward added when the prey reaches the goal.
    pub goal_reward: f32,
}

impl Default for RewardStructure {
    fn default() -> Self {
        RewardStructure {
            step_cost: -0.1,
            capture_penalty: -100.0,
            goal_reward: 10.0,
        }
    }
}

/// Environment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// World definition to load from the worlds folder.
    pub world_name: String,
    /// Whether the pursuing robot participates.
    pub use_predator: bool,
    /// Control interval in seconds.
    pub time_step: f64,
    /// Maximum live-episode length before truncation.
    pub max_steps: usize,
    /// Prey spawn for live episodes.
    pub start_location: Location,
    /// Goal the prey must reach.
    pub goal_location: Location,
    /// Predator spawn for live episodes.
    pub predator_spawn: Location,
    /// Distance at which the goal counts as reached.
    pub goal_radius: f32,
    /// Distance at which the predator captures the prey.
    pub capture_radius: f32,
    /// Predator pursuit speed in arena units per second.
    pub predator_speed: f32,
    pub reward: RewardStructure,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        EnvironmentConfig {
            world_name: "21_05".to_string(),
            use_predator: false,
            time_step: 0.25,
            max_steps: 300,
            start_location: Location::new(0.0, 0.5),
            goal_location: Location::new(1.0, 0.5),
            predator_spawn: Location::new(0.5, 0.5),
            goal_radius: 0.05,
            capture_radius: 0.05,
            predator_speed: 0.2,
            reward: RewardStructure::default(),
        }
    }
}

/// A simulated arena that can be driven two ways: live, where actions move
/// the agents, and replayed, where recorded poses are injected directly and
/// the environment only scores the instant.
pub trait Environment {
    /// Control interval in seconds between consecutive ticks.
    fn time_step(&self) -> f64;

    /// The ordered action set: one target cell per discrete action.
    fn action_cells(&self) -> &CellGroup;

    /// Begin an episode from externally supplied poses. No transition is
    /// implied; the returned observation seeds the first one.
    fn replay_reset(&mut self, states: &AgentStates) -> (Vec<f32>, StepInfo);

    /// Inject poses for one tick, bypassing the environment's own dynamics,
    /// and score the instant against the given action.
    fn replay_step(&mut self, states: &AgentStates, action: u32) -> StepOutcome;

    /// Begin a live episode from the configured spawn poses.
    fn reset(&mut self) -> (Vec<f32>, StepInfo);

    /// Advance one live tick toward the action's target cell. An action
    /// outside the action set leaves the prey in place.
    fn step(&mut self, action: u32) -> StepOutcome;
}
