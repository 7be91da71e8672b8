use crate::env::{AgentState, AgentStates, Environment, EnvironmentConfig, StepInfo, StepOutcome};
use crate::world::{CellGroup, Location, World};

/// Reference evade environment: a prey agent crossing the arena toward a goal
/// while an optional predator pursues it in a straight line. Supports both
/// live stepping and pose injection for trajectory replay; collision and
/// visibility modeling stay outside this crate.
pub struct EvadeEnv {
    config: EnvironmentConfig,
    actions: CellGroup,
    prey: AgentState,
    predator: Option<AgentState>,
    steps: usize,
}

impl EvadeEnv {
    /// Number of features in an observation vector:
    /// `[prey.x, prey.y, prey.dir, predator.x, predator.y, predator.dir,
    /// goal_distance, predator_distance, predator_present]`.
    pub const OBSERVATION_LEN: usize = 9;

    pub fn new(world: World, config: EnvironmentConfig) -> Self {
        let actions = world.free_cells();
        let prey = AgentState {
            location: config.start_location,
            direction: 0.0,
        };
        let predator = config.use_predator.then(|| AgentState {
            location: config.predator_spawn,
            direction: 0.0,
        });
        EvadeEnv {
            config,
            actions,
            prey,
            predator,
            steps: 0,
        }
    }

    fn observation(&self) -> Vec<f32> {
        let goal_distance = self.prey.location.dist(self.config.goal_location);
        let mut observation = vec![
            self.prey.location.x,
            self.prey.location.y,
            self.prey.direction,
        ];
        match self.predator {
            Some(predator) => observation.extend([
                predator.location.x,
                predator.location.y,
                predator.direction,
                goal_distance,
                self.prey.location.dist(predator.location),
                1.0,
            ]),
            None => observation.extend([0.0, 0.0, 0.0, goal_distance, 0.0, 0.0]),
        }
        observation
    }

    /// Score the current poses: capture takes precedence over the goal.
    fn score_tick(&mut self) -> StepOutcome {
        self.steps += 1;
        let captured = match self.predator {
            Some(predator) => {
                self.prey.location.dist(predator.location) <= self.config.capture_radius
            }
            None => false,
        };
        let reached_goal = !captured
            && self.prey.location.dist(self.config.goal_location) <= self.config.goal_radius;

        let mut reward = self.config.reward.step_cost;
        if captured {
            reward += self.config.reward.capture_penalty;
        }
        if reached_goal {
            reward += self.config.reward.goal_reward;
        }

        StepOutcome {
            observation: self.observation(),
            reward,
            done: captured || reached_goal,
            truncated: self.steps >= self.config.max_steps,
            info: StepInfo {
                captured,
                reached_goal,
                steps: self.steps,
            },
        }
    }
}

impl Environment for EvadeEnv {
    fn time_step(&self) -> f64 {
        self.config.time_step
    }

    fn action_cells(&self) -> &CellGroup {
        &self.actions
    }

    fn replay_reset(&mut self, states: &AgentStates) -> (Vec<f32>, StepInfo) {
        self.prey = states.prey;
        // A disabled predator stays absent regardless of the injected states.
        self.predator = if self.config.use_predator {
            states.predator
        } else {
            None
        };
        self.steps = 0;
        (self.observation(), StepInfo::default())
    }

    fn replay_step(&mut self, states: &AgentStates, _action: u32) -> StepOutcome {
        self.prey = states.prey;
        self.predator = if self.config.use_predator {
            states.predator
        } else {
            None
        };
        self.score_tick()
    }

    fn reset(&mut self) -> (Vec<f32>, StepInfo) {
        self.prey = AgentState {
            location: self.config.start_location,
            direction: 0.0,
        };
        self.predator = self.config.use_predator.then(|| AgentState {
            location: self.config.predator_spawn,
            direction: 0.0,
        });
        self.steps = 0;
        (self.observation(), StepInfo::default())
    }

    fn step(&mut self, action: u32) -> StepOutcome {
        if let Some(cell) = self.actions.get(action) {
            let target = cell.location;
            self.prey.direction = self.prey.location.direction_to(target);
            self.prey.location = target;
        }

        let prey_location = self.prey.location;
        if let Some(predator) = self.predator.as_mut() {
            let heading = predator.location.direction_to(prey_location);
            let distance = predator.location.dist(prey_location);
            let reach = self.config.predator_speed * self.config.time_step as f32;
            if distance <= reach {
                predator.location = prey_location;
            } else {
                let radians = heading.to_radians();
                predator.location = Location::new(
                    predator.location.x + reach * radians.cos(),
                    predator.location.y + reach * radians.sin(),
                );
            }
            predator.direction = heading;
        }

        self.score_tick()
    }
}
