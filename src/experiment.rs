use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ExperimentError;
use crate::world::Location;

/// Agent role holding the reference trajectory of an episode.
pub const PREY: &str = "prey";
/// Agent role of the pursuing robot, absent in some episodes.
pub const PREDATOR: &str = "predator";

/// One recorded pose sample for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseSample {
    pub agent_name: String,
    pub time_stamp: f64,
    pub location: Location,
    pub rotation: f32,
}

/// Ordered pose samples for a single agent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    samples: Vec<PoseSample>,
}

impl Trajectory {
    pub fn samples(&self) -> &[PoseSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Recorded time span between the first and last sample.
    pub fn duration(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.time_stamp - first.time_stamp,
            _ => 0.0,
        }
    }
}

impl FromIterator<PoseSample> for Trajectory {
    fn from_iter<I: IntoIterator<Item = PoseSample>>(iter: I) -> Self {
        Trajectory {
            samples: iter.into_iter().collect(),
        }
    }
}

/// One recorded run of the scenario: all agents' samples in recording order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    #[serde(default)]
    pub trajectories: Vec<PoseSample>,
}

impl Episode {
    /// Group samples by agent name, preserving recording order per agent.
    pub fn split_by_agent(&self) -> HashMap<String, Trajectory> {
        let mut by_agent: HashMap<String, Trajectory> = HashMap::new();
        for sample in &self.trajectories {
            by_agent
                .entry(sample.agent_name.clone())
                .or_default()
                .samples
                .push(sample.clone());
        }
        by_agent
    }
}

/// A recorded experiment: a named collection of episodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

impl Experiment {
    /// Load an experiment from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, ExperimentError> {
        let content = std::fs::read_to_string(path).map_err(|e| ExperimentError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| ExperimentError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
