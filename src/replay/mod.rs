//! Experience-replay reconstruction: resampling recorded trajectories,
//! driving the environment through them, and accumulating transitions.

pub mod buffer;
pub mod driver;
pub mod resampler;
pub mod selector;

pub use buffer::{ReplayBuffer, Transition};
pub use driver::{fill_from_experiment, fill_from_file};
pub use resampler::{ResampledTick, StateResampler};
pub use selector::{
    discover, filter_by_phases, filter_by_subjects, sort_files, ExperimentFile, SortKey,
};
