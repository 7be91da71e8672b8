//! # Cellworld Replay
//!
//! Rebuilds reinforcement-learning replay buffers from recorded cellworld
//! evade experiments and orchestrates training runs that consume them.
//! Recorded trajectories are resampled onto the simulation clock, driven
//! through the environment step by step, and accumulated as transitions in
//! a bounded buffer an off-policy learner can be seeded from.
//!
//! ## Modules
//!
//! - [`world`] — Arena cells, the free-cell action set, nearest-cell lookup
//! - [`experiment`] — Recorded experiment files, episodes, trajectories
//! - [`env`] — The environment interface and the evade environment
//! - [`replay`] — Resampler, replay driver, bounded buffer, file selector
//! - [`learner`] — Algorithm selection and the trainable-policy interface
//! - [`session`] — Training-run orchestration and policy playback
//! - [`paths`] — Run identity and artifact path layout
//! - [`config`] — Model configuration loading and validation
//! - [`error`] — Structured error types

pub mod config;
pub mod env;
pub mod error;
pub mod experiment;
pub mod learner;
pub mod paths;
pub mod replay;
pub mod session;
pub mod world;
