use std::path::Path;

use bincode::config;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::BufferError;

/// One stored state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub observation: Vec<f32>,
    pub next_observation: Vec<f32>,
    pub action: u32,
    pub reward: f32,
    pub done: bool,
}

/// On-disk form of a filled buffer: space descriptors plus the stored
/// transitions, oldest first.
#[derive(Serialize, Deserialize)]
struct BufferBlob {
    capacity: usize,
    observation_len: usize,
    action_count: usize,
    transitions: Vec<Transition>,
}

/// Fixed-capacity ring buffer of replay transitions. Once full, adding
/// evicts the oldest record.
#[derive(Debug)]
pub struct ReplayBuffer {
    buffer: Vec<Transition>,
    capacity: usize,
    position: usize,
    len: usize,
    observation_len: usize,
    action_count: usize,
    rng: StdRng,
}

impl ReplayBuffer {
    pub fn new(capacity: usize, observation_len: usize, action_count: usize) -> Self {
        ReplayBuffer {
            buffer: Vec::with_capacity(capacity),
            capacity,
            position: 0,
            len: 0,
            observation_len,
            action_count,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Add a transition to the buffer. Overwrites the oldest when full.
    pub fn add(&mut self, transition: Transition) {
        if self.buffer.len() < self.capacity {
            self.buffer.push(transition);
        } else {
            self.buffer[self.position] = transition;
        }
        self.position = (self.position + 1) % self.capacity;
        if self.len < self.capacity {
            self.len += 1;
        }
    }

    /// Sample a random batch of transitions without replacement.
    pub fn sample(&mut self, batch_size: usize) -> Vec<Transition> {
        assert!(batch_size <= self.len, "Not enough transitions to sample");
        let indices = index::sample(&mut self.rng, self.len, batch_size);
        indices.iter().map(|i| self.buffer[i].clone()).collect()
    }

    /// Stored transitions in insertion order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        let split = if self.len == self.capacity {
            self.position
        } else {
            0
        };
        self.buffer[split..].iter().chain(self.buffer[..split].iter())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn observation_len(&self) -> usize {
        self.observation_len
    }

    pub fn action_count(&self) -> usize {
        self.action_count
    }

    /// Serialize the buffer to a blob file.
    pub fn save(&self, path: &Path) -> Result<(), BufferError> {
        let blob = BufferBlob {
            capacity: self.capacity,
            observation_len: self.observation_len,
            action_count: self.action_count,
            transitions: self.iter().cloned().collect(),
        };
        let bytes = bincode::serde::encode_to_vec(&blob, config::standard())?;
        std::fs::write(path, bytes).map_err(|e| BufferError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Restore a buffer from a blob file written by [`ReplayBuffer::save`].
    pub fn load(path: &Path) -> Result<Self, BufferError> {
        let bytes = std::fs::read(path).map_err(|e| BufferError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let (blob, _): (BufferBlob, usize) =
            bincode::serde::decode_from_slice(&bytes, config::standard()).map_err(|e| {
                BufferError::Decode {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
        if blob.transitions.len() > blob.capacity {
            return Err(BufferError::CapacityMismatch {
                path: path.to_path_buf(),
                stored: blob.transitions.len(),
                capacity: blob.capacity,
            });
        }
        let len = blob.transitions.len();
        Ok(ReplayBuffer {
            buffer: blob.transitions,
            capacity: blob.capacity,
            position: len % blob.capacity.max(1),
            len,
            observation_len: blob.observation_len,
            action_count: blob.action_count,
            rng: StdRng::from_os_rng(),
        })
    }
}
