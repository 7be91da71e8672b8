use std::path::PathBuf;

/// Errors that can occur when loading model configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors that can occur when loading a world definition.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("failed to read world file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse world file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Errors that can occur while reading recorded experiments.
#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    #[error("failed to read experiment file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse experiment file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to scan experiment folder {path}: {source}")]
    DirRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors that can occur while persisting or restoring a replay buffer.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("failed to read buffer file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write buffer file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode buffer: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("failed to decode buffer file {path}: {source}")]
    Decode {
        path: PathBuf,
        source: bincode::error::DecodeError,
    },

    #[error("buffer file {path} holds {stored} transitions but declares capacity {capacity}")]
    CapacityMismatch {
        path: PathBuf,
        stored: usize,
        capacity: usize,
    },
}

/// Errors that can occur while orchestrating a training run.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("model configuration not found: {0}")]
    ConfigMissing(PathBuf),

    #[error("input replay buffer not found: {0}")]
    BufferMissing(PathBuf),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),

    #[error("learner error: {0}")]
    Learner(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("learner.learning_rate must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: learner.learning_rate must be > 0"
        );
    }

    #[test]
    fn test_session_error_display() {
        let err = SessionError::ConfigMissing(PathBuf::from("models/botevade/DQN_config.json"));
        assert_eq!(
            err.to_string(),
            "model configuration not found: models/botevade/DQN_config.json"
        );
    }

    #[test]
    fn test_buffer_error_display() {
        let err = BufferError::CapacityMismatch {
            path: PathBuf::from("buffers/buffer.bin"),
            stored: 12,
            capacity: 10,
        };
        assert_eq!(
            err.to_string(),
            "buffer file buffers/buffer.bin holds 12 transitions but declares capacity 10"
        );
    }
}
