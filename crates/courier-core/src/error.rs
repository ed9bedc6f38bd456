//! Error types for the courier agent

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for courier operations
pub type CourierResult<T> = Result<T, CourierError>;

/// Process exit statuses, one per terminal condition of a run
pub mod exit_codes {
    /// Artifacts were received and written
    pub const SUCCESS: i32 = 0;
    /// The description file has validation issues
    pub const VALIDATION_FAILED: i32 = 1;
    /// The description file is missing or already up to date
    pub const INPUT_UNAVAILABLE: i32 = 2;
    /// The configuration file is missing or incomplete
    pub const CONFIG: i32 = 3;
    /// No communication channel is declared in the description
    pub const NO_CHANNELS: i32 = 4;
    /// The server answered without the expected artifact
    pub const ARTIFACT_MISSING: i32 = 5;
    /// The server sent something the protocol does not define
    pub const PROTOCOL: i32 = 6;
    /// The configured retry budget ran out
    pub const RETRIES_EXHAUSTED: i32 = 7;
    /// Anything else
    pub const UNEXPECTED: i32 = 12;
}

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum CourierError {
    /// Configuration missing or invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// The description file cannot be used
    #[error("input unavailable: {0}")]
    InputUnavailable(String),

    /// The compiler front-end failed to produce a symbol model
    #[error("front-end error: {0}")]
    Frontend(String),

    /// Validation issues were reported; each one was logged when found
    #[error("description has {count} validation issue(s)")]
    InvalidDescription { count: usize },

    /// The description declares no communication channel
    #[error("no communication channels were found")]
    NoChannels,

    /// The state machine was asked to make an illegal move
    #[error("invalid session state: cannot move from {from} to {to}")]
    InvalidState { from: String, to: String },

    /// Unrecognized or malformed response from the server
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Connection or exchange failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Archive packing or unpacking failure
    #[error("archive error: {0}")]
    Archive(String),

    /// The server finished but the expected artifact is not in the workspace
    #[error("expected artifact not received: {}", .0.display())]
    ArtifactMissing(PathBuf),

    /// Too many rounds without a terminal response
    #[error("no result after {rounds} round(s)")]
    RetriesExhausted { rounds: u32 },

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Symbol model or configuration parsing error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl CourierError {
    /// Returns the process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CourierError::Config(_) => exit_codes::CONFIG,
            CourierError::InputUnavailable(_) => exit_codes::INPUT_UNAVAILABLE,
            CourierError::InvalidDescription { .. } => exit_codes::VALIDATION_FAILED,
            CourierError::NoChannels => exit_codes::NO_CHANNELS,
            CourierError::ArtifactMissing(_) => exit_codes::ARTIFACT_MISSING,
            CourierError::Protocol(_) => exit_codes::PROTOCOL,
            CourierError::RetriesExhausted { .. } => exit_codes::RETRIES_EXHAUSTED,
            CourierError::Frontend(_)
            | CourierError::InvalidState { .. }
            | CourierError::Transport(_)
            | CourierError::Archive(_)
            | CourierError::Io(_)
            | CourierError::Serialization(_) => exit_codes::UNEXPECTED,
        }
    }
}

impl From<serde_json::Error> for CourierError {
    fn from(err: serde_json::Error) -> Self {
        CourierError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CourierError {
    fn from(err: toml::de::Error) -> Self {
        CourierError::Config(err.to_string())
    }
}
