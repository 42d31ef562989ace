//! Error types for the voice assistant

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the voice assistant
///
/// Each network-facing leg of a conversation turn has its own variant so the
/// orchestrator can tell the user which leg broke. `status = "error"` from the
/// registration agent is a normal dialogue outcome and is *not* represented
/// here.
#[derive(Error, Debug)]
pub enum Error {
    // Audio device errors
    #[error("Audio device error: {0}")]
    Device(#[from] DeviceError),

    // Speech-to-text leg
    #[error("Transcription failed: {0}")]
    Transcription(String),

    // Reasoning gate / generic assistant leg
    #[error("Reasoning failed: {0}")]
    Reasoning(String),

    // Registration backend leg (network/transport, not domain errors)
    #[error("Backend unavailable: {0}")]
    Backend(String),

    // Text-to-speech leg (non-fatal to the dialogue)
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    // Operation not legal in the current orchestrator state
    #[error("Invalid state: {0}")]
    State(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Audio device errors
#[derive(Error, Debug)]
pub enum DeviceError {
    /// The requested acquisition conflicts with a same-type holder
    #[error("Device busy")]
    Busy,

    /// The handle no longer owns the device (already released or preempted)
    #[error("Handle is stale")]
    Stale,

    #[error("Audio backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create an invalid-state error
    pub fn state<S: Into<String>>(msg: S) -> Self {
        Error::State(msg.into())
    }
}
