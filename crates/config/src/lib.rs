//! Configuration management for the Sahayak voice assistant
//!
//! Supports loading configuration from:
//! - YAML files (`config/default.yaml`, `config/{env}.yaml`)
//! - Environment variables (`SAHAYAK__` prefix, `__` separator)
//!
//! The backend base URL and the STT/LLM/TTS API keys are required; their
//! absence fails validation at startup rather than degrading at call time.

pub mod settings;

pub use settings::{
    load_settings, BackendConfig, ConversationConfig, LlmConfig, Settings, SttConfig, TtsConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Configuration source error: {0}")]
    Source(#[from] config::ConfigError),
}
