//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Registration backend configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Speech-to-text service configuration
    #[serde(default)]
    pub stt: SttConfig,

    /// Reasoning/assistant LLM service configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Text-to-speech service configuration
    #[serde(default)]
    pub tts: TtsConfig,

    /// Conversation behavior configuration
    #[serde(default)]
    pub conversation: ConversationConfig,
}

impl Settings {
    /// Validate settings, failing fast on missing credentials
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::Missing("backend.base_url"));
        }
        if self.stt.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("stt.api_key"));
        }
        if self.llm.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("llm.api_key"));
        }
        if self.tts.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("tts.api_key"));
        }

        if self.tts.max_chars == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tts.max_chars".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        for (field, timeout) in [
            ("backend.timeout_seconds", self.backend.timeout_seconds),
            ("stt.timeout_seconds", self.stt.timeout_seconds),
            ("llm.timeout_seconds", self.llm.timeout_seconds),
            ("tts.timeout_seconds", self.tts.timeout_seconds),
        ] {
            if timeout == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "timeout must be greater than zero".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Registration backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the registration backend (e.g. `https://api.example.in`)
    #[serde(default)]
    pub base_url: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Speech-to-text service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// Service endpoint
    #[serde(default = "default_stt_endpoint")]
    pub endpoint: String,

    /// API key (set via SAHAYAK__STT__API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// Model identifier sent with each request
    #[serde(default = "default_stt_model")]
    pub model: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            endpoint: default_stt_endpoint(),
            api_key: String::new(),
            model: default_stt_model(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Reasoning/assistant LLM service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Chat-completions endpoint
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// API key (set via SAHAYAK__LLM__API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// Model identifier
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Completion token cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            api_key: String::new(),
            model: default_llm_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Text-to-speech service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Service endpoint
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,

    /// API key (set via SAHAYAK__TTS__API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// Voice identifier
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Output sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Provider hard limit on input text length, in characters.
    /// Longer text is truncated before the call, never rejected.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_tts_endpoint(),
            api_key: String::new(),
            voice: default_voice(),
            sample_rate: default_sample_rate(),
            max_chars: default_max_chars(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Conversation behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Default language code (hi / mr / en)
    #[serde(default = "default_language")]
    pub language: String,

    /// Optional cap on retained user/assistant turns.
    /// `None` keeps the full history for the session lifetime.
    #[serde(default)]
    pub history_limit: Option<usize>,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            history_limit: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_stt_endpoint() -> String {
    "https://api.sarvam.ai/speech-to-text".to_string()
}
fn default_stt_model() -> String {
    "saarika:v2".to_string()
}
fn default_llm_endpoint() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}
fn default_llm_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_tokens() -> u32 {
    512
}
fn default_tts_endpoint() -> String {
    "https://api.sarvam.ai/text-to-speech".to_string()
}
fn default_voice() -> String {
    "meera".to_string()
}
fn default_sample_rate() -> u32 {
    22050
}
fn default_max_chars() -> usize {
    500
}
fn default_language() -> String {
    "hi".to_string()
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (SAHAYAK__ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("SAHAYAK")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
