//! Conversation turn types shared between the session, clients and orchestrator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audio::AudioResource;

/// Role of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

impl TurnRole {
    /// Wire name used in LLM message lists
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::System => "system",
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// A single conversation turn
///
/// Insertion order is significant: the history is used verbatim as LLM
/// context and is never reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(TurnRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }
}

/// One recorded user utterance
///
/// Produced when a recording stops; the transcript is filled in by the STT
/// client. Ephemeral: folded into the session history and discarded.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub audio: AudioResource,
    pub transcript: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl Utterance {
    pub fn new(audio: AudioResource) -> Self {
        Self {
            audio,
            transcript: None,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.transcript = Some(transcript.into());
        self
    }
}

/// Status of one registration agent turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// The agent needs another answer from the user
    RequiresInput,
    /// All fields collected; user should approve final submission
    ReadyToSubmit,
    /// Domain-level failure reported by the agent (a normal dialogue outcome)
    Error,
}

/// Result of one `POST /agent/chat` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTurnResult {
    pub status: AgentStatus,
    pub message: String,
    /// Finite choice list the user may pick from verbally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Supported conversation languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "mr")]
    Marathi,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// ISO 639-1 code used in service calls
    pub fn code(&self) -> &'static str {
        match self {
            Language::Hindi => "hi",
            Language::Marathi => "mr",
            Language::English => "en",
        }
    }

    /// BCP 47 locale tag used by the TTS service
    pub fn locale(&self) -> &'static str {
        match self {
            Language::Hindi => "hi-IN",
            Language::Marathi => "mr-IN",
            Language::English => "en-IN",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "hi" | "hi-IN" => Some(Language::Hindi),
            "mr" | "mr-IN" => Some(Language::Marathi),
            "en" | "en-IN" => Some(Language::English),
            _ => None,
        }
    }
}
