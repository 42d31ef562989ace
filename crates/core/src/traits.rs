//! Service traits implemented by the client crates
//!
//! The orchestrator depends only on these seams, so the state machine can be
//! unit-tested without network services or a UI harness.

use async_trait::async_trait;

use crate::audio::AudioResource;
use crate::conversation::{AgentTurnResult, Language, Turn};
use crate::error::Result;
use crate::profile::ProfileSnapshot;

/// Decision of the reasoning gate for one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The utterance sufficiently answers the pending backend question
    Sufficient,
    /// Ask again; the full text is spoken back verbatim
    Clarify(String),
}

/// Speech-to-text service
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe a finalized recording
    ///
    /// Implementations must never return an empty transcript; if the service
    /// yields no usable text they substitute a documented placeholder.
    async fn transcribe(&self, audio: &AudioResource, language: Language) -> Result<String>;
}

/// Text-to-speech service
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize text into a playable audio resource
    async fn synthesize(&self, text: &str, language: Language) -> Result<AudioResource>;
}

/// Reasoning gate: decides whether an utterance answers the pending backend
/// question
#[async_trait]
pub trait AnswerGate: Send + Sync {
    async fn evaluate(
        &self,
        history: &[Turn],
        pending_request: Option<&str>,
        utterance: &str,
        language: Language,
    ) -> Result<GateDecision>;
}

/// Generic free-form assistant used outside a scheme context
#[async_trait]
pub trait AssistantModel: Send + Sync {
    async fn respond(&self, history: &[Turn], utterance: &str, language: Language)
        -> Result<String>;
}

/// Multi-turn registration agent backend
#[async_trait]
pub trait RegistrationBackend: Send + Sync {
    /// One turn of the registration chat, keyed by session id
    async fn chat(
        &self,
        session_id: &str,
        message: &str,
        profile: &ProfileSnapshot,
    ) -> Result<AgentTurnResult>;
}

/// Source of the onboarding profile projection
///
/// Queried fresh on every backend call.
pub trait ProfileSource: Send + Sync {
    fn snapshot(&self) -> ProfileSnapshot;
}
