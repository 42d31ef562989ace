//! Voice conversation pipeline
//!
//! This crate provides the turn pipeline around the audio device:
//! - Speech-to-text client ([`stt::TranscriptionClient`])
//! - Text-to-speech client ([`tts::SynthesisClient`])
//! - Localized user-facing messages ([`messages`])
//! - The conversation orchestrator state machine ([`orchestrator`])

pub mod messages;
pub mod orchestrator;
pub mod stt;
pub mod tts;

pub use orchestrator::{
    FailureLeg, OrchestratorEvent, OrchestratorState, TurnOutcome, VoiceOrchestrator,
};
pub use stt::{TranscriptionClient, FALLBACK_TRANSCRIPT};
pub use tts::SynthesisClient;
