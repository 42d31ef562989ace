//! Core types and traits for the Sahayak voice assistant
//!
//! This crate provides foundational types used across all other crates:
//! - Conversation turns and agent results
//! - Audio resource types
//! - Profile snapshot sent to the registration backend
//! - Error types
//! - Service traits implemented by the client crates

pub mod audio;
pub mod conversation;
pub mod error;
pub mod profile;
pub mod traits;

pub use audio::AudioResource;
pub use conversation::{AgentStatus, AgentTurnResult, Language, Turn, TurnRole, Utterance};
pub use error::{DeviceError, Error, Result};
pub use profile::ProfileSnapshot;
pub use traits::{
    AnswerGate, AssistantModel, GateDecision, ProfileSource, RegistrationBackend, SpeechToText,
    TextToSpeech,
};
