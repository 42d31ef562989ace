//! LLM service clients
//!
//! - [`CompletionClient`]: thin wrapper over an OpenAI-compatible
//!   chat-completions endpoint with defensive envelope parsing
//! - [`LlmGate`]: the reasoning gate deciding whether an utterance answers
//!   the pending backend question
//! - [`Assistant`]: the generic free-form assistant path used outside a
//!   scheme context
//! - [`prompt`]: system prompts, greetings and the sufficiency sentinel

pub mod assistant;
pub mod client;
pub mod gate;
pub mod prompt;

pub use assistant::Assistant;
pub use client::{ChatMessage, CompletionClient};
pub use gate::LlmGate;
pub use prompt::SUFFICIENCY_SENTINEL;
