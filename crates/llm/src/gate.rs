//! Reasoning gate
//!
//! One LLM call classifying an utterance as a sufficient answer to the
//! pending backend question. The tie-break favors re-asking over
//! mis-dispatching: only an output that is exactly the sufficiency sentinel
//! counts as sufficient.

use async_trait::async_trait;

use sahayak_core::{AnswerGate, GateDecision, Language, Result, Turn};

use crate::client::{ChatMessage, CompletionClient};
use crate::prompt::{gate_instruction, SUFFICIENCY_SENTINEL};

pub struct LlmGate {
    client: CompletionClient,
}

impl LlmGate {
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }
}

/// Classify a raw gate completion
///
/// Anything that is not exactly the sentinel (after trimming) is a
/// clarification whose full text is spoken back verbatim.
pub fn classify(reply: &str) -> GateDecision {
    let trimmed = reply.trim();
    if trimmed == SUFFICIENCY_SENTINEL {
        GateDecision::Sufficient
    } else {
        GateDecision::Clarify(trimmed.to_string())
    }
}

#[async_trait]
impl AnswerGate for LlmGate {
    async fn evaluate(
        &self,
        history: &[Turn],
        pending_request: Option<&str>,
        utterance: &str,
        language: Language,
    ) -> Result<GateDecision> {
        let mut messages =
            vec![ChatMessage::system(gate_instruction(pending_request, language))];
        messages.extend(history.iter().map(ChatMessage::from));
        messages.push(ChatMessage::user(utterance.to_string()));

        let reply = self.client.complete(&messages).await?;
        let decision = classify(&reply);
        tracing::debug!(?decision, "reasoning gate decision");
        Ok(decision)
    }
}
