//! Generic free-form assistant path
//!
//! Used when no scheme context is active: the transcript goes straight to the
//! LLM with the session history as context.

use async_trait::async_trait;

use sahayak_core::{AssistantModel, Language, Result, Turn};

use crate::client::{ChatMessage, CompletionClient};

pub struct Assistant {
    client: CompletionClient,
}

impl Assistant {
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssistantModel for Assistant {
    async fn respond(
        &self,
        history: &[Turn],
        utterance: &str,
        _language: Language,
    ) -> Result<String> {
        // The system instruction is already the first history turn, seeded at
        // session bootstrap.
        let mut messages: Vec<ChatMessage> = history.iter().map(ChatMessage::from).collect();
        messages.push(ChatMessage::user(utterance.to_string()));

        self.client.complete(&messages).await
    }
}
