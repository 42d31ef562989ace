//! Chat-completions client

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sahayak_config::LlmConfig;
use sahayak_core::{Error, Result, Turn};

/// One message in a chat-completions request
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant",
            content: content.into(),
        }
    }
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role.as_str(),
            content: turn.content.clone(),
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint
#[derive(Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl CompletionClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Reasoning(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Run one completion over the given ordered message list
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Reasoning(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Reasoning(format!("service returned {status}: {body}")));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Reasoning(format!("malformed response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| Error::Reasoning("empty completion".to_string()))?;

        Ok(unwrap_envelope(&content))
    }
}

/// Unwrap completions that arrive inside a one-field JSON envelope
///
/// Some deployments wrap the text in an object like `{"response": "..."}`;
/// anything else is used as raw text.
pub fn unwrap_envelope(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        if map.len() == 1 {
            if let Some(Value::String(inner)) = map.values().next() {
                return inner.trim().to_string();
            }
        }
    }
    trimmed.to_string()
}
