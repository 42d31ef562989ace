//! Registration backend client
//!
//! Wraps the two backend endpoints:
//! - `POST /agent/chat`: one turn of the multi-turn registration interview
//! - `POST /agent/run`: one-shot prompt for the non-conversational
//!   eligibility check path
//!
//! Calls are at-most-once; a network failure surfaces as
//! `Error::Backend` with no automatic retry.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use sahayak_config::BackendConfig;
use sahayak_core::{AgentTurnResult, Error, ProfileSnapshot, RegistrationBackend, Result};

#[derive(Serialize)]
struct ChatRequest<'a> {
    session_id: &'a str,
    message: &'a str,
    profile: &'a ProfileSnapshot,
}

#[derive(Serialize)]
struct RunRequest<'a> {
    prompt: &'a str,
    profile: &'a ProfileSnapshot,
}

pub struct RegistrationClient {
    http: reqwest::Client,
    base_url: String,
}

impl RegistrationClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Backend(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// One-shot agent task, used by the eligibility check path
    pub async fn run(&self, prompt: &str, profile: &ProfileSnapshot) -> Result<Value> {
        let response = self
            .http
            .post(format!("{}/agent/run", self.base_url))
            .json(&RunRequest { prompt, profile })
            .send()
            .await
            .map_err(|e| Error::Backend(format!("agent run request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Backend(format!("agent run returned {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Backend(format!("malformed agent run response: {e}")))
    }
}

#[async_trait]
impl RegistrationBackend for RegistrationClient {
    async fn chat(
        &self,
        session_id: &str,
        message: &str,
        profile: &ProfileSnapshot,
    ) -> Result<AgentTurnResult> {
        let response = self
            .http
            .post(format!("{}/agent/chat", self.base_url))
            .json(&ChatRequest {
                session_id,
                message,
                profile,
            })
            .send()
            .await
            .map_err(|e| Error::Backend(format!("agent chat request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Backend(format!("agent chat returned {status}: {body}")));
        }

        let result: AgentTurnResult = response
            .json()
            .await
            .map_err(|e| Error::Backend(format!("malformed agent chat response: {e}")))?;

        tracing::debug!(session_id, status = ?result.status, "agent chat turn");
        Ok(result)
    }
}
