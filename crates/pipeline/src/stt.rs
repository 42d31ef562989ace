//! Speech-to-text client

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use sahayak_config::SttConfig;
use sahayak_core::{AudioResource, Error, Language, Result, SpeechToText};

/// Placeholder substituted when the service yields no usable text.
/// The orchestrator never advances the dialogue on an empty transcript.
pub const FALLBACK_TRANSCRIPT: &str = "(अस्पष्ट)";

#[derive(Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    transcript: Option<String>,
}

/// Client for the remote transcription service
pub struct TranscriptionClient {
    http: reqwest::Client,
    config: SttConfig,
}

impl TranscriptionClient {
    pub fn new(config: SttConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Transcription(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl SpeechToText for TranscriptionClient {
    async fn transcribe(&self, audio: &AudioResource, language: Language) -> Result<String> {
        let file = reqwest::multipart::Part::bytes(audio.bytes.clone())
            .file_name("utterance.wav")
            .mime_str("audio/wav")
            .map_err(|e| Error::Transcription(format!("invalid audio part: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("model", self.config.model.clone())
            .text("language_code", language.locale().to_string());

        let response = self
            .http
            .post(&self.config.endpoint)
            .header("api-subscription-key", &self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Transcription(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transcription(format!(
                "service returned {status}: {body}"
            )));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| Error::Transcription(format!("malformed response: {e}")))?;

        let transcript = parsed
            .transcript
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!("service returned no transcript, substituting placeholder");
                FALLBACK_TRANSCRIPT.to_string()
            });

        Ok(transcript)
    }
}
