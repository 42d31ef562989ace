//! Text-to-speech client

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use sahayak_config::TtsConfig;
use sahayak_core::{AudioResource, Error, Language, Result, TextToSpeech};

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    target_language_code: &'a str,
    speaker: &'a str,
    speech_sample_rate: u32,
}

#[derive(Deserialize)]
struct SynthesisResponse {
    #[serde(default)]
    audios: Vec<String>,
}

/// Client for the remote synthesis service
pub struct SynthesisClient {
    http: reqwest::Client,
    config: TtsConfig,
}

impl SynthesisClient {
    pub fn new(config: TtsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Synthesis(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }
}

/// Truncate to the provider's hard character limit, on a char boundary
///
/// Lossy by design: truncation instead of rejection, so the dialogue never
/// stalls on an overlong backend message.
pub fn truncate_for_synthesis(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[async_trait]
impl TextToSpeech for SynthesisClient {
    async fn synthesize(&self, text: &str, language: Language) -> Result<AudioResource> {
        let clipped = truncate_for_synthesis(text, self.config.max_chars);
        if clipped.len() < text.len() {
            tracing::warn!(
                max_chars = self.config.max_chars,
                "synthesis input truncated to provider limit"
            );
        }

        let request = SynthesisRequest {
            text: clipped,
            target_language_code: language.locale(),
            speaker: &self.config.voice,
            speech_sample_rate: self.config.sample_rate,
        };

        let response = self
            .http
            .post(&self.config.endpoint)
            .header("api-subscription-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Synthesis(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Synthesis(format!("service returned {status}: {body}")));
        }

        let parsed: SynthesisResponse = response
            .json()
            .await
            .map_err(|e| Error::Synthesis(format!("malformed response: {e}")))?;

        let encoded = parsed
            .audios
            .into_iter()
            .next()
            .ok_or_else(|| Error::Synthesis("response contained no audio".to_string()))?;

        let bytes = BASE64
            .decode(encoded.as_bytes())
            .map_err(|e| Error::Synthesis(format!("invalid base64 audio: {e}")))?;

        Ok(AudioResource::new(bytes, self.config.sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_for_synthesis("namaste", 500), "namaste");
    }

    #[test]
    fn long_text_is_clipped_at_char_count() {
        let text = "a".repeat(600);
        assert_eq!(truncate_for_synthesis(&text, 500).len(), 500);
    }

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        let text = "नमस्ते".repeat(200); // 6 chars each, multibyte
        let clipped = truncate_for_synthesis(&text, 500);
        assert_eq!(clipped.chars().count(), 500);
        // must still be valid UTF-8 slicing
        assert!(text.starts_with(clipped));
    }

    #[test]
    fn response_decodes_first_audio() {
        let parsed: SynthesisResponse =
            serde_json::from_str(r#"{"audios": ["aGVsbG8="]}"#).unwrap();
        let bytes = BASE64.decode(parsed.audios[0].as_bytes()).unwrap();
        assert_eq!(bytes, b"hello");
    }
}
