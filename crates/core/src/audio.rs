//! Audio resource types

use serde::{Deserialize, Serialize};

/// A finalized chunk of audio, either captured from the microphone or decoded
/// from the TTS service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioResource {
    /// Encoded audio bytes (WAV container)
    pub bytes: Vec<u8>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioResource {
    pub fn new(bytes: Vec<u8>, sample_rate: u32) -> Self {
        Self { bytes, sample_rate }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}
