//! WAV-file audio backend
//!
//! Stands in for real microphone and speaker hardware on desktop targets:
//! "recording" reads a prepared WAV file, "playback" writes the synthesized
//! audio to a temporary WAV file whose path is logged.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tempfile::NamedTempFile;

use sahayak_core::{AudioResource, DeviceError};

use crate::backend::AudioBackend;

pub struct WavFileBackend {
    /// WAV file returned by the next capture
    input: Mutex<Option<PathBuf>>,
    /// Keeps the current playback file alive until the next one starts
    playback_file: Mutex<Option<NamedTempFile>>,
}

impl WavFileBackend {
    pub fn new() -> Self {
        Self {
            input: Mutex::new(None),
            playback_file: Mutex::new(None),
        }
    }

    /// Set the WAV file the next capture will read
    pub fn set_input(&self, path: impl Into<PathBuf>) {
        *self.input.lock() = Some(path.into());
    }

    /// Path of the most recent playback file, if any
    pub fn last_playback_path(&self) -> Option<PathBuf> {
        self.playback_file.lock().as_ref().map(|f| f.path().to_path_buf())
    }

    fn read_wav(path: &Path) -> Result<AudioResource, DeviceError> {
        let reader = hound::WavReader::open(path)
            .map_err(|e| DeviceError::Backend(format!("cannot open {}: {e}", path.display())))?;
        let sample_rate = reader.spec().sample_rate;
        drop(reader);

        let bytes = std::fs::read(path)
            .map_err(|e| DeviceError::Backend(format!("cannot read {}: {e}", path.display())))?;
        Ok(AudioResource::new(bytes, sample_rate))
    }
}

impl Default for WavFileBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for WavFileBackend {
    fn start_capture(&self) -> Result<(), DeviceError> {
        let input = self.input.lock();
        let path = input
            .as_ref()
            .ok_or_else(|| DeviceError::Backend("no input WAV configured".to_string()))?;
        if !path.exists() {
            return Err(DeviceError::Backend(format!(
                "input WAV not found: {}",
                path.display()
            )));
        }
        Ok(())
    }

    fn finish_capture(&self) -> Result<AudioResource, DeviceError> {
        let path = self
            .input
            .lock()
            .clone()
            .ok_or_else(|| DeviceError::Backend("no input WAV configured".to_string()))?;
        Self::read_wav(&path)
    }

    fn abort_capture(&self) {
        // nothing buffered; the input file stays untouched
    }

    fn start_playback(&self, resource: &AudioResource) -> Result<(), DeviceError> {
        // Sanity-check the payload is a WAV container before writing it out
        hound::WavReader::new(Cursor::new(&resource.bytes))
            .map_err(|e| DeviceError::Backend(format!("playback payload is not WAV: {e}")))?;

        let file = NamedTempFile::new()
            .map_err(|e| DeviceError::Backend(format!("cannot create playback file: {e}")))?;
        std::fs::write(file.path(), &resource.bytes)
            .map_err(|e| DeviceError::Backend(format!("cannot write playback file: {e}")))?;

        tracing::info!(path = %file.path().display(), "playback audio written");
        *self.playback_file.lock() = Some(file);
        Ok(())
    }

    fn stop_playback(&self) {
        // file playback completes instantly; nothing to stop
    }

    fn playback_active(&self) -> bool {
        false
    }
}
