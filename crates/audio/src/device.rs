//! Exclusive audio device manager

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use sahayak_core::{AudioResource, DeviceError};

use crate::backend::AudioBackend;

/// Exclusive handle over an in-progress recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingHandle {
    id: u64,
}

/// Exclusive handle over an in-progress playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackHandle {
    id: u64,
}

/// Which half of the device is currently held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeviceState {
    Idle,
    Recording(u64),
    Playing(u64),
}

/// Owns the microphone and speaker, guaranteeing mutually exclusive use
///
/// The state mutex is never held across an `.await`, so `stop_*` stays safe to
/// call from the interrupt path while a network call is pending elsewhere.
pub struct AudioDeviceManager {
    backend: Arc<dyn AudioBackend>,
    state: Mutex<DeviceState>,
    next_id: AtomicU64,
}

impl AudioDeviceManager {
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(DeviceState::Idle),
            next_id: AtomicU64::new(1),
        }
    }

    fn fresh_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Acquire the microphone
    ///
    /// Preempts ongoing playback; fails with `Busy` if another recording is
    /// active.
    pub fn acquire_recording(&self) -> Result<RecordingHandle, DeviceError> {
        let mut state = self.state.lock();
        match *state {
            DeviceState::Recording(_) => return Err(DeviceError::Busy),
            DeviceState::Playing(_) => {
                self.backend.stop_playback();
                tracing::debug!("playback preempted by new recording");
            }
            DeviceState::Idle => {}
        }

        if let Err(e) = self.backend.start_capture() {
            // the preempted playback is already stopped; its handle must not
            // stay named in the state
            *state = DeviceState::Idle;
            return Err(e);
        }
        let id = self.fresh_id();
        *state = DeviceState::Recording(id);
        Ok(RecordingHandle { id })
    }

    /// Stop the recording and flush it to a retrievable resource
    pub fn release(&self, handle: RecordingHandle) -> Result<AudioResource, DeviceError> {
        let mut state = self.state.lock();
        match *state {
            DeviceState::Recording(id) if id == handle.id => {
                let resource = self.backend.finish_capture()?;
                *state = DeviceState::Idle;
                Ok(resource)
            }
            _ => Err(DeviceError::Stale),
        }
    }

    /// Stop and discard a recording; idempotent
    pub fn stop_recording(&self, handle: RecordingHandle) {
        let mut state = self.state.lock();
        if let DeviceState::Recording(id) = *state {
            if id == handle.id {
                self.backend.abort_capture();
                *state = DeviceState::Idle;
            }
        }
    }

    /// Acquire the speaker and start playing the resource
    ///
    /// Preempts an ongoing recording (discarding it); fails with `Busy` if
    /// another playback is active.
    pub fn acquire_playback(&self, resource: &AudioResource) -> Result<PlaybackHandle, DeviceError> {
        let mut state = self.state.lock();
        match *state {
            DeviceState::Playing(_) => return Err(DeviceError::Busy),
            DeviceState::Recording(_) => {
                self.backend.abort_capture();
                tracing::debug!("recording preempted by new playback");
            }
            DeviceState::Idle => {}
        }

        if let Err(e) = self.backend.start_playback(resource) {
            // same invariant as capture: the preempted recording is gone
            *state = DeviceState::Idle;
            return Err(e);
        }
        let id = self.fresh_id();
        *state = DeviceState::Playing(id);
        Ok(PlaybackHandle { id })
    }

    /// Stop playback; idempotent and always permitted
    pub fn stop_playback(&self, handle: PlaybackHandle) {
        let mut state = self.state.lock();
        if let DeviceState::Playing(id) = *state {
            if id == handle.id {
                self.backend.stop_playback();
                *state = DeviceState::Idle;
            }
        }
    }

    /// Whether the given playback still owns the speaker
    pub fn playback_owned(&self, handle: PlaybackHandle) -> bool {
        matches!(*self.state.lock(), DeviceState::Playing(id) if id == handle.id)
    }

    /// Wait until the playback finishes or is stopped
    ///
    /// Completion is detected cooperatively by polling the backend, so a
    /// concurrent `stop_playback` from the interrupt path always wins.
    pub async fn wait_playback(&self, handle: PlaybackHandle) {
        loop {
            {
                let mut state = self.state.lock();
                match *state {
                    DeviceState::Playing(id) if id == handle.id => {
                        if !self.backend.playback_active() {
                            *state = DeviceState::Idle;
                            return;
                        }
                    }
                    // stopped or preempted elsewhere
                    _ => return,
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Whether the device is fully idle
    pub fn is_idle(&self) -> bool {
        matches!(*self.state.lock(), DeviceState::Idle)
    }
}
