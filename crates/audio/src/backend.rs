//! Abstract interface over the audio hardware

use sahayak_core::{AudioResource, DeviceError};

/// Device-local audio operations
///
/// All methods are synchronous and expected to return quickly; long-running
/// playback is tracked via [`AudioBackend::playback_active`] and polled by the
/// device manager.
pub trait AudioBackend: Send + Sync {
    /// Begin capturing microphone audio
    fn start_capture(&self) -> Result<(), DeviceError>;

    /// Stop capturing and flush the recording into a retrievable resource
    fn finish_capture(&self) -> Result<AudioResource, DeviceError>;

    /// Stop capturing and discard whatever was recorded
    fn abort_capture(&self);

    /// Begin playing the given resource on the speaker
    fn start_playback(&self, resource: &AudioResource) -> Result<(), DeviceError>;

    /// Stop playback; must be a no-op when nothing is playing
    fn stop_playback(&self);

    /// Whether playback is still in progress
    fn playback_active(&self) -> bool;
}
