//! Audio device management
//!
//! Owns the microphone and speaker and guarantees mutually exclusive use:
//! - a new recording preempts ongoing playback, and vice versa
//! - same-type conflicts are rejected with `DeviceError::Busy`
//! - `stop_*` is idempotent and callable from any orchestrator state,
//!   including while a network call is in flight
//!
//! Hardware access goes through the [`AudioBackend`] trait; the crate ships a
//! WAV-file backend for non-browser targets and tests use an in-memory one.

pub mod backend;
pub mod device;
pub mod wav;

pub use backend::AudioBackend;
pub use device::{AudioDeviceManager, PlaybackHandle, RecordingHandle};
pub use wav::WavFileBackend;
