//! Audio manager: owns the page's single audio output and publishes its state.
//!
//! [`AudioController`] is the only path to the device. Widgets read
//! [`PlaybackSignal`] and issue commands; pages call `play` / `stop`.

mod controller;
mod device;
mod error;
mod handle;
mod provider;
mod published;
mod track;
#[cfg(target_arch = "wasm32")]
mod web_device;

#[cfg(test)]
mod testing;

pub use handle::AudioController;
pub use provider::{use_audio, use_playback, AudioProvider, PlaybackSignal};
pub use published::PlaybackPhase;
pub use track::{reward_track, welcome_track, Track};
