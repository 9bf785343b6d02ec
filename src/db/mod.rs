use dioxus::logger::tracing::debug;
#[cfg(target_arch = "wasm32")]
use dioxus::logger::tracing::warn;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use gloo_storage::{LocalStorage, Storage};

#[cfg(target_arch = "wasm32")]
const SETTINGS_KEY: &str = "segment_player.settings";

const DEFAULT_VOLUME: f64 = 50.0;
const DEFAULT_SKIP_SECONDS: f64 = 5.0;

/// Player settings kept in the browser between visits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    /// Percent, `0..=100`.
    pub volume: f64,
    #[serde(default)]
    pub muted: bool,
    #[serde(default = "default_skip_seconds")]
    pub skip_seconds: f64,
    #[serde(default = "default_autoplay_welcome")]
    pub autoplay_welcome: bool,
}

fn default_skip_seconds() -> f64 {
    DEFAULT_SKIP_SECONDS
}

fn default_autoplay_welcome() -> bool {
    true
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            muted: false,
            skip_seconds: DEFAULT_SKIP_SECONDS,
            autoplay_welcome: true,
        }
    }
}

impl PlayerSettings {
    /// Repairs values a hand-edited or older store may contain.
    pub fn sanitized(mut self) -> Self {
        self.volume = if self.volume.is_finite() {
            // Older stores kept volume as a 0..1 fraction.
            let percent = if self.volume > 0.0 && self.volume < 1.0 {
                self.volume * 100.0
            } else {
                self.volume
            };
            percent.clamp(0.0, 100.0)
        } else {
            DEFAULT_VOLUME
        };
        if !self.skip_seconds.is_finite() || self.skip_seconds <= 0.0 {
            self.skip_seconds = DEFAULT_SKIP_SECONDS;
        }
        self
    }
}

#[cfg(target_arch = "wasm32")]
pub fn load_settings() -> PlayerSettings {
    match LocalStorage::get::<PlayerSettings>(SETTINGS_KEY) {
        Ok(settings) => settings.sanitized(),
        Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => PlayerSettings::default(),
        Err(err) => {
            warn!(error = %err, "stored player settings are unreadable, using defaults");
            PlayerSettings::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_settings() -> PlayerSettings {
    PlayerSettings::default()
}

#[cfg(target_arch = "wasm32")]
pub fn save_settings(settings: &PlayerSettings) {
    if let Err(err) = LocalStorage::set(SETTINGS_KEY, settings) {
        warn!(error = %err, "failed to save player settings");
    } else {
        debug!(volume = settings.volume, muted = settings.muted, "saved player settings");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_settings(settings: &PlayerSettings) {
    debug!(
        volume = settings.volume,
        muted = settings.muted,
        "settings are not persisted on this platform"
    );
}
