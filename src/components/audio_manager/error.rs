use thiserror::Error;

/// Why a source could not be loaded. Follows the `MediaError.code` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFailure {
    Aborted,
    Network,
    Decode,
    Unsupported,
    Unknown,
}

impl LoadFailure {
    pub fn from_media_code(code: u16) -> Self {
        match code {
            1 => Self::Aborted,
            2 => Self::Network,
            3 => Self::Decode,
            4 => Self::Unsupported,
            _ => Self::Unknown,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Aborted => "playback was aborted before the stream loaded",
            Self::Network => "network error while loading this track",
            Self::Decode => "audio could not be decoded",
            Self::Unsupported => "no supported source was found",
            Self::Unknown => "unable to load this audio source",
        }
    }
}

/// Why the device refused to start playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayRejection {
    /// Autoplay policy: the page has not received a user gesture yet.
    NotAllowed,
    NotSupported,
    Aborted,
    Other,
}

impl PlayRejection {
    /// Maps a DOMException name to a rejection kind.
    pub fn from_exception_name(name: &str) -> Self {
        match name {
            "NotAllowedError" => Self::NotAllowed,
            "NotSupportedError" => Self::NotSupported,
            "AbortError" => Self::Aborted,
            _ => Self::Other,
        }
    }
}

/// Device-level failures. These are carried in published state and logged;
/// commands never return them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    #[error("failed to load {uri}: {}", .reason.describe())]
    LoadFailed { uri: String, reason: LoadFailure },
    #[error("playback was rejected ({reason:?}): {message}")]
    PlayRejected {
        reason: PlayRejection,
        message: String,
    },
    #[error("no audio output is available on this platform")]
    NoOutput,
}

impl PlaybackError {
    pub fn is_autoplay_block(&self) -> bool {
        matches!(
            self,
            Self::PlayRejected {
                reason: PlayRejection::NotAllowed,
                ..
            }
        )
    }

    /// Short message for the transport widget.
    pub fn user_message(&self) -> String {
        match self {
            Self::LoadFailed { reason, .. } => {
                let text = reason.describe();
                let mut chars = text.chars();
                match chars.next() {
                    Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
                    None => String::new(),
                }
            }
            Self::PlayRejected {
                reason: PlayRejection::NotAllowed,
                ..
            } => "Tap play to start the music.".to_string(),
            Self::PlayRejected { .. } => "Playback could not start. Try again.".to_string(),
            Self::NoOutput => "Audio is not available here.".to_string(),
        }
    }
}
