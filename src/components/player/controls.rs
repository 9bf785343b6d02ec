use crate::components::{use_audio, use_playback, Icon};
use dioxus::prelude::*;

/// Play/Pause button - reflects the device-confirmed playing flag
#[component]
pub(super) fn PlayPauseButton() -> Element {
    let audio = use_audio();
    let playback = use_playback();
    let state = playback.get();
    let has_track = state.current_track.is_some();

    rsx! {
        button {
            id: "play-pause-btn",
            r#type: "button",
            disabled: !has_track,
            class: "w-12 h-12 rounded-full bg-red-600 flex items-center justify-center hover:scale-105 transition-transform shadow-lg disabled:opacity-50",
            onclick: move |_| audio.toggle_play(),
            if state.is_playing {
                Icon {
                    name: "pause".to_string(),
                    class: "w-6 h-6 text-white".to_string(),
                }
            } else {
                Icon {
                    name: "play".to_string(),
                    class: "w-6 h-6 text-white ml-0.5".to_string(),
                }
            }
        }
    }
}

/// Skip button - moves the cursor by `seconds`, negative to go back
#[component]
pub(super) fn SkipButton(seconds: f64) -> Element {
    let audio = use_audio();
    let (id, icon) = if seconds < 0.0 {
        ("skip-back-btn", "prev")
    } else {
        ("skip-forward-btn", "next")
    };

    rsx! {
        button {
            id,
            r#type: "button",
            class: "p-2 text-zinc-300 hover:text-red-500 transition-colors",
            onclick: move |_| audio.skip_by(seconds),
            Icon { name: icon.to_string(), class: "w-4 h-4".to_string() }
        }
    }
}

/// Mute toggle
#[component]
pub(super) fn MuteButton() -> Element {
    let audio = use_audio();
    let playback = use_playback();
    let muted = playback.get().muted;

    rsx! {
        button {
            id: "mute-btn",
            r#type: "button",
            class: "p-2 text-zinc-300 hover:text-red-500 transition-colors",
            onclick: move |_| audio.set_muted(!muted),
            Icon {
                name: if muted { "volume-x".to_string() } else { "volume".to_string() },
                class: "w-4 h-4".to_string(),
            }
        }
    }
}
