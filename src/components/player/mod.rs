use crate::components::{use_audio, use_playback, Icon};
use crate::db::PlayerSettings;
use crate::utils::format_clock;
use dioxus::prelude::*;

mod controls;

use controls::{MuteButton, PlayPauseButton, SkipButton};

/// Floating transport widget. Reads published playback state and sends every
/// change through the audio controller; only the expanded flag is local.
#[component]
pub fn Player() -> Element {
    let audio = use_audio();
    let playback = use_playback();
    let settings = use_context::<PlayerSettings>();
    let mut expanded = use_signal(|| false);

    // Auto-expand when a track starts playing
    use_effect(move || {
        let state = playback.get();
        if state.is_playing && state.current_track.is_some() {
            expanded.set(true);
        }
    });

    let state = playback.get();
    let title = state
        .current_track
        .as_ref()
        .map(|track| track.title.clone())
        .unwrap_or_else(|| "No Song".to_string());
    let artist = state
        .current_track
        .as_ref()
        .map(|track| track.artist.clone())
        .unwrap_or_else(|| "Unknown Artist".to_string());
    let error_message = state.last_error.as_ref().map(|error| error.user_message());
    let seek_max = if state.duration > 0.0 { state.duration } else { 100.0 };
    let volume = state.volume.round() as i32;
    let progress = state.progress_percent();

    let on_seek = {
        let audio = audio.clone();
        move |e: Event<FormData>| {
            if let Ok(value) = e.value().parse::<f64>() {
                audio.seek(value);
            }
        }
    };

    let on_volume_change = {
        let audio = audio.clone();
        move |e: Event<FormData>| {
            if let Ok(value) = e.value().parse::<f64>() {
                audio.set_volume(value);
            }
        }
    };

    rsx! {
        div { class: "fixed bottom-6 right-6 z-50",
            if !expanded() {
                button {
                    id: "player-open-btn",
                    r#type: "button",
                    class: "w-14 h-14 rounded-full bg-red-600 flex items-center justify-center shadow-lg shadow-red-900/50",
                    onclick: move |_| expanded.set(true),
                    Icon { name: "music".to_string(), class: "w-6 h-6 text-white".to_string() }
                }
                if state.is_playing {
                    div { class: "mt-1 h-1 w-14 bg-zinc-800 rounded-full overflow-hidden",
                        div {
                            class: "h-full bg-red-500",
                            style: "width: {progress}%",
                        }
                    }
                }
            } else {
                div { class: "w-72 bg-zinc-950 border border-red-900 rounded-xl p-4 space-y-4 shadow-xl shadow-red-900/40",
                    div { class: "flex items-center justify-between",
                        div { class: "flex items-center gap-2",
                            Icon { name: "music".to_string(), class: "w-5 h-5 text-red-500".to_string() }
                            h3 { class: "font-black text-sm uppercase tracking-wide text-white",
                                "Now Playing"
                            }
                        }
                        button {
                            id: "player-close-btn",
                            r#type: "button",
                            class: "h-6 w-6 text-zinc-500 hover:text-red-500",
                            onclick: move |_| expanded.set(false),
                            Icon { name: "x".to_string(), class: "w-4 h-4".to_string() }
                        }
                    }

                    div { class: "space-y-1",
                        p { class: "font-black text-white text-sm", "{title}" }
                        p { class: "text-xs text-zinc-400 uppercase tracking-wide", "{artist}" }
                    }

                    // Progress
                    div { class: "space-y-2",
                        input {
                            r#type: "range",
                            min: "0",
                            max: "{seek_max}",
                            step: "0.1",
                            value: "{state.current_time}",
                            class: "w-full h-1.5 bg-zinc-800 rounded-full appearance-none cursor-pointer accent-red-500",
                            oninput: on_seek,
                        }
                        div { class: "flex justify-between text-xs text-zinc-400",
                            span { {format_clock(state.current_time)} }
                            span { {format_clock(state.duration)} }
                        }
                    }

                    div { class: "flex items-center justify-center gap-2",
                        SkipButton { seconds: -settings.skip_seconds }
                        PlayPauseButton {}
                        SkipButton { seconds: settings.skip_seconds }
                    }

                    div { class: "flex items-center gap-3 pt-2 border-t border-red-900",
                        MuteButton {}
                        input {
                            r#type: "range",
                            min: "0",
                            max: "100",
                            step: "1",
                            value: volume,
                            class: "flex-1 h-1.5 bg-zinc-800 rounded-full appearance-none cursor-pointer accent-red-500",
                            oninput: on_volume_change,
                        }
                        span { class: "text-xs text-zinc-400 w-8 text-right", "{volume}" }
                    }

                    if let Some(message) = error_message {
                        p { class: "text-xs text-amber-400 text-center", "{message}" }
                    }

                }
            }
        }
    }
}
