use crate::components::{use_audio, welcome_track, AppView, Icon, PlaybackPhase};
use crate::db::PlayerSettings;
use dioxus::logger::tracing::debug;
use dioxus::prelude::*;

const FIELDING_TEAM: [&str; 5] = [
    "Himanshu Kaushik",
    "Anand Mishra",
    "Nitish Samota",
    "Ankesh Raj",
    "Harsh",
];

#[component]
pub fn Home() -> Element {
    let audio = use_audio();
    let settings = use_context::<PlayerSettings>();

    // Start the welcome loop on entry unless something is already playing
    use_effect(move || {
        if !settings.autoplay_welcome {
            return;
        }
        let welcome = welcome_track();
        let state = audio.snapshot();
        let other_track_starting = state.phase == PlaybackPhase::Loading
            && state.current_track.as_ref() != Some(&welcome);
        if state.is_playing || other_track_starting {
            return;
        }
        debug!("home: starting welcome loop");
        audio.play(welcome);
    });

    rsx! {
        div { class: "min-h-screen bg-black py-8 px-4",
            div { class: "max-w-md mx-auto space-y-8",
                div { class: "text-center space-y-4",
                    div { class: "flex items-center justify-center gap-3",
                        Icon { name: "music".to_string(), class: "w-12 h-12 text-red-600".to_string() }
                        h1 { class: "text-4xl font-black text-white uppercase tracking-tight",
                            "BMSIT"
                            br {}
                            "Disconnect"
                        }
                    }
                    p { class: "text-zinc-400 text-sm uppercase tracking-wider",
                        "Enter at your own risk"
                    }
                }

                div { class: "bg-zinc-950 border border-red-900 rounded-xl p-6 space-y-4",
                    h2 { class: "text-xl font-black text-red-600 uppercase tracking-wide text-center",
                        "Fielding Team"
                    }
                    div { class: "space-y-2",
                        for member in FIELDING_TEAM {
                            div {
                                key: "{member}",
                                class: "bg-zinc-900 border border-red-900 rounded-lg p-3 text-center font-bold text-white",
                                "{member}"
                            }
                        }
                    }
                }

                div { class: "space-y-4",
                    Link {
                        to: AppView::SetFielding {},
                        class: "block w-full h-14 rounded-lg bg-red-600 text-white text-lg font-black uppercase flex items-center justify-center",
                        "Set Fielding"
                    }
                    Link {
                        to: AppView::JoinTeam {},
                        class: "block w-full h-14 rounded-lg bg-red-600 text-white text-lg font-black uppercase flex items-center justify-center",
                        "Join Fielding Team"
                    }
                }
            }
        }
    }
}
