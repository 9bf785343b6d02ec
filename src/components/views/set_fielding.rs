use crate::components::{reward_track, use_audio, welcome_track, AppView, Icon};
use dioxus::logger::tracing::info;
use dioxus::prelude::*;

/// Time the reward loop gets to start before returning home.
#[cfg(target_arch = "wasm32")]
const RETURN_HOME_DELAY_MS: u32 = 1000;

#[component]
pub fn SetFielding() -> Element {
    let audio = use_audio();
    let navigator = use_navigator();
    let mut confirmed = use_signal(|| false);

    // The welcome loop does not follow the user onto this page
    {
        let audio = audio.clone();
        use_effect(move || {
            let welcome_title = welcome_track().title;
            let is_welcome = audio
                .snapshot()
                .current_track
                .is_some_and(|track| track.title == welcome_title);
            if is_welcome {
                audio.stop();
            }
        });
    }

    let on_confirm = move |_| {
        if confirmed() {
            return;
        }
        confirmed.set(true);
        info!("fielding set, playing reward");
        audio.play(reward_track());
        spawn(async move {
            #[cfg(target_arch = "wasm32")]
            gloo_timers::future::TimeoutFuture::new(RETURN_HOME_DELAY_MS).await;
            navigator.push(AppView::Home {});
        });
    };

    rsx! {
        div { class: "min-h-screen bg-black py-8 px-4",
            div { class: "max-w-md mx-auto space-y-6",
                div { class: "flex items-center gap-4",
                    Link { to: AppView::Home {}, class: "text-red-600",
                        Icon { name: "arrow-left".to_string(), class: "w-6 h-6".to_string() }
                    }
                    h1 { class: "text-3xl font-black text-red-600 uppercase tracking-tight",
                        "Set Fielding"
                    }
                }
                div { class: "bg-zinc-950 border border-red-900 rounded-xl p-6 space-y-4",
                    if confirmed() {
                        p { class: "text-center text-white font-black uppercase",
                            "Fielding Set Successfully!"
                        }
                    } else {
                        button {
                            id: "confirm-fielding-btn",
                            r#type: "button",
                            class: "w-full h-14 rounded-lg bg-red-600 text-white text-lg font-black uppercase",
                            onclick: on_confirm,
                            "Confirm Fielding"
                        }
                    }
                }
            }
        }
    }
}
