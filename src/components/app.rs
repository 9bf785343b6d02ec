use crate::components::{view_label, AppView, AudioProvider, Player};
use dioxus::logger::tracing::debug;
use dioxus::prelude::*;

/// Layout shared by every route. The audio provider sits above the outlet so
/// playback survives navigation between pages.
#[component]
pub fn AppShell() -> Element {
    let current_view = use_route::<AppView>();

    use_effect(use_reactive((&current_view,), |(view,)| {
        debug!("navigated to {}", view_label(&view));
    }));

    rsx! {
        AudioProvider {
            div { class: "min-h-screen bg-black text-white",
                main { class: "pb-24",
                    Outlet::<AppView> {}
                }
                Player {}
            }
        }
    }
}
