use crate::components::{AppView, Icon};
use dioxus::prelude::*;

#[component]
pub fn JoinTeam() -> Element {
    rsx! {
        div { class: "min-h-screen bg-black py-8 px-4",
            div { class: "max-w-md mx-auto space-y-6",
                div { class: "flex items-center gap-4",
                    Link { to: AppView::Home {}, class: "text-red-600",
                        Icon { name: "arrow-left".to_string(), class: "w-6 h-6".to_string() }
                    }
                    h1 { class: "text-3xl font-black text-red-600 uppercase tracking-tight",
                        "Join The Team"
                    }
                }
                div { class: "bg-zinc-950 border border-red-900 rounded-xl p-6 text-center space-y-2",
                    p { class: "text-white font-bold", "Fielding memberships open soon." }
                    p { class: "text-zinc-400 text-sm", "Whatever is playing keeps playing while you look around." }
                }
            }
        }
    }
}
