use dioxus::logger::tracing::Level;
use dioxus::prelude::*;

mod components;
mod db;
mod utils;

use components::AppView;

const APP_CSS: Asset = asset!("/assets/styling/app.css");
const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

fn main() {
    dioxus::logger::init(Level::INFO).expect("failed to initialise logger");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Meta { name: "theme-color", content: "#dc2626" }
        document::Meta { name: "mobile-web-app-capable", content: "yes" }
        document::Meta { name: "apple-mobile-web-app-title", content: "Segment Player" }

        document::Script { src: TAILWIND_CDN }
        document::Stylesheet { href: APP_CSS }

        Router::<AppView> {}
    }
}
