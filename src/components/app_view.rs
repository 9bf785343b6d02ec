//! Routes of the single-page app. Every page renders inside [`AppShell`].

use super::views::{Home, JoinTeam, SetFielding};
use super::AppShell;
use dioxus::prelude::*;

#[derive(Routable, Clone, PartialEq, Debug)]
#[rustfmt::skip]
pub enum AppView {
    #[layout(AppShell)]
        #[route("/")]
        Home {},
        #[route("/join")]
        JoinTeam {},
        #[route("/set-fielding")]
        SetFielding {},
}

pub fn view_label(view: &AppView) -> &'static str {
    match view {
        AppView::Home {} => "Home",
        AppView::JoinTeam {} => "Join Team",
        AppView::SetFielding {} => "Set Fielding",
    }
}
