use peerview_core::events::ContentTab;
use peerview_core::tab::TabId;
use peerview_core::view::View;

use super::model::State;
use crate::screens::tab_bar;

const MENU: [&str; 6] = [
    "settings",
    "raw-database",
    "self-profile",
    "download",
    "translate",
    "bug-report",
];

pub fn render(state: &State) -> View {
    let badges: Vec<(ContentTab, u32)> = state.badges.iter().map(|(tab, &n)| (tab, n)).collect();

    let mut profile = View::new("self-profile").prop("id", &state.self_feed_id);
    if let Some(name) = &state.name {
        profile = profile.prop("name", name);
    }
    if let Some(avatar) = &state.self_avatar_url {
        profile = profile.prop("avatar", avatar);
    }

    let mut view = View::new("desktop-frame")
        .prop("current_tab", state.current_tab.as_str())
        .prop("localized", state.localization_loaded)
        .child(profile)
        .child(View::new("side-rail").child(tab_bar(state.current_tab, &badges)))
        .child(
            View::new("menu")
                .children(MENU.iter().map(|item| View::new("menu-item").prop("id", item))),
        );

    if state.has_new_version {
        view = view.child(View::new("new-version"));
    }
    if state.migration_progress > 0.0 && state.migration_progress < 1.0 {
        view = view.child(
            View::new("migration-progress")
                .prop("progress", format!("{:.2}", state.migration_progress)),
        );
    }
    if state.indexing_progress > 0.0 && state.indexing_progress < 1.0 {
        view = view.child(
            View::new("indexing-progress")
                .prop("progress", format!("{:.2}", state.indexing_progress)),
        );
    }
    view
}
