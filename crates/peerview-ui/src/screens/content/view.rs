use peerview_core::events::ContentTab;
use peerview_core::tab::TabId;
use peerview_core::view::View;

use super::model::State;
use crate::screens::tab_bar;

/// Renders the tab bar and one page per tab; `messages` and `contacts` are
/// the embedded screens, the others are stub pages.
pub fn render(state: &State, messages: View, contacts: View) -> View {
    let page = |tab: ContentTab| {
        View::new(format!("{}-page", tab.as_str())).prop("visible", state.current_tab == tab)
    };
    View::new("content-screen")
        .prop("current_tab", state.current_tab.as_str())
        .prop("drawer_open", state.is_drawer_open)
        .child(tab_bar(
            state.current_tab,
            &[
                (ContentTab::Home, state.num_of_home_updates),
                (ContentTab::Messages, state.num_of_messages_updates),
                (ContentTab::Contacts, state.num_of_contacts_updates),
                (ContentTab::Profiles, state.num_of_profiles_updates),
            ],
        ))
        .child(View::new("pages").children([
            page(ContentTab::Home),
            messages,
            contacts,
            page(ContentTab::Discover).prop("substate", state.discover_substate),
            page(ContentTab::Profiles),
        ]))
}
