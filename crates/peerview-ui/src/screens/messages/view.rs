use peerview_core::events::MessagesTab;
use peerview_core::tab::TabId;
use peerview_core::view::{Fab, View};

use super::model::State;
use crate::screens::tab_bar;

pub fn render(state: &State, public: View, private: View, fab: &Fab) -> View {
    let mut view = View::new("messages-screen")
        .prop("visible", state.is_visible)
        .prop("current_tab", state.current_tab.as_str())
        .child(tab_bar(
            state.current_tab,
            &[
                (MessagesTab::Public, state.num_of_public_updates),
                (MessagesTab::Private, state.num_of_private_updates),
            ],
        ))
        .child(View::new("pages").children([public, private]))
        .child(fab.to_view());

    if state.migration_progress > 0.0 && state.migration_progress < 1.0 {
        view = view.child(
            View::new("migration-banner")
                .prop("progress", format!("{:.2}", state.migration_progress)),
        );
    }
    if state.indexing_progress > 0.0 && state.indexing_progress < 1.0 {
        view = view.child(
            View::new("indexing-banner")
                .prop("progress", format!("{:.2}", state.indexing_progress)),
        );
    }
    view
}
