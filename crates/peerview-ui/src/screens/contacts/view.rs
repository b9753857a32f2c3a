use peerview_core::events::ContactsTab;
use peerview_core::tab::TabId;
use peerview_core::view::{Fab, View};

use super::model::State;
use crate::screens::tab_bar;

pub fn render(state: &State, activity: View, connections: View, fab: &Fab) -> View {
    let mut view = View::new("contacts-screen")
        .prop("visible", state.is_visible)
        .prop("current_tab", state.current_tab.as_str())
        .child(tab_bar(
            state.current_tab,
            &[(ContactsTab::Activity, state.num_of_activity_updates)],
        ))
        .child(View::new("pages").children([activity, connections]))
        .child(fab.to_view());

    // publishing stays locked until the migration finishes
    if !state.can_publish_ssb {
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
