//! Screens and their child tabs.

pub mod contacts;
pub mod content;
pub mod desktop_frame;
pub mod messages;

use peerview_core::ids::FeedId;
use peerview_core::tab::TabId;
use peerview_core::view::View;

/// Parent-owned fields every embedded screen mirrors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabContext {
    pub is_visible: bool,
    pub self_feed_id: FeedId,
    pub self_avatar_url: Option<String>,
}

/// Tab bar with one button per tab; a zero badge is omitted.
pub(crate) fn tab_bar<T: TabId>(current: T, badges: &[(T, u32)]) -> View {
    View::new("tab-bar").children(T::ALL.iter().map(|&tab| {
        let mut button = View::new("tab")
            .prop("id", tab.as_str())
            .prop("active", tab == current);
        if let Some(&(_, badge)) = badges.iter().find(|(t, n)| *t == tab && *n > 0) {
            button = button.prop("badge", badge);
        }
        button
    }))
}
