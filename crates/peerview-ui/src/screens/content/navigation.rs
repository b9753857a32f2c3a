//! Content screen actions to effects.

use peerview_core::effects::{Command, Effect, Screen};
use peerview_core::events::{
    ContactScreenUpdate, ContentScreenUpdate, ContentTab, GlobalEvent, MessageScreenUpdate,
};
use tracing::debug;

use super::intent::Action;
use super::model::State;

pub fn effects(action: &Action, state: &State) -> Option<Effect> {
    match action {
        &Action::RequestTab(tab) => Some(Effect::Dispatch(
            ContentScreenUpdate::ChangeTab { tab }.into(),
        )),
        Action::ScrollToTop(ContentTab::Messages) => Some(Effect::Dispatch(
            MessageScreenUpdate::ScrollToTop {
                tab: state.messages_sub_tab(),
            }
            .into(),
        )),
        Action::ScrollToTop(ContentTab::Contacts) => Some(Effect::Dispatch(
            ContactScreenUpdate::ScrollToTop {
                tab: state.contacts_sub_tab(),
            }
            .into(),
        )),
        Action::ScrollToTop(tab) => {
            debug!(tab = ?tab, "tab has no embedded screen to scroll");
            None
        }
        Action::CloseDrawer => Some(Effect::Navigate(Command::CloseDrawer)),
        Action::DelegateBack => Some(Effect::Dispatch(GlobalEvent::HardwareBackOnCentralScreen)),
        Action::BackToHome => Some(Effect::Dispatch(
            ContentScreenUpdate::ChangeTab {
                tab: ContentTab::Home,
            }
            .into(),
        )),
        Action::ExitApp => Some(Effect::Exit),
        Action::OpenProfile(id) => Some(Effect::Navigate(Command::Push(Screen::Profile(
            id.clone(),
        )))),
        Action::OpenThread(id) => Some(Effect::Navigate(Command::Push(Screen::Thread(
            id.clone(),
        )))),
        Action::OpenHashtag(tag) => Some(Effect::Navigate(Command::Push(Screen::Hashtag(
            tag.clone(),
        )))),
        Action::ChangeTab(_)
        | Action::DrawerToggled(_)
        | Action::HomeUpdates(_)
        | Action::ProfilesUpdates(_)
        | Action::DiscoverUpdate(_) => None,
    }
}
