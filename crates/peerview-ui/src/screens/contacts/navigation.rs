use peerview_core::effects::{Command, Effect};

use super::intent::Action;

pub fn effects(action: Action) -> Option<Effect> {
    match action {
        Action::CloseDrawer => Some(Effect::Navigate(Command::CloseDrawer)),
        Action::ExitApp => Some(Effect::Exit),
        Action::ChangeTab(_)
        | Action::ScrollToActivityTop
        | Action::ScrollToConnectionsTop
        | Action::BackToActivityTab
        | Action::DrawerToggled(_) => None,
    }
}
