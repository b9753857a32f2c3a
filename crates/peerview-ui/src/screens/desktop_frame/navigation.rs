use peerview_core::effects::{Command, Effect, Screen};
use peerview_core::events::ContentScreenUpdate;

use super::intent::Action;
use super::model::{FrameOptions, State};

pub fn effects(action: Action, state: &State, options: &FrameOptions) -> Option<Effect> {
    match action {
        Action::RequestTab(tab) => Some(Effect::Dispatch(
            ContentScreenUpdate::ChangeTab { tab }.into(),
        )),
        Action::RequestScrollToTop(tab) => Some(Effect::Dispatch(
            ContentScreenUpdate::ScrollToTop { tab }.into(),
        )),
        Action::OpenSettings => Some(Effect::Navigate(Command::Push(Screen::Settings))),
        Action::OpenRawDatabase => Some(Effect::Navigate(Command::Push(Screen::RawDatabase))),
        Action::OpenSelfProfile => Some(Effect::Navigate(Command::Push(Screen::Profile(
            state.self_feed_id.clone(),
        )))),
        Action::Download => Some(Effect::Link(options.download_url.clone())),
        Action::Translate => Some(Effect::Link(options.translate_url.clone())),
        Action::BugReport => Some(Effect::Link(format!(
            "mailto:{}",
            options.bug_report_email
        ))),
        Action::ChangeTab(_)
        | Action::UpdateBadge(..)
        | Action::LocalizationLoaded
        | Action::ApproveCheckingNewVersion => None,
    }
}
