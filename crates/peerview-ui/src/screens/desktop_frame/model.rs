//! Desktop frame state and reducers.

use enum_map::EnumMap;
use peerview_core::backend::BackendUpdate;
use peerview_core::config::AppConfig;
use peerview_core::events::ContentTab;
use peerview_core::ids::FeedId;
use peerview_core::reducer::Reducer;
use serde::Serialize;

use super::intent::Action;

/// Outbound links and the running version, taken from `[app]` config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOptions {
    pub version: String,
    pub download_url: String,
    pub translate_url: String,
    pub bug_report_email: String,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FrameOptions {
    fn from(app: &AppConfig) -> Self {
        Self {
            version: app.version.clone(),
            download_url: app.download_url.clone(),
            translate_url: app.translate_url.clone(),
            bug_report_email: app.bug_report_email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct State {
    pub self_feed_id: FeedId,
    pub self_avatar_url: Option<String>,
    /// Display name; `None` while unknown or when it is just the feed id.
    pub name: Option<String>,
    pub current_tab: ContentTab,
    pub badges: EnumMap<ContentTab, u32>,
    pub allow_checking_new_version: bool,
    pub has_new_version: bool,
    pub migration_progress: f64,
    pub indexing_progress: f64,
    pub localization_loaded: bool,
}

pub fn initial_state() -> State {
    State {
        self_feed_id: FeedId::default(),
        self_avatar_url: None,
        name: None,
        current_tab: ContentTab::Home,
        badges: EnumMap::default(),
        allow_checking_new_version: false,
        has_new_version: false,
        migration_progress: 0.0,
        indexing_progress: 0.0,
        localization_loaded: false,
    }
}

pub fn init() -> Reducer<State> {
    Reducer::init("init", initial_state)
}

/// Parses `major.minor.patch`, ignoring a leading `v` and any pre-release or
/// build suffix. Missing components count as zero.
fn parse_version(version: &str) -> Option<[u64; 3]> {
    let version = version.trim().trim_start_matches('v');
    let core = version.split(['-', '+']).next()?;
    let mut parts = [0u64; 3];
    for (i, part) in core.split('.').enumerate() {
        if i >= parts.len() {
            return None;
        }
        parts[i] = part.parse().ok()?;
    }
    Some(parts)
}

/// Whether `latest` is strictly newer than `current`. Unparseable input is
/// never newer.
pub fn is_newer(latest: &str, current: &str) -> bool {
    match (parse_version(latest), parse_version(current)) {
        (Some(latest), Some(current)) => latest > current,
        _ => false,
    }
}

pub fn backend_reducer(update: &BackendUpdate, options: &FrameOptions) -> Option<Reducer<State>> {
    match update {
        BackendUpdate::SelfFeedId(id) => {
            let id = id.clone();
            Some(Reducer::update("setSelfFeedId", move |prev: State| State {
                self_feed_id: id,
                ..prev
            }))
        }
        BackendUpdate::About(about) => {
            let about = about.clone();
            Some(Reducer::update("aboutReducer", move |prev: State| {
                if about.id != prev.self_feed_id {
                    return prev;
                }
                let name = about
                    .name
                    .filter(|name| name.as_str() != prev.self_feed_id.as_str());
                State {
                    self_avatar_url: about.image_url,
                    name,
                    ..prev
                }
            }))
        }
        &BackendUpdate::MigrationProgress(migration_progress) => Some(Reducer::update(
            "migrationProgressReducer",
            move |prev: State| State {
                migration_progress,
                ..prev
            },
        )),
        &BackendUpdate::IndexingProgress(indexing_progress) => Some(Reducer::update(
            "indexingProgressReducer",
            move |prev: State| State {
                indexing_progress,
                ..prev
            },
        )),
        BackendUpdate::Settings(settings) => {
            let allow = settings.allow_checking_new_version;
            Some(Reducer::update("settingsReducer", move |prev: State| State {
                allow_checking_new_version: allow,
                ..prev
            }))
        }
        BackendUpdate::LatestVersion(latest) => {
            let newer = is_newer(latest, &options.version);
            Some(Reducer::update("latestVersionReducer", move |prev: State| State {
                has_new_version: prev.has_new_version || newer,
                ..prev
            }))
        }
        _ => None,
    }
}

pub fn reducer(action: &Action) -> Option<Reducer<State>> {
    match *action {
        Action::ChangeTab(current_tab) => {
            Some(Reducer::update("changeTabReducer", move |prev: State| State {
                current_tab,
                ..prev
            }))
        }
        Action::UpdateBadge(tab, counter) => {
            Some(Reducer::update("badgeReducer", move |mut prev: State| {
                prev.badges[tab] = counter;
                prev
            }))
        }
        Action::LocalizationLoaded => {
            Some(Reducer::update("localizationReducer", |prev: State| State {
                localization_loaded: true,
                ..prev
            }))
        }
        Action::ApproveCheckingNewVersion => Some(Reducer::update(
            "approveCheckingNewVersionReducer",
            |prev: State| State {
                allow_checking_new_version: true,
                ..prev
            },
        )),
        Action::RequestTab(_)
        | Action::RequestScrollToTop(_)
        | Action::OpenSettings
        | Action::OpenRawDatabase
        | Action::OpenSelfProfile
        | Action::Download
        | Action::Translate
        | Action::BugReport => None,
    }
}
