//! Live view projection: merge alarm, reactions, and user directory into
//! one display state.
//!
//! Three independently-updating sources feed the projector; the merged
//! state follows a fixed precedence so a frontend never renders a
//! reaction list without display names.

pub mod live;

use serde::{Deserialize, Serialize};

use crate::model::{AlarmRecord, Reaction, ReactionKind, UserRef};
use crate::store::RemoteError;

pub use live::LiveAlarmState;

/// Fixed lead sentence prefixed to surfaced stream errors.
pub const ERROR_PREFIX: &str = "Something went wrong.";

/// Display name used when an author id is missing from the directory.
pub const UNKNOWN_MEMBER: &str = "Unknown member";

/// Sub-state of a view that holds no data yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadingKind {
    /// Observation not started.
    Idle,
    /// Waiting for the first update.
    InFlight,
    /// Observation ended; a new subscription is needed.
    Retry,
}

/// Tri-state wrapper every live view goes through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "camelCase")]
pub enum UiState<T> {
    Loading(LoadingKind),
    Error(String),
    Success(T),
}

impl<T> UiState<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, UiState::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            UiState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> UiState<U> {
        match self {
            UiState::Success(data) => UiState::Success(f(data)),
            UiState::Loading(kind) => UiState::Loading(kind),
            UiState::Error(message) => UiState::Error(message),
        }
    }

    /// Wrap a stream update, prefixing errors with the fixed sentence.
    pub fn from_update(update: Result<T, RemoteError>) -> Self {
        match update {
            Ok(data) => UiState::Success(data),
            Err(err) => UiState::Error(format!("{ERROR_PREFIX} {err}")),
        }
    }
}

/// Split a view into its data or the state to carry across the type
/// boundary.
fn split<T, U>(state: &UiState<T>) -> Result<&T, UiState<U>> {
    match state {
        UiState::Success(data) => Ok(data),
        UiState::Loading(kind) => Err(UiState::Loading(*kind)),
        UiState::Error(message) => Err(UiState::Error(message.clone())),
    }
}

fn park_for_retry<T>(view: &mut UiState<T>) {
    // An existing error is kept; it is more actionable than a spinner.
    if !matches!(view, UiState::Error(_)) {
        *view = UiState::Loading(LoadingKind::Retry);
    }
}

/// Alarm record decorated with its resolved author for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmDisplay {
    pub record: AlarmRecord,
    pub author_name: String,
}

/// Reaction decorated with its resolved author for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionDisplay {
    pub reaction: Reaction,
    pub author_name: String,
}

/// The merged display state; derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedAlarmView {
    /// `None` until the first broadcast ever happened.
    pub alarm: Option<AlarmDisplay>,
    pub reactions: Vec<ReactionDisplay>,
}

impl ProjectedAlarmView {
    pub fn of_kind(&self, kind: ReactionKind) -> impl Iterator<Item = &ReactionDisplay> {
        self.reactions
            .iter()
            .filter(move |display| display.reaction.kind == kind)
    }

    pub fn count(&self, kind: ReactionKind) -> usize {
        self.of_kind(kind).count()
    }
}

/// Identifies one of the three source views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Users,
    Alarm,
    Reactions,
}

/// Merges the three live views into one [`ProjectedAlarmView`] state.
#[derive(Debug, Clone)]
pub struct StateProjector {
    users: UiState<Vec<UserRef>>,
    alarm: UiState<Option<AlarmRecord>>,
    reactions: UiState<Vec<Reaction>>,
}

impl Default for StateProjector {
    fn default() -> Self {
        Self {
            users: UiState::Loading(LoadingKind::Idle),
            alarm: UiState::Loading(LoadingKind::Idle),
            reactions: UiState::Loading(LoadingKind::Idle),
        }
    }
}

impl StateProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every view still without data as waiting for its first
    /// update. Called when the observation loops start.
    pub fn start_observing(&mut self) {
        for kind in [
            self.users.loading_mut(),
            self.alarm.loading_mut(),
            self.reactions.loading_mut(),
        ]
        .into_iter()
        .flatten()
        {
            *kind = LoadingKind::InFlight;
        }
    }

    pub fn apply_users(&mut self, update: Result<Vec<UserRef>, RemoteError>) {
        self.users = UiState::from_update(update);
    }

    pub fn apply_alarm(&mut self, update: Result<Option<AlarmRecord>, RemoteError>) {
        self.alarm = UiState::from_update(update);
    }

    pub fn apply_reactions(&mut self, update: Result<Vec<Reaction>, RemoteError>) {
        self.reactions = UiState::from_update(update);
    }

    /// Park a view whose stream ended.
    pub fn mark_retry(&mut self, source: Source) {
        match source {
            Source::Users => park_for_retry(&mut self.users),
            Source::Alarm => park_for_retry(&mut self.alarm),
            Source::Reactions => park_for_retry(&mut self.reactions),
        }
    }

    /// Produce the merged state. Precedence is users, then alarm, then
    /// reactions: the first view not in success wins, so a stale user
    /// directory masks an otherwise loaded alarm.
    pub fn project(&self) -> UiState<ProjectedAlarmView> {
        let users = match split(&self.users) {
            Ok(users) => users,
            Err(state) => return state,
        };
        let alarm = match split(&self.alarm) {
            Ok(alarm) => alarm.clone(),
            Err(state) => return state,
        };
        let reactions = match split(&self.reactions) {
            Ok(reactions) => reactions.clone(),
            Err(state) => return state,
        };

        let resolve = |id: &str| {
            users
                .iter()
                .find(|user| user.id == id)
                .map(|user| user.display_name.clone())
                .unwrap_or_else(|| UNKNOWN_MEMBER.to_string())
        };

        let alarm = alarm.map(|record| AlarmDisplay {
            author_name: resolve(&record.author_user_id),
            record,
        });
        let reactions = reactions
            .into_iter()
            .map(|reaction| ReactionDisplay {
                author_name: resolve(&reaction.user_id),
                reaction,
            })
            .collect();

        UiState::Success(ProjectedAlarmView { alarm, reactions })
    }
}

impl<T> UiState<T> {
    fn loading_mut(&mut self) -> Option<&mut LoadingKind> {
        match self {
            UiState::Loading(kind) => Some(kind),
            _ => None,
        }
    }
}
