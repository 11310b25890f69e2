//! Push-notification dispatch contract.
//!
//! Only the dispatch contract lives here; delivery mechanics belong to
//! the backend behind [`NotificationDispatcher`]. A send must complete,
//! not merely be enqueued, before the coordinators touch stored state.

pub mod webhook;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AlarmMessage, ReactionKind, UserRef};

pub use webhook::WebhookDispatcher;

/// Fixed body of the generic call-out alarm.
pub const GENERIC_ALARM_BODY: &str = "Come to the Schöpfli, now!";

/// Notification title shared by all alarm pushes.
pub const ALARM_TITLE: &str = "Schöpflialarm";

/// Payload of an outgoing push notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PushPayload {
    GenericAlarm { author: String },
    CustomAlarm { author: String, body: String },
    Reaction { author: String, kind: ReactionKind },
}

impl PushPayload {
    pub fn for_alarm(acting_user: &UserRef, message: &AlarmMessage) -> Self {
        match message {
            AlarmMessage::Generic => PushPayload::GenericAlarm {
                author: acting_user.display_name.clone(),
            },
            AlarmMessage::Custom(text) => PushPayload::CustomAlarm {
                author: acting_user.display_name.clone(),
                body: text.clone(),
            },
        }
    }

    pub fn for_reaction(user: &UserRef, kind: ReactionKind) -> Self {
        PushPayload::Reaction {
            author: user.display_name.clone(),
            kind,
        }
    }

    pub fn author(&self) -> &str {
        match self {
            PushPayload::GenericAlarm { author }
            | PushPayload::CustomAlarm { author, .. }
            | PushPayload::Reaction { author, .. } => author,
        }
    }

    pub fn title(&self) -> String {
        match self {
            PushPayload::GenericAlarm { .. } | PushPayload::CustomAlarm { .. } => {
                ALARM_TITLE.to_string()
            }
            PushPayload::Reaction { .. } => format!("{ALARM_TITLE} update"),
        }
    }

    pub fn body(&self) -> String {
        match self {
            PushPayload::GenericAlarm { .. } => GENERIC_ALARM_BODY.to_string(),
            PushPayload::CustomAlarm { body, .. } => body.clone(),
            PushPayload::Reaction { author, kind } => format!("{author} {}", kind.phrase()),
        }
    }
}

/// Platform push permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushPermission {
    NotDetermined,
    Granted,
    Denied,
}

/// Dispatch failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("dispatcher is not configured: {0}")]
    NotConfigured(String),

    #[error("push delivery failed: {0}")]
    Http(String),

    #[error("push permission denied")]
    PermissionDenied,
}

/// Push dispatch contract consumed by the coordinators.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Current push permission as reported by the platform.
    async fn permission(&self) -> PushPermission;

    /// Show the permission prompt; resolves with the resulting state.
    async fn request_permission(&self) -> Result<PushPermission, DispatchError>;

    /// Deliver `payload` to the whole team. Resolves only once the
    /// backend accepted the send.
    async fn send(&self, payload: &PushPayload) -> Result<(), DispatchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserRef {
        UserRef::new("u1", "Vaiana")
    }

    #[test]
    fn test_generic_alarm_body_is_fixed() {
        let payload = PushPayload::for_alarm(&user(), &AlarmMessage::Generic);
        assert_eq!(payload.body(), GENERIC_ALARM_BODY);
        assert_eq!(payload.author(), "Vaiana");
        assert_eq!(payload.title(), "Schöpflialarm");
    }

    #[test]
    fn test_custom_alarm_body_is_verbatim() {
        let payload = PushPayload::for_alarm(&user(), &AlarmMessage::Custom("Hi".into()));
        assert_eq!(payload.body(), "Hi");
        assert_eq!(payload.author(), "Vaiana");
    }

    #[test]
    fn test_reaction_bodies() {
        let coming = PushPayload::for_reaction(&user(), ReactionKind::Coming);
        assert_eq!(coming.body(), "Vaiana is coming");
        let there = PushPayload::for_reaction(&user(), ReactionKind::AlreadyThere);
        assert_eq!(there.body(), "Vaiana is already there");
        let not = PushPayload::for_reaction(&user(), ReactionKind::NotComing);
        assert_eq!(not.body(), "Vaiana is not coming");
    }
}
