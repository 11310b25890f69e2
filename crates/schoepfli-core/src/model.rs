//! Data model of the call-out alarm subsystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The singleton alarm document.
///
/// Overwritten in place by every broadcast, never deleted. The interval
/// between two successive broadcasts is one alarm epoch; reactions are
/// scoped to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmRecord {
    /// Document id; `None` until the first broadcast ever wrote it.
    pub id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// Empty string means the generic alarm text.
    pub message: String,
    /// Reference into the user directory; not owned by this subsystem.
    pub author_user_id: String,
}

/// A member's fixed-choice response to the current alarm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub user_id: String,
    pub kind: ReactionKind,
}

impl Reaction {
    pub fn new(user_id: impl Into<String>, kind: ReactionKind) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            modified_at: now,
            user_id: user_id.into(),
            kind,
        }
    }
}

/// The three fixed reaction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReactionKind {
    Coming,
    NotComing,
    AlreadyThere,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 3] = [
        ReactionKind::Coming,
        ReactionKind::NotComing,
        ReactionKind::AlreadyThere,
    ];

    /// Short verb phrase used in push bodies and the demo output.
    pub fn phrase(&self) -> &'static str {
        match self {
            ReactionKind::Coming => "is coming",
            ReactionKind::NotComing => "is not coming",
            ReactionKind::AlreadyThere => "is already there",
        }
    }
}

/// Directory entry used to decorate alarm and reaction authors for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub display_name: String,
}

impl UserRef {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// What a broadcaster asks to send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// The fixed call-out text.
    Generic,
    /// Free text entered by the broadcaster.
    Custom(String),
}

impl AlarmMessage {
    /// Text stored on the alarm document (empty = generic).
    pub fn stored_text(&self) -> &str {
        match self {
            AlarmMessage::Generic => "",
            AlarmMessage::Custom(text) => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_ids_are_unique() {
        let a = Reaction::new("u1", ReactionKind::Coming);
        let b = Reaction::new("u1", ReactionKind::Coming);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_reaction_kind_serde_names() {
        let json = serde_json::to_string(&ReactionKind::AlreadyThere).unwrap();
        assert_eq!(json, "\"alreadyThere\"");
        let back: ReactionKind = serde_json::from_str("\"notComing\"").unwrap();
        assert_eq!(back, ReactionKind::NotComing);
    }

    #[test]
    fn test_generic_message_stores_empty_text() {
        assert_eq!(AlarmMessage::Generic.stored_text(), "");
        assert_eq!(AlarmMessage::Custom("Hi".into()).stored_text(), "Hi");
    }
}
