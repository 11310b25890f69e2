//! Reaction coordinator: one response per member per alarm epoch.

use std::sync::Arc;

use tracing::info;

use crate::error::AlarmError;
use crate::model::{Reaction, ReactionKind, UserRef};
use crate::notify::{NotificationDispatcher, PushPayload};
use crate::store::AlarmStore;

pub struct ReactionCoordinator {
    store: Arc<dyn AlarmStore>,
    dispatcher: Arc<dyn NotificationDispatcher>,
}

impl ReactionCoordinator {
    pub fn new(store: Arc<dyn AlarmStore>, dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        Self { store, dispatcher }
    }

    /// Record `user`'s response to the current alarm.
    ///
    /// The duplicate check and the insert are two separate round trips;
    /// the backend keeps no uniqueness constraint on the collection. The
    /// push must be delivered before the reaction is persisted.
    pub async fn add_reaction(&self, user: &UserRef, kind: ReactionKind) -> Result<(), AlarmError> {
        let existing = self.store.read_reactions_once().await?;
        if existing.iter().any(|r| r.user_id == user.id) {
            return Err(AlarmError::AlreadyReacted);
        }

        let payload = PushPayload::for_reaction(user, kind);
        self.dispatcher
            .send(&payload)
            .await
            .map_err(|e| AlarmError::Unknown(e.to_string()))?;

        info!(user = %user.id, ?kind, "recording reaction");
        self.store
            .insert_reaction(Reaction::new(user.id.clone(), kind))
            .await?;
        Ok(())
    }
}
