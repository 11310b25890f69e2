//! In-memory store used by the demo CLI and the end-to-end tests.
//!
//! Semantics mirror the remote backend: one singleton alarm document,
//! last-writer-wins writes, and observers that see the current value
//! immediately followed by every change.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use crate::model::{AlarmRecord, Reaction, UserRef};
use crate::store::{AlarmMutation, AlarmStore, RemoteError, UserDirectory};

/// In-process implementation of [`AlarmStore`] and [`UserDirectory`].
///
/// Cloning shares the underlying state.
#[derive(Clone)]
pub struct MemoryStore {
    alarm: watch::Sender<Option<AlarmRecord>>,
    reactions: watch::Sender<Vec<Reaction>>,
    users: watch::Sender<Vec<UserRef>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            alarm: watch::Sender::new(None),
            reactions: watch::Sender::new(Vec::new()),
            users: watch::Sender::new(Vec::new()),
        }
    }

    /// Replace the user directory contents (demo/test seeding).
    pub fn set_users(&self, users: Vec<UserRef>) {
        self.users.send_replace(users);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Pump a watch channel into the trait's mpsc stream shape: current value
/// first, then every change, until the consumer hangs up.
fn forward<T: Clone + Send + Sync + 'static>(
    mut rx: watch::Receiver<T>,
) -> mpsc::Receiver<Result<T, RemoteError>> {
    let (tx, out) = mpsc::channel(16);
    tokio::spawn(async move {
        loop {
            let value = rx.borrow_and_update().clone();
            if tx.send(Ok(value)).await.is_err() {
                break;
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    });
    out
}

#[async_trait]
impl AlarmStore for MemoryStore {
    async fn observe_alarm(&self) -> mpsc::Receiver<Result<Option<AlarmRecord>, RemoteError>> {
        forward(self.alarm.subscribe())
    }

    async fn observe_reactions(&self) -> mpsc::Receiver<Result<Vec<Reaction>, RemoteError>> {
        forward(self.reactions.subscribe())
    }

    async fn read_alarm_once(&self) -> Result<Option<AlarmRecord>, RemoteError> {
        Ok(self.alarm.borrow().clone())
    }

    async fn read_reactions_once(&self) -> Result<Vec<Reaction>, RemoteError> {
        Ok(self.reactions.borrow().clone())
    }

    async fn update_alarm(
        &self,
        force_new_timestamp: bool,
        mutate: AlarmMutation,
    ) -> Result<(), RemoteError> {
        let now = Utc::now();
        let mut mutate = Some(mutate);
        self.alarm.send_modify(|slot| {
            let Some(mutate) = mutate.take() else { return };
            let current = slot.take().unwrap_or_else(|| AlarmRecord {
                id: None,
                created_at: now,
                modified_at: now,
                message: String::new(),
                author_user_id: String::new(),
            });
            let mut next = mutate(current);
            if next.id.is_none() {
                next.id = Some(Uuid::new_v4().to_string());
            }
            if force_new_timestamp {
                next.created_at = now;
            }
            next.modified_at = now;
            *slot = Some(next);
        });
        Ok(())
    }

    async fn delete_all_reactions(&self) -> Result<(), RemoteError> {
        self.reactions.send_replace(Vec::new());
        Ok(())
    }

    async fn insert_reaction(&self, reaction: Reaction) -> Result<(), RemoteError> {
        self.reactions.send_modify(|list| list.push(reaction));
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn observe_users(&self) -> mpsc::Receiver<Result<Vec<UserRef>, RemoteError>> {
        forward(self.users.subscribe())
    }
}
