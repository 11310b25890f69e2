//! Long-lived observation tasks feeding the projector.
//!
//! Three loops (alarm, reactions, users) run as independent tokio tasks.
//! They start together and stop together: dropping the handle aborts all
//! of them. No per-task cancellation is exposed.

use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::projection::{ProjectedAlarmView, Source, StateProjector, UiState};
use crate::store::{AlarmStore, RemoteError, UserDirectory};

/// Handle over the three observation loops and the merged view they feed.
pub struct LiveAlarmState {
    projected: watch::Receiver<UiState<ProjectedAlarmView>>,
    tasks: Vec<JoinHandle<()>>,
}

impl LiveAlarmState {
    /// Start observing. The loops run until the returned handle drops.
    pub async fn spawn(store: Arc<dyn AlarmStore>, directory: Arc<dyn UserDirectory>) -> Self {
        let mut projector = StateProjector::new();
        projector.start_observing();
        let projector = Arc::new(Mutex::new(projector));

        let initial = projector.lock().unwrap().project();
        let (tx, projected) = watch::channel(initial);
        let tx = Arc::new(tx);

        let users_rx = directory.observe_users().await;
        let alarm_rx = store.observe_alarm().await;
        let reactions_rx = store.observe_reactions().await;

        let tasks = vec![
            tokio::spawn(pump(
                users_rx,
                projector.clone(),
                tx.clone(),
                Source::Users,
                StateProjector::apply_users,
            )),
            tokio::spawn(pump(
                alarm_rx,
                projector.clone(),
                tx.clone(),
                Source::Alarm,
                StateProjector::apply_alarm,
            )),
            tokio::spawn(pump(
                reactions_rx,
                projector,
                tx,
                Source::Reactions,
                StateProjector::apply_reactions,
            )),
        ];

        Self { projected, tasks }
    }

    /// Subscribe to the merged view. The receiver always holds the
    /// latest state.
    pub fn subscribe(&self) -> watch::Receiver<UiState<ProjectedAlarmView>> {
        self.projected.clone()
    }

    /// The current merged view.
    pub fn current(&self) -> UiState<ProjectedAlarmView> {
        self.projected.borrow().clone()
    }
}

impl Drop for LiveAlarmState {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Drain one source stream into the shared projector, republishing the
/// merged view after every update.
async fn pump<T: Send + 'static>(
    mut rx: mpsc::Receiver<Result<T, RemoteError>>,
    projector: Arc<Mutex<StateProjector>>,
    tx: Arc<watch::Sender<UiState<ProjectedAlarmView>>>,
    source: Source,
    apply: fn(&mut StateProjector, Result<T, RemoteError>),
) {
    while let Some(update) = rx.recv().await {
        let merged = {
            let mut projector = projector.lock().unwrap();
            apply(&mut projector, update);
            projector.project()
        };
        tx.send_replace(merged);
    }

    // The stream ended without a terminal error; park the view so a
    // consumer can tell "needs a new subscription" from "still loading".
    debug!(?source, "observation stream ended");
    let merged = {
        let mut projector = projector.lock().unwrap();
        projector.mark_retry(source);
        projector.project()
    };
    tx.send_replace(merged);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Reaction, ReactionKind, UserRef};
    use crate::projection::LoadingKind;
    use crate::store::MemoryStore;
    use std::time::Duration;

    async fn next_state(
        rx: &mut watch::Receiver<UiState<ProjectedAlarmView>>,
    ) -> UiState<ProjectedAlarmView> {
        tokio::time::timeout(Duration::from_secs(1), rx.changed())
            .await
            .expect("timed out waiting for a projection update")
            .expect("projection channel closed");
        rx.borrow().clone()
    }

    #[tokio::test]
    async fn test_loading_until_all_sources_arrive() {
        let store = Arc::new(MemoryStore::new());
        store.set_users(vec![UserRef::new("u1", "Vaiana")]);
        store
            .insert_reaction(Reaction::new("u1", ReactionKind::Coming))
            .await
            .unwrap();

        let live = LiveAlarmState::spawn(store.clone(), store.clone()).await;
        let mut rx = live.subscribe();

        // All three sources emit their current value immediately, so the
        // merged view settles on success.
        let mut state = rx.borrow().clone();
        for _ in 0..4 {
            if state.is_success() {
                break;
            }
            state = next_state(&mut rx).await;
        }
        let view = state.success().expect("expected a settled view").clone();
        assert!(view.alarm.is_none());
        assert_eq!(view.reactions.len(), 1);
        assert_eq!(view.reactions[0].author_name, "Vaiana");
    }

    #[tokio::test]
    async fn test_write_propagates_to_subscribers() {
        let store = Arc::new(MemoryStore::new());
        store.set_users(vec![UserRef::new("u1", "Vaiana")]);

        let live = LiveAlarmState::spawn(store.clone(), store.clone()).await;
        let mut rx = live.subscribe();

        // Wait for the initial settle, then write.
        while !rx.borrow().is_success() {
            next_state(&mut rx).await;
        }
        store
            .update_alarm(
                true,
                Box::new(|mut alarm| {
                    alarm.message = "campfire".into();
                    alarm.author_user_id = "u1".into();
                    alarm
                }),
            )
            .await
            .unwrap();

        let state = next_state(&mut rx).await;
        let view = state.success().expect("expected success").clone();
        let alarm = view.alarm.expect("expected an alarm");
        assert_eq!(alarm.record.message, "campfire");
        assert_eq!(alarm.author_name, "Vaiana");
    }

    #[tokio::test]
    async fn test_drop_aborts_observation_tasks() {
        let store = Arc::new(MemoryStore::new());
        let live = LiveAlarmState::spawn(store.clone(), store.clone()).await;
        let handles: Vec<_> = live.tasks.iter().map(|t| t.abort_handle()).collect();
        drop(live);
        for _ in 0..100 {
            if handles.iter().all(|h| h.is_finished()) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("observation tasks kept running after the handle dropped");
    }

    #[tokio::test]
    async fn test_ended_stream_parks_view_as_retryable() {
        // A store whose reaction stream closes right away.
        struct ClosingStore(MemoryStore);

        #[async_trait::async_trait]
        impl AlarmStore for ClosingStore {
            async fn observe_alarm(
                &self,
            ) -> mpsc::Receiver<Result<Option<crate::model::AlarmRecord>, RemoteError>> {
                self.0.observe_alarm().await
            }
            async fn observe_reactions(
                &self,
            ) -> mpsc::Receiver<Result<Vec<Reaction>, RemoteError>> {
                let (_tx, rx) = mpsc::channel(1);
                rx
            }
            async fn read_alarm_once(
                &self,
            ) -> Result<Option<crate::model::AlarmRecord>, RemoteError> {
                self.0.read_alarm_once().await
            }
            async fn read_reactions_once(&self) -> Result<Vec<Reaction>, RemoteError> {
                self.0.read_reactions_once().await
            }
            async fn update_alarm(
                &self,
                force_new_timestamp: bool,
                mutate: crate::store::AlarmMutation,
            ) -> Result<(), RemoteError> {
                self.0.update_alarm(force_new_timestamp, mutate).await
            }
            async fn delete_all_reactions(&self) -> Result<(), RemoteError> {
                self.0.delete_all_reactions().await
            }
            async fn insert_reaction(&self, reaction: Reaction) -> Result<(), RemoteError> {
                self.0.insert_reaction(reaction).await
            }
        }

        let memory = MemoryStore::new();
        memory.set_users(vec![]);
        let store = Arc::new(ClosingStore(memory.clone()));
        let live = LiveAlarmState::spawn(store, Arc::new(memory)).await;
        let mut rx = live.subscribe();

        let mut state = rx.borrow().clone();
        for _ in 0..4 {
            if state == UiState::Loading(LoadingKind::Retry) {
                break;
            }
            state = next_state(&mut rx).await;
        }
        assert_eq!(state, UiState::Loading(LoadingKind::Retry));
    }
}
