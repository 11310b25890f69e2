//! Alarm broadcast coordinator.
//!
//! `send_alarm` walks a fixed gate sequence; each gate short-circuits
//! with its own error kind so a frontend can react per kind (open
//! settings, show remaining wait, show distance).

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::AlarmConfig;
use crate::error::AlarmError;
use crate::location::{LocationError, LocationGate};
use crate::model::{AlarmMessage, UserRef};
use crate::notify::{NotificationDispatcher, PushPayload, PushPermission};
use crate::policy::{cooldown, proximity, CooldownCheck, ProximityCheck};
use crate::store::AlarmStore;

pub struct AlarmCoordinator {
    store: Arc<dyn AlarmStore>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    gate: Arc<LocationGate>,
    config: AlarmConfig,
}

impl AlarmCoordinator {
    pub fn new(
        store: Arc<dyn AlarmStore>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        gate: Arc<LocationGate>,
        config: AlarmConfig,
    ) -> Self {
        Self {
            store,
            dispatcher,
            gate,
            config,
        }
    }

    /// Broadcast a call-out alarm to the whole team.
    ///
    /// Gate order is fixed: push permission, cooldown, location and
    /// proximity, dispatch, then the stored-state writes. The dispatch
    /// must complete before any write; a dispatch failure leaves stored
    /// state untouched. The two writes (alarm overwrite, reaction clear)
    /// run concurrently and must both land.
    pub async fn send_alarm(
        &self,
        message: AlarmMessage,
        acting_user: &UserRef,
    ) -> Result<(), AlarmError> {
        self.ensure_push_permission().await?;
        self.ensure_cooldown().await?;
        self.ensure_proximity().await?;

        let payload = PushPayload::for_alarm(acting_user, &message);
        self.dispatcher
            .send(&payload)
            .await
            .map_err(|e| AlarmError::Unknown(e.to_string()))?;

        info!(author = %acting_user.id, "broadcasting alarm");
        let text = message.stored_text().to_owned();
        let author_id = acting_user.id.clone();
        let update = self.store.update_alarm(
            true,
            Box::new(move |mut alarm| {
                alarm.message = text;
                alarm.author_user_id = author_id;
                alarm
            }),
        );
        let clear = self.store.delete_all_reactions();

        // Both halves must land; a partial failure reports the same as a
        // total one and the idempotent pair is retried whole.
        let (updated, cleared) = tokio::join!(update, clear);
        if let Err(err) = &updated {
            warn!(%err, "alarm write failed");
        }
        if let Err(err) = &cleared {
            warn!(%err, "reaction clear failed");
        }
        updated?;
        cleared?;
        Ok(())
    }

    async fn ensure_push_permission(&self) -> Result<(), AlarmError> {
        let mut permission = self.dispatcher.permission().await;
        if permission == PushPermission::NotDetermined {
            permission = self
                .dispatcher
                .request_permission()
                .await
                .unwrap_or(PushPermission::Denied);
        }
        match permission {
            PushPermission::Granted => Ok(()),
            PushPermission::NotDetermined | PushPermission::Denied => {
                Err(AlarmError::NotificationPermissionMissing)
            }
        }
    }

    async fn ensure_cooldown(&self) -> Result<(), AlarmError> {
        let last = self.store.read_alarm_once().await?;
        let outcome = cooldown::check(
            last.map(|alarm| alarm.created_at),
            Utc::now(),
            self.config.min_pause(),
            self.config.effective_bypass(),
        );
        match outcome {
            CooldownCheck::Pass => Ok(()),
            CooldownCheck::TooEarly { description, .. } => Err(AlarmError::TooEarly(description)),
        }
    }

    async fn ensure_proximity(&self) -> Result<(), AlarmError> {
        let measured = self.gate.current_position().await.map_err(|e| match e {
            LocationError::PermissionDenied => AlarmError::LocationPermissionMissing,
            other => AlarmError::LocationFailed(other.to_string()),
        })?;
        let outcome = proximity::check(
            &self.config.reference,
            &measured,
            self.config.max_distance_m,
            self.config.effective_bypass(),
        );
        match outcome {
            ProximityCheck::Pass => Ok(()),
            ProximityCheck::TooFar { description, .. } => Err(AlarmError::TooFarAway(description)),
        }
    }
}
