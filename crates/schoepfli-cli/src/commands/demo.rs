//! In-process walkthrough of the alarm workflow: broadcast, reactions,
//! live view, and the gate rejections, all against the memory store.

use std::sync::Arc;
use std::time::Duration;

use clap::Args;

use schoepfli_core::location::{AuthorizationStatus, LocationDelegate, LocationProvider};
use schoepfli_core::notify::{DispatchError, NotificationDispatcher, PushPayload, PushPermission};
use schoepfli_core::{
    AlarmConfig, AlarmCoordinator, AlarmMessage, Coordinate, DelegateBridge, LiveAlarmState,
    LocationGate, MemoryStore, ReactionCoordinator, ReactionKind, UserRef,
};

#[derive(Args)]
pub struct DemoArgs {
    /// Simulated distance from the clubhouse, in meters
    #[arg(long, default_value_t = 40.0)]
    distance_m: f64,

    /// Allowed broadcast radius, in meters
    #[arg(long, default_value_t = 100.0)]
    max_distance_m: f64,

    /// Minimum pause between broadcasts, in seconds
    #[arg(long, default_value_t = 3600)]
    min_pause_secs: u64,

    /// Custom alarm message (omit for the generic alarm)
    #[arg(long)]
    message: Option<String>,
}

/// Prints every push instead of delivering it.
struct PrintDispatcher;

#[async_trait::async_trait]
impl NotificationDispatcher for PrintDispatcher {
    async fn permission(&self) -> PushPermission {
        PushPermission::Granted
    }

    async fn request_permission(&self) -> Result<PushPermission, DispatchError> {
        Ok(PushPermission::Granted)
    }

    async fn send(&self, payload: &PushPayload) -> Result<(), DispatchError> {
        println!("  push> {}: {}", payload.title(), payload.body());
        Ok(())
    }
}

/// Always-authorized platform backend at a fixed simulated position.
struct SimulatedProvider {
    position: Coordinate,
    bridge: Arc<DelegateBridge>,
}

impl LocationProvider for SimulatedProvider {
    fn services_enabled(&self) -> bool {
        true
    }

    fn authorization_status(&self) -> AuthorizationStatus {
        AuthorizationStatus::AuthorizedFull
    }

    fn request_authorization(&self) {}

    fn request_position(&self) {
        self.bridge.position_result(Ok(self.position));
    }
}

pub fn run(args: DemoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(demo(args))
}

async fn demo(args: DemoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AlarmConfig {
        max_distance_m: args.max_distance_m,
        min_pause_secs: args.min_pause_secs,
        ..AlarmConfig::default()
    };

    // Simulated position north of the configured reference point.
    let position = Coordinate::new(
        config.reference.latitude + args.distance_m / 111_195.0,
        config.reference.longitude,
    );
    let bridge = Arc::new(DelegateBridge::new());
    let provider = SimulatedProvider {
        position,
        bridge: bridge.clone(),
    };
    let gate = Arc::new(LocationGate::new(Arc::new(provider), bridge));

    let store = Arc::new(MemoryStore::new());
    let vaiana = UserRef::new("u-vaiana", "Vaiana");
    let gil = UserRef::new("u-gil", "Gil");
    let heihei = UserRef::new("u-heihei", "Heihei");
    store.set_users(vec![vaiana.clone(), gil.clone(), heihei.clone()]);

    let dispatcher = Arc::new(PrintDispatcher);
    let alarm = AlarmCoordinator::new(store.clone(), dispatcher.clone(), gate, config);
    let reactions = ReactionCoordinator::new(store.clone(), dispatcher.clone());

    let live = LiveAlarmState::spawn(store.clone(), store.clone()).await;

    let message = match &args.message {
        Some(text) => AlarmMessage::Custom(text.clone()),
        None => AlarmMessage::Generic,
    };
    println!(
        "broadcasting from {:.0} m (allowed: {:.0} m)...",
        args.distance_m, args.max_distance_m
    );
    match alarm.send_alarm(message, &vaiana).await {
        Ok(()) => println!("  alarm is out"),
        Err(err) => {
            println!("  rejected: {err}");
            return Ok(());
        }
    }

    reactions.add_reaction(&gil, ReactionKind::Coming).await?;
    reactions
        .add_reaction(&heihei, ReactionKind::AlreadyThere)
        .await?;

    // Let the observation loops catch up, then render the merged view.
    let mut view_rx = live.subscribe();
    let settled = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let Some(view) = view_rx.borrow().success() {
                if view.alarm.is_some() && view.reactions.len() == 2 {
                    return Ok(view.clone());
                }
            }
            if view_rx.changed().await.is_err() {
                return Err("projection channel closed");
            }
        }
    })
    .await??;

    if let Some(alarm_view) = settled.alarm.as_ref() {
        let body = if alarm_view.record.message.is_empty() {
            schoepfli_core::notify::GENERIC_ALARM_BODY
        } else {
            alarm_view.record.message.as_str()
        };
        println!("\ncurrent alarm by {}: {}", alarm_view.author_name, body);
    }
    for kind in ReactionKind::ALL {
        let names: Vec<_> = settled
            .of_kind(kind)
            .map(|r| r.author_name.as_str())
            .collect();
        println!("  {} {:?}: {}", settled.count(kind), kind, names.join(", "));
    }

    // A second broadcast right away runs into the cooldown.
    match alarm.send_alarm(AlarmMessage::Generic, &gil).await {
        Ok(()) => println!("\nsecond broadcast went through (bypass on?)"),
        Err(err) => println!("\nsecond broadcast rejected: {err}"),
    }

    // And a second reaction from the same member is refused.
    match reactions.add_reaction(&gil, ReactionKind::NotComing).await {
        Ok(()) => println!("duplicate reaction went through"),
        Err(err) => println!("duplicate reaction rejected: {err}"),
    }

    Ok(())
}
