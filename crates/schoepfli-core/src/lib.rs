//! # Schöpfli Core Library
//!
//! Core coordination logic of the Schöpfli troop app's call-out alarm
//! ("Schöpflialarm"): any leadership-team member can broadcast an alert
//! to the whole team, gated by a location-proximity check and a cooldown,
//! and teammates answer with one of three fixed reactions.
//!
//! ## Architecture
//!
//! - **Policies**: pure pass/fail gates (proximity, cooldown) decided
//!   from explicit inputs
//! - **Location**: bridges the permission-based, callback-driven platform
//!   positioning stack into a single-shot async read
//! - **Coordinators**: the gated send-alarm and add-reaction workflows
//!   over the remote store and the push dispatcher
//! - **Projection**: merges the three live streams (alarm, reactions,
//!   user directory) into one display state
//!
//! The remote store, the user directory, the push backend, and the
//! platform positioning stack are external collaborators behind traits.
//!
//! ## Key Components
//!
//! - [`AlarmCoordinator`]: gated broadcast workflow
//! - [`ReactionCoordinator`]: one reaction per member per alarm epoch
//! - [`LocationGate`]: single-shot authorized position read
//! - [`StateProjector`] / [`LiveAlarmState`]: live merged view
//! - [`AlarmConfig`]: deployment constants (reference point, radius,
//!   cooldown pause)

pub mod alarm;
pub mod config;
pub mod error;
pub mod geo;
pub mod location;
pub mod model;
pub mod notify;
pub mod policy;
pub mod projection;
pub mod store;

pub use alarm::{AlarmCoordinator, ReactionCoordinator};
pub use config::AlarmConfig;
pub use error::{AlarmError, ConfigError};
pub use geo::Coordinate;
pub use location::{AuthorizationStatus, DelegateBridge, LocationError, LocationGate};
pub use model::{AlarmMessage, AlarmRecord, Reaction, ReactionKind, UserRef};
pub use notify::{NotificationDispatcher, PushPayload, PushPermission, WebhookDispatcher};
pub use projection::{LiveAlarmState, ProjectedAlarmView, StateProjector, UiState};
pub use store::{AlarmStore, MemoryStore, RemoteError, UserDirectory};
