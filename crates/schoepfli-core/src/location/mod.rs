//! Positioning: platform contract, callback bridge, and the single-shot
//! "get the current authorized position" gate.
//!
//! The platform location stack is permission-based and callback-driven:
//! requests return immediately and results arrive on a delegate. The
//! [`DelegateBridge`] converts each callback into exactly one resolved
//! future, and the [`LocationGate`] walks the authorization state machine
//! before issuing a position request.

pub mod bridge;
pub mod gate;
pub mod provider;

pub use bridge::DelegateBridge;
pub use gate::{LocationError, LocationGate};
pub use provider::{AuthorizationStatus, LocationDelegate, LocationProvider};
