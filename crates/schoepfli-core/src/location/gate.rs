//! Single-shot position gate over the callback-driven platform stack.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::geo::Coordinate;
use crate::location::bridge::DelegateBridge;
use crate::location::provider::{AuthorizationStatus, LocationProvider};

/// Failure surface of [`LocationGate::current_position`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("location services are disabled on this device")]
    ServicesDisabled,

    #[error("location permission was denied")]
    PermissionDenied,

    #[error("precise location is off; enable precise location for this app")]
    ReducedAccuracy,

    #[error("no position fix available: {0}")]
    PositionUnavailable(String),

    #[error("a position request is already in flight")]
    RequestInFlight,
}

/// Bridges the permission-based, callback-driven platform stack into a
/// single-shot async position read.
pub struct LocationGate {
    provider: Arc<dyn LocationProvider>,
    bridge: Arc<DelegateBridge>,
    in_flight: Mutex<()>,
}

impl LocationGate {
    /// `bridge` must be the same instance the platform adapter delivers
    /// its delegate callbacks to.
    pub fn new(provider: Arc<dyn LocationProvider>, bridge: Arc<DelegateBridge>) -> Self {
        Self {
            provider,
            bridge,
            in_flight: Mutex::new(()),
        }
    }

    /// Resolve the device's current position, walking the authorization
    /// state machine first.
    ///
    /// At most one request may be in flight; a concurrent second call
    /// fails with [`LocationError::RequestInFlight`] instead of silently
    /// replacing the outstanding continuation.
    pub async fn current_position(&self) -> Result<Coordinate, LocationError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| LocationError::RequestInFlight)?;

        if !self.provider.services_enabled() {
            return Err(LocationError::ServicesDisabled);
        }

        if self.provider.authorization_status() == AuthorizationStatus::NotDetermined {
            debug!("location authorization not determined, prompting");
            let resolved = self.bridge.arm_authorization();
            self.provider.request_authorization();
            // Suspend until the prompt resolves, then re-read the status
            // from the platform rather than trusting the callback value.
            let _ = resolved.await;
        }

        match self.provider.authorization_status() {
            AuthorizationStatus::AuthorizedFull => {}
            AuthorizationStatus::AuthorizedReduced => return Err(LocationError::ReducedAccuracy),
            // Still undetermined means the user dismissed the prompt.
            AuthorizationStatus::NotDetermined
            | AuthorizationStatus::Denied
            | AuthorizationStatus::Restricted => return Err(LocationError::PermissionDenied),
        }

        let resolved = self.bridge.arm_position();
        self.provider.request_position();
        match resolved.await {
            Ok(Ok(coordinate)) => {
                debug!(
                    latitude = coordinate.latitude,
                    longitude = coordinate.longitude,
                    "position fix"
                );
                Ok(coordinate)
            }
            Ok(Err(message)) => Err(LocationError::PositionUnavailable(message)),
            Err(_) => Err(LocationError::PositionUnavailable(
                "position request was dropped".into(),
            )),
        }
    }
}
