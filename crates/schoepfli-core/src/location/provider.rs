//! Platform positioning contract.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Platform authorization state for location access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthorizationStatus {
    /// The user was never asked.
    NotDetermined,
    /// Precise location granted.
    AuthorizedFull,
    /// Location granted at reduced accuracy only.
    AuthorizedReduced,
    Denied,
    Restricted,
}

impl AuthorizationStatus {
    pub fn is_authorized(&self) -> bool {
        matches!(
            self,
            AuthorizationStatus::AuthorizedFull | AuthorizationStatus::AuthorizedReduced
        )
    }
}

/// Callback sink for platform location results.
///
/// The platform invokes these from its own callback context; each armed
/// request consumes exactly one callback.
pub trait LocationDelegate: Send + Sync {
    /// Delivered once a `request_authorization` prompt resolves.
    fn authorization_changed(&self, status: AuthorizationStatus);

    /// Delivered once a `request_position` attempt resolves.
    fn position_result(&self, result: Result<Coordinate, String>);
}

/// Platform positioning backend.
///
/// The `request_*` calls return immediately; outcomes are delivered to the
/// [`LocationDelegate`] the platform adapter was wired to at startup.
pub trait LocationProvider: Send + Sync {
    /// Whether location services are enabled device-wide.
    fn services_enabled(&self) -> bool;

    /// Current authorization status for this app.
    fn authorization_status(&self) -> AuthorizationStatus;

    /// Show the just-in-time permission prompt.
    fn request_authorization(&self);

    /// Start a single position fix attempt.
    fn request_position(&self);
}
