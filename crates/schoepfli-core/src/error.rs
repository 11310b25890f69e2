//! Error taxonomy of the call-out alarm subsystem.
//!
//! Every failure is terminal for its invocation: there is no automatic
//! retry anywhere in this crate, the user re-triggers the operation.

use std::path::PathBuf;
use thiserror::Error;

use crate::store::RemoteError;

/// Failure surface of `send_alarm` and `add_reaction`.
///
/// The permission-shaped variants are kept distinct so a frontend can
/// offer an "open settings" affordance instead of a plain message.
#[derive(Error, Debug)]
pub enum AlarmError {
    /// The broadcaster is outside the allowed radius around the Schöpfli.
    #[error("You are too far away from the Schöpfli to raise the alarm ({0} away).")]
    TooFarAway(String),

    /// The last broadcast is too recent.
    #[error("The last alarm was raised only a moment ago. Try again in {0}.")]
    TooEarly(String),

    /// Push permission is denied or was declined on prompt.
    #[error("Push notifications are disabled for this app.")]
    NotificationPermissionMissing,

    /// Location permission is denied, restricted, or was declined on prompt.
    #[error("Location access is disabled for this app.")]
    LocationPermissionMissing,

    /// The position could not be determined for a non-permission reason.
    #[error("Something went wrong. Your location could not be determined: {0}")]
    LocationFailed(String),

    /// A remote write did not land. A partial dual-write failure reports
    /// the same way; the write pair is idempotent and retried whole.
    #[error("Something went wrong. Saving failed: {0}")]
    RemoteWriteFailed(String),

    /// A remote read did not complete.
    #[error("Something went wrong. Loading failed: {0}")]
    RemoteReadFailed(String),

    /// The caller already reacted within the current alarm epoch.
    #[error("Something went wrong. Saving failed: you already responded to this alarm.")]
    AlreadyReacted,

    #[error("Something went wrong. {0}")]
    Unknown(String),
}

impl AlarmError {
    /// Whether a frontend should offer to open the system settings
    /// instead of rendering the message alone.
    pub fn wants_settings_affordance(&self) -> bool {
        matches!(
            self,
            AlarmError::NotificationPermissionMissing | AlarmError::LocationPermissionMissing
        )
    }
}

impl From<RemoteError> for AlarmError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Read(message) => AlarmError::RemoteReadFailed(message),
            RemoteError::Write(message) => AlarmError::RemoteWriteFailed(message),
            RemoteError::Stream(message) => AlarmError::Unknown(message),
        }
    }
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("No configuration directory available on this platform")]
    NoConfigDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_errors_want_settings() {
        assert!(AlarmError::NotificationPermissionMissing.wants_settings_affordance());
        assert!(AlarmError::LocationPermissionMissing.wants_settings_affordance());
        assert!(!AlarmError::AlreadyReacted.wants_settings_affordance());
        assert!(!AlarmError::TooFarAway("2 km".into()).wants_settings_affordance());
    }

    #[test]
    fn test_remote_error_mapping() {
        let read: AlarmError = RemoteError::Read("offline".into()).into();
        assert!(matches!(read, AlarmError::RemoteReadFailed(_)));
        let write: AlarmError = RemoteError::Write("offline".into()).into();
        assert!(matches!(write, AlarmError::RemoteWriteFailed(_)));
    }

    #[test]
    fn test_wrapped_errors_carry_the_generic_prefix() {
        let err = AlarmError::RemoteWriteFailed("no connection".into());
        assert!(err.to_string().starts_with("Something went wrong."));
        assert!(err.to_string().contains("no connection"));
    }
}
