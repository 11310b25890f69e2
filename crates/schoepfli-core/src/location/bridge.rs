//! Callback-to-future bridge for the platform location delegate.

use std::sync::Mutex;

use tokio::sync::oneshot;

use crate::geo::Coordinate;
use crate::location::provider::{AuthorizationStatus, LocationDelegate};

/// Converts each delegate callback into exactly one resolved future.
///
/// The gate arms a request before firing it at the provider; the matching
/// callback resolves the armed receiver once. A callback arriving while
/// nothing is armed, or after the armed request already resolved, is
/// dropped — a request can never be resolved twice.
#[derive(Default)]
pub struct DelegateBridge {
    authorization: Mutex<Option<oneshot::Sender<AuthorizationStatus>>>,
    position: Mutex<Option<oneshot::Sender<Result<Coordinate, String>>>>,
}

impl DelegateBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn arm_authorization(&self) -> oneshot::Receiver<AuthorizationStatus> {
        let (tx, rx) = oneshot::channel();
        *self.authorization.lock().unwrap() = Some(tx);
        rx
    }

    pub(crate) fn arm_position(&self) -> oneshot::Receiver<Result<Coordinate, String>> {
        let (tx, rx) = oneshot::channel();
        *self.position.lock().unwrap() = Some(tx);
        rx
    }
}

impl LocationDelegate for DelegateBridge {
    fn authorization_changed(&self, status: AuthorizationStatus) {
        if let Some(tx) = self.authorization.lock().unwrap().take() {
            let _ = tx.send(status);
        }
    }

    fn position_result(&self, result: Result<Coordinate, String>) {
        if let Some(tx) = self.position.lock().unwrap().take() {
            let _ = tx.send(result);
        }
    }
}
