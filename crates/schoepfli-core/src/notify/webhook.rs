//! Webhook dispatcher -- deliver alarm pushes via an HTTP endpoint.
//!
//! The endpoint sits in front of the actual push fan-out; this side only
//! guarantees the send completed before reporting success.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::notify::{DispatchError, NotificationDispatcher, PushPayload, PushPermission};

pub struct WebhookDispatcher {
    endpoint: Url,
    client: Client,
}

impl WebhookDispatcher {
    /// `endpoint` must be an absolute http(s) URL.
    pub fn new(endpoint: &str) -> Result<Self, DispatchError> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| DispatchError::NotConfigured(e.to_string()))?;
        if endpoint.scheme() != "https" && endpoint.scheme() != "http" {
            return Err(DispatchError::NotConfigured(format!(
                "unsupported scheme '{}'",
                endpoint.scheme()
            )));
        }
        Ok(Self {
            endpoint,
            client: Client::new(),
        })
    }
}

#[async_trait]
impl NotificationDispatcher for WebhookDispatcher {
    // A server-side endpoint needs no OS-level permission prompt.
    async fn permission(&self) -> PushPermission {
        PushPermission::Granted
    }

    async fn request_permission(&self) -> Result<PushPermission, DispatchError> {
        Ok(PushPermission::Granted)
    }

    async fn send(&self, payload: &PushPayload) -> Result<(), DispatchError> {
        let body = json!({
            "title": payload.title(),
            "body": payload.body(),
            "payload": payload,
        });
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| DispatchError::Http(e.to_string()))?;

        if response.status().is_success() {
            debug!(title = %payload.title(), "push dispatched");
            Ok(())
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(DispatchError::Http(format!("HTTP {status}: {text}")))
        }
    }
}
