//! Fallback handler — the last line of defense.
//!
//! Invoked once when a rendered notification could not be delivered.
//! Sends a context-minimal alert so the channel still learns something
//! happened. Must never raise: its own delivery failure is logged and
//! swallowed.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{info, warn};

use crate::delivery::webhook::{WebhookRequest, WebhookTransport};
use crate::message::render::render_alert;

/// Sends the degraded "System Alert" message on notification failure.
pub struct FallbackHandler {
    transport: Arc<dyn WebhookTransport>,
    alert_url: SecretString,
}

impl FallbackHandler {
    pub fn new(transport: Arc<dyn WebhookTransport>, alert_url: SecretString) -> Self {
        Self {
            transport,
            alert_url,
        }
    }

    /// Deliver the minimal alert for `repository`. Infallible by contract.
    pub async fn on_failure(&self, repository: &str) {
        let document = render_alert(repository);
        let body = match serde_json::to_value(&document) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Could not serialize fallback alert");
                return;
            }
        };

        let result = self
            .transport
            .post(WebhookRequest::new(self.alert_url.clone(), body))
            .await;

        if result.succeeded {
            info!(repository, "Fallback alert delivered");
        } else {
            warn!(
                repository,
                status = %result.status_label(),
                "Fallback alert delivery failed; giving up"
            );
        }
    }
}
