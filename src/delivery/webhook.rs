//! Webhook delivery client.
//!
//! One synchronous-in-spirit JSON POST per call. The client never
//! returns an error: network failures and non-2xx statuses both come
//! back as a [`DeliveryResult`] and the caller decides what a failure
//! means for its pipeline.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::warn;

/// Characters of the response body retained for diagnostics.
pub const RESPONSE_SNIPPET_MAX: usize = 512;

/// One outbound POST: destination, JSON body, extra headers.
///
/// The URL is a secret (chat webhook URLs embed their credential) and is
/// only exposed at the reqwest call site, never in logs or results.
#[derive(Clone)]
pub struct WebhookRequest {
    pub url: SecretString,
    pub body: Value,
    pub headers: Vec<(String, String)>,
}

impl WebhookRequest {
    pub fn new(url: SecretString, body: Value) -> Self {
        Self {
            url,
            body,
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Outcome of one outbound HTTP attempt.
#[derive(Debug, Clone)]
pub struct DeliveryResult {
    /// True iff the endpoint answered with a 2xx status.
    pub succeeded: bool,
    /// Numeric status, absent when no response was received at all.
    pub status: Option<u16>,
    /// Leading portion of the response body, for diagnostics only.
    pub body_snippet: Option<String>,
}

impl DeliveryResult {
    /// Status for log/error messages: the code, or "network error" when
    /// no response arrived.
    pub fn status_label(&self) -> String {
        match self.status {
            Some(code) => code.to_string(),
            None => "network error".to_string(),
        }
    }
}

/// Transport seam — the pipelines depend on this, tests stub it.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn post(&self, request: WebhookRequest) -> DeliveryResult;
}

/// Production transport backed by a shared reqwest client.
pub struct WebhookClient {
    client: reqwest::Client,
}

impl WebhookClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for WebhookClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebhookTransport for WebhookClient {
    async fn post(&self, request: WebhookRequest) -> DeliveryResult {
        let mut builder = self
            .client
            .post(request.url.expose_secret())
            .json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Webhook POST failed before a response arrived");
                return DeliveryResult {
                    succeeded: false,
                    status: None,
                    body_snippet: None,
                };
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        DeliveryResult {
            succeeded: status.is_success(),
            status: Some(status.as_u16()),
            body_snippet: snippet_of(&body),
        }
    }
}

/// Bounded prefix of a response body, `None` when the body is empty.
fn snippet_of(body: &str) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    Some(body.chars().take(RESPONSE_SNIPPET_MAX).collect())
}
