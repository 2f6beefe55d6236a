//! Outbound webhook delivery.

pub mod fallback;
pub mod webhook;

pub use fallback::FallbackHandler;
pub use webhook::{DeliveryResult, WebhookClient, WebhookRequest, WebhookTransport};
