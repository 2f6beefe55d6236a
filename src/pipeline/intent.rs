//! Classifier output types.

use serde::{Deserialize, Serialize};

/// Display severity of a notification, mapped to an accent color by the
/// renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Info,
    Danger,
}

impl Severity {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Danger => "danger",
        }
    }
}

/// A labelled link rendered as a button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAction {
    pub label: String,
    pub url: String,
}

/// What a chat notification should communicate.
///
/// Produced by the classifier from exactly one event, consumed
/// immediately by the renderer. Every field except `secondary_action`
/// and `extra_fields` is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationIntent {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    /// Primary action destination.
    pub target_url: String,
    /// Login the notification is attributed to.
    pub author_handle: String,
    /// Label of the primary button (always points at `target_url`).
    pub button_label: String,
    /// Optional second button (e.g. "View Files").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_action: Option<LinkAction>,
    /// Ordered (label, value) pairs rendered after repository and author.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_fields: Vec<(String, String)>,
}
