//! Configuration types.
//!
//! All externally injected values (webhook URLs, the integration branch)
//! are collected into an explicit [`Config`] once, in `main`, and passed
//! into the pipeline constructors. No code below the binary entry point
//! reads the process environment.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Environment variable: chat webhook URL (notification pipeline).
pub const CHAT_WEBHOOK_VAR: &str = "HERALD_CHAT_WEBHOOK_URL";
/// Environment variable: secondary alert webhook URL (fallback handler).
pub const ALERT_WEBHOOK_VAR: &str = "HERALD_ALERT_WEBHOOK_URL";
/// Environment variable: task webhook URL (forward pipeline).
pub const TASK_WEBHOOK_VAR: &str = "HERALD_TASK_WEBHOOK_URL";
/// Environment variable: integration branch for forward decisions.
pub const INTEGRATION_BRANCH_VAR: &str = "HERALD_INTEGRATION_BRANCH";

/// Default integration branch when none is configured.
const DEFAULT_INTEGRATION_BRANCH: &str = "main";

/// Relay configuration.
///
/// Webhook URLs are secrets: a chat webhook URL embeds its credential, so
/// they are held as [`SecretString`] and exposed only at the HTTP call site.
#[derive(Clone)]
pub struct Config {
    /// Chat webhook for rendered notifications.
    pub chat_webhook_url: Option<SecretString>,
    /// Secondary webhook for degraded alerts; the chat webhook is used
    /// when this is unset.
    pub alert_webhook_url: Option<SecretString>,
    /// Task-processing webhook for forwarded merge events.
    pub task_webhook_url: Option<SecretString>,
    /// Branch whose successful merges are forwarded.
    pub integration_branch: String,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// Missing variables are recorded as `None` here; each pipeline
    /// validates its own requirements via the `require_*` accessors so a
    /// notify-only deployment never needs the task webhook and vice versa.
    pub fn from_env() -> Self {
        Self {
            chat_webhook_url: read_secret(CHAT_WEBHOOK_VAR),
            alert_webhook_url: read_secret(ALERT_WEBHOOK_VAR),
            task_webhook_url: read_secret(TASK_WEBHOOK_VAR),
            integration_branch: std::env::var(INTEGRATION_BRANCH_VAR)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_INTEGRATION_BRANCH.to_string()),
        }
    }

    /// Chat webhook URL, required by the notification pipeline.
    pub fn require_chat_webhook(&self) -> Result<&SecretString, ConfigError> {
        self.chat_webhook_url
            .as_ref()
            .ok_or_else(|| ConfigError::MissingRequired {
                key: CHAT_WEBHOOK_VAR.to_string(),
                hint: "Set it to the incoming-webhook URL of the notification channel"
                    .to_string(),
            })
    }

    /// Task webhook URL, required by the forward pipeline.
    pub fn require_task_webhook(&self) -> Result<&SecretString, ConfigError> {
        self.task_webhook_url
            .as_ref()
            .ok_or_else(|| ConfigError::MissingRequired {
                key: TASK_WEBHOOK_VAR.to_string(),
                hint: "Set it to the task-processor endpoint that accepts forwarded events"
                    .to_string(),
            })
    }

    /// Webhook the fallback handler posts to: the alert webhook when
    /// configured, otherwise the primary chat webhook.
    pub fn alert_webhook(&self) -> Option<&SecretString> {
        self.alert_webhook_url
            .as_ref()
            .or(self.chat_webhook_url.as_ref())
    }
}

fn read_secret(var: &str) -> Option<SecretString> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}
