//! Forward decision for the task pipeline.
//!
//! Only one event shape is ever forwarded: a pull request closed with a
//! successful merge into the integration branch. Everything else is a
//! successful no-op run.

use serde_json::Value;
use tracing::debug;

use crate::error::PipelineError;
use crate::event::model::{RepoEvent, SourceKind, Subject};

/// Whether an event should be relayed to the task processor, together
/// with the verbatim payload to send.
#[derive(Debug, Clone)]
pub struct ForwardDecision {
    pub should_forward: bool,
    /// Complete serialization of the event, unmodified.
    pub payload: Value,
}

/// Decide whether `event` is a merge into `integration_branch`.
pub fn decide(
    event: &RepoEvent,
    integration_branch: &str,
) -> Result<ForwardDecision, PipelineError> {
    let should_forward = matches!(
        (event.kind, event.action.as_deref(), &event.subject),
        (
            SourceKind::PullRequest,
            Some("closed"),
            Subject::PullRequest { merged: true, base_branch, .. },
        ) if base_branch.as_str() == integration_branch
    );

    debug!(
        kind = event.kind.label(),
        action = event.action.as_deref().unwrap_or(""),
        integration_branch,
        should_forward,
        "Forward decision"
    );

    let payload = serde_json::to_value(event)?;
    Ok(ForwardDecision {
        should_forward,
        payload,
    })
}
