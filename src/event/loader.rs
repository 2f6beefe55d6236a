//! Event payload loader.
//!
//! Reads the normalized event JSON the CI runner wrote to disk and
//! validates it before anything touches the network: the kind/subject
//! invariant and the `owner/name` repository form. Violations are fatal —
//! a malformed payload means the triggering side is broken, not us.

use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::error::EventError;
use crate::event::model::RepoEvent;

/// Loader with pre-compiled validation patterns.
pub struct EventLoader {
    repo_name: Regex,
}

impl EventLoader {
    pub fn new() -> Self {
        Self {
            repo_name: Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]*/[A-Za-z0-9][A-Za-z0-9_.\-]*$")
                .unwrap(),
        }
    }

    /// Read and validate an event payload from `path`.
    pub async fn load(&self, path: &Path) -> Result<RepoEvent, EventError> {
        let raw = tokio::fs::read_to_string(path).await?;
        self.parse(&raw)
    }

    /// Parse and validate an event payload from a JSON string.
    pub fn parse(&self, raw: &str) -> Result<RepoEvent, EventError> {
        let event: RepoEvent = serde_json::from_str(raw)?;
        event.validate()?;

        if !self.repo_name.is_match(&event.repository) {
            return Err(EventError::InvalidRepository(event.repository.clone()));
        }

        debug!(
            kind = event.kind.label(),
            repository = %event.repository,
            actor = %event.actor,
            "Loaded event payload"
        );
        Ok(event)
    }
}

impl Default for EventLoader {
    fn default() -> Self {
        Self::new()
    }
}
