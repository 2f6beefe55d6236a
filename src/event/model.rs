//! Normalized repository event model.
//!
//! The CI runner converts the hosting platform's raw webhook payload into
//! this shape before invoking the relay. One event per invocation; the
//! event is immutable for the lifetime of the run.

use serde::{Deserialize, Serialize};

use crate::error::EventError;

/// Web origin of the hosting platform, used for derived links
/// (repository view, compare view, author profiles).
pub const PLATFORM_URL: &str = "https://github.com";

// ── Source kind ─────────────────────────────────────────────────────

/// Which lifecycle event triggered this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    PullRequest,
    PullRequestReview,
    PullRequestReviewComment,
    IssueComment,
    Push,
    Manual,
}

impl SourceKind {
    /// Short label for logging and forward headers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PullRequest => "pull_request",
            Self::PullRequestReview => "pull_request_review",
            Self::PullRequestReviewComment => "pull_request_review_comment",
            Self::IssueComment => "issue_comment",
            Self::Push => "push",
            Self::Manual => "manual",
        }
    }
}

// ── Subject payload ─────────────────────────────────────────────────

/// Event-specific payload. The variant is determined by the event kind;
/// [`RepoEvent::validate`] enforces the agreement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Subject {
    PullRequest {
        number: u64,
        title: String,
        url: String,
        author: String,
        base_branch: String,
        head_branch: String,
        /// Only meaningful for `closed` actions; the platform reports
        /// `false` until the merge actually happens.
        #[serde(default)]
        merged: bool,
    },
    Review {
        /// Review verdict as reported by the platform:
        /// "approved", "changes_requested", "commented", ...
        state: String,
        url: String,
        author: String,
    },
    Comment {
        url: String,
        author: String,
        /// Pull request the comment belongs to.
        parent_number: u64,
    },
    Push {
        before: String,
        after: String,
        /// Computed by the CI runner from the pushed range. Defaults to 1
        /// when the range lookup was unavailable.
        #[serde(default = "default_commit_count")]
        commit_count: u64,
    },
    Manual,
}

fn default_commit_count() -> u64 {
    1
}

impl Subject {
    /// Variant name for diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PullRequest { .. } => "pull_request",
            Self::Review { .. } => "review",
            Self::Comment { .. } => "comment",
            Self::Push { .. } => "push",
            Self::Manual => "manual",
        }
    }

    /// The actor the subject attributes the activity to, when it has one.
    pub fn author(&self) -> Option<&str> {
        match self {
            Self::PullRequest { author, .. }
            | Self::Review { author, .. }
            | Self::Comment { author, .. } => Some(author),
            Self::Push { .. } | Self::Manual => None,
        }
    }
}

// ── Event ───────────────────────────────────────────────────────────

/// One normalized repository event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoEvent {
    /// Lifecycle event kind.
    pub kind: SourceKind,
    /// Platform action ("opened", "closed", "submitted", ...).
    /// Absent for push and manual events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Login of the human/agent that triggered the event.
    pub actor: String,
    /// Repository in `owner/name` form.
    pub repository: String,
    /// Branch ref the event relates to, when the platform reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Kind-specific payload.
    pub subject: Subject,
}

impl RepoEvent {
    /// Check the kind/subject invariant: exactly one subject variant is
    /// populated and it is the one the kind prescribes.
    pub fn validate(&self) -> Result<(), EventError> {
        let agrees = matches!(
            (self.kind, &self.subject),
            (SourceKind::PullRequest, Subject::PullRequest { .. })
                | (SourceKind::PullRequestReview, Subject::Review { .. })
                | (SourceKind::PullRequestReviewComment, Subject::Comment { .. })
                | (SourceKind::IssueComment, Subject::Comment { .. })
                | (SourceKind::Push, Subject::Push { .. })
                | (SourceKind::Manual, Subject::Manual)
        );

        if agrees {
            Ok(())
        } else {
            Err(EventError::SubjectMismatch {
                kind: self.kind.label().to_string(),
                subject: self.subject.label().to_string(),
            })
        }
    }

    /// Web view of the repository.
    pub fn repo_url(&self) -> String {
        format!("{PLATFORM_URL}/{}", self.repository)
    }

    /// Who to attribute the event to: the subject author when the payload
    /// carries one, otherwise the triggering actor.
    pub fn attributed_author(&self) -> &str {
        self.subject.author().unwrap_or(&self.actor)
    }
}
