//! Event classification — one event in, one notification intent out.
//!
//! Total function over the closed [`EventTag`] set: every kind/action
//! combination maps to a deterministic intent, and combinations outside
//! the table collapse into per-kind "Updated" fallbacks instead of
//! failing. Pure logic, no I/O.

use tracing::debug;

use crate::event::model::{RepoEvent, SourceKind, Subject};
use crate::pipeline::intent::{LinkAction, NotificationIntent, Severity};

/// Closed set of (kind, action-or-state) tags the decision table is
/// keyed on. Deriving the tag first keeps the table exhaustive and each
/// row independently testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTag {
    PrOpened,
    PrSynchronize,
    PrMerged,
    PrClosed,
    PrReopened,
    PrOther,
    ReviewApproved,
    ReviewChangesRequested,
    ReviewOther,
    ReviewComment,
    IssueComment,
    Push,
    Manual,
}

impl EventTag {
    /// Derive the tag for an event.
    pub fn of(event: &RepoEvent) -> Self {
        match event.kind {
            SourceKind::PullRequest => match event.action.as_deref().unwrap_or("") {
                "opened" => Self::PrOpened,
                "synchronize" => Self::PrSynchronize,
                "closed" => match &event.subject {
                    Subject::PullRequest { merged: true, .. } => Self::PrMerged,
                    _ => Self::PrClosed,
                },
                "reopened" => Self::PrReopened,
                _ => Self::PrOther,
            },
            SourceKind::PullRequestReview => {
                let state = match &event.subject {
                    Subject::Review { state, .. } => state.as_str(),
                    _ => "",
                };
                match state {
                    "approved" => Self::ReviewApproved,
                    "changes_requested" => Self::ReviewChangesRequested,
                    _ => Self::ReviewOther,
                }
            }
            SourceKind::PullRequestReviewComment => Self::ReviewComment,
            SourceKind::IssueComment => Self::IssueComment,
            SourceKind::Push => Self::Push,
            SourceKind::Manual => Self::Manual,
        }
    }

    /// Title and severity row of the decision table.
    fn headline(&self) -> (&'static str, Severity) {
        match self {
            Self::PrOpened => ("New Pull Request Opened", Severity::Success),
            Self::PrSynchronize | Self::PrOther => ("Pull Request Updated", Severity::Info),
            Self::PrMerged => ("Pull Request Merged", Severity::Success),
            Self::PrClosed => ("Pull Request Closed", Severity::Danger),
            Self::PrReopened => ("Pull Request Reopened", Severity::Info),
            Self::ReviewApproved => ("Code Review Submitted", Severity::Success),
            Self::ReviewChangesRequested => ("Code Review Submitted", Severity::Danger),
            Self::ReviewOther => ("Code Review Submitted", Severity::Info),
            Self::ReviewComment => ("Code Review Comment", Severity::Info),
            Self::IssueComment => ("Pull Request Comment", Severity::Info),
            Self::Push => ("Code Push", Severity::Success),
            Self::Manual => ("Repository Updated", Severity::Info),
        }
    }
}

/// Map an event to a notification intent.
pub fn classify(event: &RepoEvent) -> NotificationIntent {
    let tag = EventTag::of(event);
    let (title, severity) = tag.headline();

    debug!(
        kind = event.kind.label(),
        action = event.action.as_deref().unwrap_or(""),
        tag = ?tag,
        severity = severity.label(),
        "Classified event"
    );

    match &event.subject {
        Subject::PullRequest {
            number,
            title: pr_title,
            url,
            author,
            base_branch,
            head_branch,
            ..
        } => {
            // Branch fields are redundant once the PR is merged/closed.
            let closed = matches!(tag, EventTag::PrMerged | EventTag::PrClosed);
            let extra_fields = if closed {
                Vec::new()
            } else {
                vec![
                    ("Source Branch".to_string(), head_branch.clone()),
                    ("Target Branch".to_string(), base_branch.clone()),
                ]
            };
            let secondary_action = (tag == EventTag::PrOpened).then(|| LinkAction {
                label: "View Files".to_string(),
                url: format!("{url}/files"),
            });

            NotificationIntent {
                title: title.to_string(),
                description: format!("#{number}: {pr_title}"),
                severity,
                target_url: url.clone(),
                author_handle: author.clone(),
                button_label: "View Pull Request".to_string(),
                secondary_action,
                extra_fields,
            }
        }
        Subject::Review { state, url, author } => NotificationIntent {
            title: title.to_string(),
            description: format!("{author} submitted a {} review", state.replace('_', " ")),
            severity,
            target_url: url.clone(),
            author_handle: author.clone(),
            button_label: "View Review".to_string(),
            secondary_action: None,
            extra_fields: Vec::new(),
        },
        Subject::Comment {
            url,
            author,
            parent_number,
        } => NotificationIntent {
            title: title.to_string(),
            description: format!("New comment on pull request #{parent_number}"),
            severity,
            target_url: url.clone(),
            author_handle: author.clone(),
            button_label: "View Comment".to_string(),
            secondary_action: None,
            extra_fields: Vec::new(),
        },
        Subject::Push {
            before,
            after,
            commit_count,
        } => {
            let branch = event.branch.as_deref().unwrap_or("unknown");
            NotificationIntent {
                title: title.to_string(),
                description: format!("{commit_count} new commit(s) pushed to {branch}"),
                severity,
                target_url: format!("{}/compare/{before}...{after}", event.repo_url()),
                author_handle: event.actor.clone(),
                button_label: "View Changes".to_string(),
                secondary_action: None,
                extra_fields: vec![
                    ("Branch".to_string(), branch.to_string()),
                    ("Commits".to_string(), format!("{commit_count} new")),
                ],
            }
        }
        Subject::Manual => NotificationIntent {
            title: title.to_string(),
            description: format!("Repository activity in {}", event.repository),
            severity,
            target_url: event.repo_url(),
            author_handle: event.actor.clone(),
            button_label: "View Repository".to_string(),
            secondary_action: None,
            extra_fields: Vec::new(),
        },
    }
}
