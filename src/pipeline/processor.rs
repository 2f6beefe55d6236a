//! Pipeline orchestration — classify, render, deliver, fall back.
//!
//! Two independent pipelines share the transport seam:
//! - notification: best-effort, one fallback alert on delivery failure,
//!   the run itself always completes;
//! - forward: required side effect, any failed POST is a hard error that
//!   the binary turns into a non-zero exit.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use tracing::{info, warn};
use uuid::Uuid;

use crate::delivery::fallback::FallbackHandler;
use crate::delivery::webhook::{DeliveryResult, WebhookRequest, WebhookTransport};
use crate::error::PipelineError;
use crate::event::model::RepoEvent;
use crate::message::render;
use crate::pipeline::classifier::classify;
use crate::pipeline::forward;

/// Header naming the forwarded event kind.
pub const EVENT_KIND_HEADER: &str = "X-Herald-Event";
/// Header naming the source repository of a forwarded event.
pub const REPOSITORY_HEADER: &str = "X-Herald-Repository";

// ── Notification pipeline ───────────────────────────────────────────

/// Result of one notification run.
#[derive(Debug, Clone)]
pub struct NotificationOutcome {
    pub run_id: Uuid,
    pub delivery: DeliveryResult,
    /// Whether the fallback alert was sent (at most once per run).
    pub fallback_invoked: bool,
    pub completed_at: DateTime<Utc>,
}

/// Classify → render → deliver → fallback-once.
pub struct NotificationPipeline {
    transport: Arc<dyn WebhookTransport>,
    chat_url: SecretString,
    fallback: FallbackHandler,
}

impl NotificationPipeline {
    /// `alert_url` is where the fallback alert goes — the secondary
    /// endpoint when one is configured, otherwise the chat webhook again.
    pub fn new(
        transport: Arc<dyn WebhookTransport>,
        chat_url: SecretString,
        alert_url: SecretString,
    ) -> Self {
        let fallback = FallbackHandler::new(Arc::clone(&transport), alert_url);
        Self {
            transport,
            chat_url,
            fallback,
        }
    }

    /// Run the notification pipeline for one event.
    ///
    /// Best-effort contract: a failed delivery triggers the fallback
    /// alert exactly once and the run still completes. The only error
    /// path is a document serialization defect.
    pub async fn run(&self, event: &RepoEvent) -> Result<NotificationOutcome, PipelineError> {
        let run_id = Uuid::new_v4();
        info!(
            run_id = %run_id,
            kind = event.kind.label(),
            repository = %event.repository,
            author = event.attributed_author(),
            "Starting notification run"
        );

        // Step 1: classify (total, never fails)
        let intent = classify(event);

        // Step 2: render into the typed document, serialize once
        let document = render::render(&intent, &event.repository);
        let body = serde_json::to_value(&document)?;

        // Step 3: deliver
        let delivery = self
            .transport
            .post(WebhookRequest::new(self.chat_url.clone(), body))
            .await;

        // Step 4: fallback, at most once
        let fallback_invoked = if delivery.succeeded {
            info!(
                run_id = %run_id,
                status = %delivery.status_label(),
                severity = intent.severity.label(),
                "Notification delivered"
            );
            false
        } else {
            warn!(
                run_id = %run_id,
                status = %delivery.status_label(),
                "Notification delivery failed; sending fallback alert"
            );
            self.fallback.on_failure(&event.repository).await;
            true
        };

        Ok(NotificationOutcome {
            run_id,
            delivery,
            fallback_invoked,
            completed_at: Utc::now(),
        })
    }
}

// ── Forward pipeline ────────────────────────────────────────────────

/// Result of one forward run.
#[derive(Debug, Clone)]
pub enum ForwardOutcome {
    /// The event was relayed and accepted by the task processor.
    Forwarded {
        run_id: Uuid,
        delivery: DeliveryResult,
        completed_at: DateTime<Utc>,
    },
    /// The event did not meet the forward condition; nothing was sent.
    Skipped { run_id: Uuid },
}

/// Decide → POST the verbatim payload → surface failure as fatal.
pub struct ForwardPipeline {
    transport: Arc<dyn WebhookTransport>,
    task_url: SecretString,
    integration_branch: String,
}

impl ForwardPipeline {
    pub fn new(
        transport: Arc<dyn WebhookTransport>,
        task_url: SecretString,
        integration_branch: String,
    ) -> Self {
        Self {
            transport,
            task_url,
            integration_branch,
        }
    }

    /// Run the forward pipeline for one event.
    ///
    /// A non-2xx response or network failure is an error: merge events
    /// must not be dropped silently, so the caller exits non-zero. There
    /// is no fallback and no retry here.
    pub async fn run(&self, event: &RepoEvent) -> Result<ForwardOutcome, PipelineError> {
        let run_id = Uuid::new_v4();
        let decision = forward::decide(event, &self.integration_branch)?;

        if !decision.should_forward {
            info!(
                run_id = %run_id,
                kind = event.kind.label(),
                repository = %event.repository,
                "Event does not meet the forward condition; skipping"
            );
            return Ok(ForwardOutcome::Skipped { run_id });
        }

        info!(
            run_id = %run_id,
            repository = %event.repository,
            "Forwarding merge event to task processor"
        );

        let request = WebhookRequest::new(self.task_url.clone(), decision.payload)
            .with_header(EVENT_KIND_HEADER, event.kind.label())
            .with_header(REPOSITORY_HEADER, event.repository.clone());
        let delivery = self.transport.post(request).await;

        if !delivery.succeeded {
            return Err(PipelineError::ForwardRejected {
                status: delivery.status_label(),
                snippet: delivery.body_snippet.clone().unwrap_or_default(),
            });
        }

        info!(run_id = %run_id, status = %delivery.status_label(), "Merge event forwarded");
        Ok(ForwardOutcome::Forwarded {
            run_id,
            delivery,
            completed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::event::model::{SourceKind, Subject};

    /// Transport stub: answers each POST with the next scripted status
    /// (200 once the script runs out) and records every request.
    struct ScriptedTransport {
        statuses: Mutex<VecDeque<u16>>,
        requests: Mutex<Vec<WebhookRequest>>,
    }

    impl ScriptedTransport {
        fn new(statuses: &[u16]) -> Arc<Self> {
            Arc::new(Self {
                statuses: Mutex::new(statuses.iter().copied().collect()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl WebhookTransport for ScriptedTransport {
        async fn post(&self, request: WebhookRequest) -> DeliveryResult {
            self.requests.lock().unwrap().push(request);
            let status = self.statuses.lock().unwrap().pop_front().unwrap_or(200);
            DeliveryResult {
                succeeded: (200..300).contains(&status),
                status: Some(status),
                body_snippet: None,
            }
        }
    }

    fn merged_pr_event() -> RepoEvent {
        RepoEvent {
            kind: SourceKind::PullRequest,
            action: Some("closed".into()),
            actor: "octocat".into(),
            repository: "acme/widgets".into(),
            branch: None,
            subject: Subject::PullRequest {
                number: 42,
                title: "Add retry logic".into(),
                url: "https://github.com/acme/widgets/pull/42".into(),
                author: "alice".into(),
                base_branch: "main".into(),
                head_branch: "feature/retry".into(),
                merged: true,
            },
        }
    }

    fn notification_pipeline(transport: Arc<ScriptedTransport>) -> NotificationPipeline {
        NotificationPipeline::new(
            transport,
            SecretString::from("https://chat.example/hook"),
            SecretString::from("https://alerts.example/hook"),
        )
    }

    #[tokio::test]
    async fn delivered_notification_skips_fallback() {
        let transport = ScriptedTransport::new(&[200]);
        let pipeline = notification_pipeline(Arc::clone(&transport));

        let outcome = pipeline.run(&merged_pr_event()).await.unwrap();
        assert!(outcome.delivery.succeeded);
        assert!(!outcome.fallback_invoked);
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn failed_notification_invokes_fallback_once_and_completes() {
        let transport = ScriptedTransport::new(&[503, 200]);
        let pipeline = notification_pipeline(Arc::clone(&transport));

        let outcome = pipeline.run(&merged_pr_event()).await.unwrap();
        assert!(!outcome.delivery.succeeded);
        assert_eq!(outcome.delivery.status, Some(503));
        assert!(outcome.fallback_invoked);
        // Exactly two POSTs: the notification, then the single alert.
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn failed_fallback_still_completes() {
        let transport = ScriptedTransport::new(&[503, 500]);
        let pipeline = notification_pipeline(Arc::clone(&transport));

        let outcome = pipeline.run(&merged_pr_event()).await.unwrap();
        assert!(outcome.fallback_invoked);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn notification_body_is_rendered_document() {
        let transport = ScriptedTransport::new(&[200]);
        let pipeline = notification_pipeline(Arc::clone(&transport));

        pipeline.run(&merged_pr_event()).await.unwrap();

        let requests = transport.requests.lock().unwrap();
        let body = &requests[0].body;
        assert_eq!(body["text"], "Repository Activity");
        assert_eq!(
            body["attachments"][0]["blocks"][0]["text"]["text"],
            "Pull Request Merged"
        );
    }

    #[tokio::test]
    async fn forward_posts_payload_with_identifying_headers() {
        let transport = ScriptedTransport::new(&[200]);
        let pipeline = ForwardPipeline::new(
            Arc::clone(&transport) as Arc<dyn WebhookTransport>,
            SecretString::from("https://tasks.example/hook"),
            "main".to_string(),
        );

        let event = merged_pr_event();
        let outcome = pipeline.run(&event).await.unwrap();
        assert!(matches!(outcome, ForwardOutcome::Forwarded { .. }));

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body, serde_json::to_value(&event).unwrap());
        assert_eq!(
            requests[0].headers,
            vec![
                (EVENT_KIND_HEADER.to_string(), "pull_request".to_string()),
                (REPOSITORY_HEADER.to_string(), "acme/widgets".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn forward_failure_is_an_error_without_fallback() {
        let transport = ScriptedTransport::new(&[500]);
        let pipeline = ForwardPipeline::new(
            Arc::clone(&transport) as Arc<dyn WebhookTransport>,
            SecretString::from("https://tasks.example/hook"),
            "main".to_string(),
        );

        let err = pipeline.run(&merged_pr_event()).await.unwrap_err();
        assert!(matches!(err, PipelineError::ForwardRejected { .. }));
        // One POST only — the forward pipeline has no fallback attempt.
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn forward_skips_non_qualifying_events() {
        let transport = ScriptedTransport::new(&[]);
        let pipeline = ForwardPipeline::new(
            Arc::clone(&transport) as Arc<dyn WebhookTransport>,
            SecretString::from("https://tasks.example/hook"),
            "main".to_string(),
        );

        let mut event = merged_pr_event();
        event.action = Some("opened".into());
        if let Subject::PullRequest { merged, .. } = &mut event.subject {
            *merged = false;
        }

        let outcome = pipeline.run(&event).await.unwrap();
        assert!(matches!(outcome, ForwardOutcome::Skipped { .. }));
        assert_eq!(transport.request_count(), 0);
    }
}
