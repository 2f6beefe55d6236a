use std::path::PathBuf;
use std::sync::Arc;

use repo_herald::config::Config;
use repo_herald::delivery::{WebhookClient, WebhookTransport};
use repo_herald::event::EventLoader;
use repo_herald::pipeline::{ForwardOutcome, ForwardPipeline, NotificationPipeline};

/// Environment variable naming the event payload file when no path
/// argument is given.
const EVENT_PATH_VAR: &str = "HERALD_EVENT_PATH";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mode = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: repo-herald <notify|forward> [event-path]");
        std::process::exit(2);
    });

    let event_path = std::env::args()
        .nth(2)
        .or_else(|| std::env::var(EVENT_PATH_VAR).ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            eprintln!("Error: no event payload path given");
            eprintln!("  pass it as the second argument or set {EVENT_PATH_VAR}");
            std::process::exit(2);
        });

    let config = Config::from_env();
    let event = EventLoader::new().load(&event_path).await?;

    eprintln!("📣 Repo Herald v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Mode: {mode}");
    eprintln!(
        "   Event: {} in {} by {}",
        event.kind.label(),
        event.repository,
        event.actor
    );

    let transport: Arc<dyn WebhookTransport> = Arc::new(WebhookClient::new());

    match mode.as_str() {
        "notify" => {
            let chat_url = config.require_chat_webhook()?.clone();
            let alert_url = config
                .alert_webhook_url
                .clone()
                .unwrap_or_else(|| chat_url.clone());

            let pipeline = NotificationPipeline::new(transport, chat_url, alert_url);
            let outcome = pipeline.run(&event).await?;

            if outcome.delivery.succeeded {
                eprintln!("   Notification delivered ({})", outcome.delivery.status_label());
            } else {
                eprintln!(
                    "   Notification failed ({}); fallback alert sent",
                    outcome.delivery.status_label()
                );
            }
            Ok(())
        }
        "forward" => {
            let task_url = config.require_task_webhook()?.clone();

            let pipeline =
                ForwardPipeline::new(transport, task_url, config.integration_branch.clone());
            match pipeline.run(&event).await? {
                ForwardOutcome::Forwarded { delivery, .. } => {
                    eprintln!("   Merge event forwarded ({})", delivery.status_label());
                }
                ForwardOutcome::Skipped { .. } => {
                    eprintln!("   Event does not qualify for forwarding; nothing sent");
                }
            }
            Ok(())
        }
        other => {
            eprintln!("Error: unknown mode '{other}'");
            eprintln!("Usage: repo-herald <notify|forward> [event-path]");
            std::process::exit(2);
        }
    }
}
