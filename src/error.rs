//! Error types for Repo Herald.

/// Top-level error type for the relay.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Event error: {0}")]
    Event(#[from] EventError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors loading or validating an inbound event.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Failed to read event payload: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse event payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Event kind {kind} does not match subject variant {subject}")]
    SubjectMismatch { kind: String, subject: String },

    #[error("Invalid repository name (expected owner/name): {0}")]
    InvalidRepository(String),
}

/// Pipeline-related errors.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Forward endpoint rejected the event (status {status}): {snippet}")]
    ForwardRejected { status: String, snippet: String },
}

/// Result type alias for the relay.
pub type Result<T> = std::result::Result<T, Error>;
