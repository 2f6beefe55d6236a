//! Event classification and pipeline orchestration.

pub mod classifier;
pub mod forward;
pub mod intent;
pub mod processor;

pub use classifier::{EventTag, classify};
pub use forward::{ForwardDecision, decide};
pub use intent::{LinkAction, NotificationIntent, Severity};
pub use processor::{ForwardOutcome, ForwardPipeline, NotificationOutcome, NotificationPipeline};
