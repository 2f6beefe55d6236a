//! Notification rendering — intent to message document.
//!
//! Pure construction: the renderer never fails for a well-formed intent
//! and emits blocks in a stable order (header, description, fields,
//! actions) so documents can be compared byte-for-byte in tests.

use crate::event::model::PLATFORM_URL;
use crate::message::model::{Attachment, Block, Element, MessageDocument, Text};
use crate::pipeline::intent::{NotificationIntent, Severity};

/// Fixed banner label carried by every notification.
pub const BANNER: &str = "Repository Activity";

/// Title of the degraded alert sent by the fallback handler.
pub const ALERT_TITLE: &str = "System Alert";

const COLOR_SUCCESS: &str = "#2eb67d";
const COLOR_INFO: &str = "#36c5f0";
const COLOR_DANGER: &str = "#e01e5a";

/// Accent color for a severity.
pub fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => COLOR_SUCCESS,
        Severity::Info => COLOR_INFO,
        Severity::Danger => COLOR_DANGER,
    }
}

/// Render an intent into the outbound message document.
///
/// Field order is fixed: Repository, Author (as a profile link), then the
/// intent's extra fields in declaration order. Buttons: primary first,
/// then the secondary action when present.
pub fn render(intent: &NotificationIntent, repository: &str) -> MessageDocument {
    let mut fields = vec![
        labelled_field("Repository", repository),
        Text::mrkdwn(format!(
            "*Author:*\n<{PLATFORM_URL}/{handle}|{handle}>",
            handle = intent.author_handle
        )),
    ];
    for (label, value) in &intent.extra_fields {
        fields.push(labelled_field(label, value));
    }

    let mut elements = vec![Element::link_button(
        intent.button_label.clone(),
        intent.target_url.clone(),
    )];
    if let Some(secondary) = &intent.secondary_action {
        elements.push(Element::link_button(
            secondary.label.clone(),
            secondary.url.clone(),
        ));
    }

    MessageDocument {
        text: BANNER.to_string(),
        attachments: vec![Attachment {
            color: severity_color(intent.severity).to_string(),
            blocks: vec![
                Block::Header {
                    text: Text::plain(intent.title.clone()),
                },
                Block::Section {
                    text: Some(Text::mrkdwn(intent.description.clone())),
                    fields: Vec::new(),
                },
                Block::Section {
                    text: None,
                    fields,
                },
                Block::Actions { elements },
            ],
        }],
    }
}

/// Degraded, context-minimal alert for when the primary notification
/// could not be delivered.
pub fn render_alert(repository: &str) -> MessageDocument {
    MessageDocument {
        text: BANNER.to_string(),
        attachments: vec![Attachment {
            color: COLOR_DANGER.to_string(),
            blocks: vec![
                Block::Header {
                    text: Text::plain(ALERT_TITLE),
                },
                Block::Section {
                    text: Some(Text::mrkdwn(format!(
                        "A notification for {repository} could not be delivered. \
                         Check the repository's recent activity manually."
                    ))),
                    fields: Vec::new(),
                },
                Block::Actions {
                    elements: vec![Element::link_button(
                        "Open Repository",
                        format!("{PLATFORM_URL}/{repository}"),
                    )],
                },
            ],
        }],
    }
}

fn labelled_field(label: &str, value: &str) -> Text {
    Text::mrkdwn(format!("*{label}:*\n{value}"))
}
