//! Structured chat message document.
//!
//! Typed tree for the outbound wire shape
//! `{ text, attachments: [{ color, blocks: [...] }] }`. The document is
//! serialized in a single serde step; nothing in the relay assembles
//! JSON by string interpolation.

use serde::{Deserialize, Serialize};

/// A complete chat message: banner text plus one colored attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDocument {
    /// Fixed top-level banner label.
    pub text: String,
    pub attachments: Vec<Attachment>,
}

/// A colored side-accent grouping a sequence of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Hex accent color keyed off the notification severity.
    pub color: String,
    pub blocks: Vec<Block>,
}

/// One layout block. Order within an attachment is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: Text,
    },
    Section {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<Text>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        fields: Vec<Text>,
    },
    Actions {
        elements: Vec<Element>,
    },
}

/// A text object, plain or markdown-flavored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Text {
    PlainText { text: String },
    Mrkdwn { text: String },
}

impl Text {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText { text: text.into() }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }
}

/// An interactive element inside an actions block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Button { text: Text, url: String },
}

impl Element {
    /// A link button with a plain-text label.
    pub fn link_button(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Button {
            text: Text::plain(label),
            url: url.into(),
        }
    }
}
