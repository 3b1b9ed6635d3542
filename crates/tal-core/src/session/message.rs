//! Conversation message types.
//!
//! This module contains types for representing messages exchanged between
//! Tal and the visitor.

use crate::dialogue::ChoiceOption;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSender {
    /// Scripted message from Tal.
    Agent,
    /// Message typed or chosen by the visitor.
    User,
}

/// How a message is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageKind {
    /// Plain chat bubble.
    Text,
    /// Pending option list for a single-choice step.
    ///
    /// Removed from the log once the choice is resolved.
    Options { options: Vec<ChoiceOption> },
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier (UUID format)
    pub id: String,
    pub sender: MessageSender,
    pub text: String,
    /// Timestamp when the message was created (ISO 8601 format).
    pub created_at: String,
    pub kind: MessageKind,
    /// Simulated typing time before the message is shown.
    ///
    /// Presentation metadata only; never affects ordering.
    #[serde(default)]
    pub typing_delay_ms: u64,
}

impl Message {
    fn new(sender: MessageSender, text: String, kind: MessageKind, typing_delay_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            text,
            created_at: chrono::Utc::now().to_rfc3339(),
            kind,
            typing_delay_ms,
        }
    }

    /// Creates a scripted agent message shown after `typing_delay_ms`.
    pub fn agent(text: impl Into<String>, typing_delay_ms: u64) -> Self {
        Self::new(
            MessageSender::Agent,
            text.into(),
            MessageKind::Text,
            typing_delay_ms,
        )
    }

    /// Creates a visitor message. User messages are shown immediately.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageSender::User, text.into(), MessageKind::Text, 0)
    }

    /// Creates a pending option list.
    pub fn options(options: Vec<ChoiceOption>) -> Self {
        Self::new(
            MessageSender::Agent,
            String::new(),
            MessageKind::Options { options },
            0,
        )
    }

    pub fn is_pending_options(&self) -> bool {
        matches!(self.kind, MessageKind::Options { .. })
    }
}
