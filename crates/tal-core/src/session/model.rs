//! Session state model.
//!
//! `SessionState` is the plain state object the dialogue engine mutates. It is
//! created when a visitor opens the page and discarded when they leave; it is
//! never persisted.

use super::log::MessageLog;
use super::message::Message;
use crate::field::FieldCollector;
use crate::lead::{PageContext, SubmissionStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// State of one visitor's conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Identifier of the dialogue script driving this session.
    pub variant: String,
    /// Current step; `None` until the session is started.
    pub current_step: Option<String>,
    pub fields: FieldCollector,
    pub log: MessageLog,
    /// Submission progress. Anything other than `NotAttempted` means the
    /// single submission has already been issued.
    pub submission: SubmissionStatus,
    /// Transient "Tal is typing" indicator.
    pub typing: bool,
    /// Where the visitor came from.
    pub context: PageContext,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
}

impl SessionState {
    /// Creates a fresh, not yet started session.
    pub fn new(variant: impl Into<String>, context: PageContext) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            variant: variant.into(),
            current_step: None,
            fields: FieldCollector::new(),
            log: MessageLog::new(),
            submission: SubmissionStatus::NotAttempted,
            typing: false,
            context,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn has_started(&self) -> bool {
        self.current_step.is_some()
    }

    /// Returns true once the single submission has been issued.
    pub fn submission_attempted(&self) -> bool {
        !matches!(self.submission, SubmissionStatus::NotAttempted)
    }

    /// Builds the read-only view handed to renderers.
    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id.clone(),
            current_step: self.current_step.clone(),
            messages: self.log.visible().to_vec(),
            pending: self.log.pending().len(),
            typing: self.typing,
            submission: self.submission.clone(),
        }
    }
}

/// Snapshot of what a renderer should display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: String,
    pub current_step: Option<String>,
    /// Revealed messages in conversation order.
    pub messages: Vec<Message>,
    /// Number of messages still behind their typing delay.
    pub pending: usize,
    pub typing: bool,
    pub submission: SubmissionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = SessionState::new("chat-onboarding", PageContext::default());

        assert!(!session.has_started());
        assert!(!session.submission_attempted());
        assert!(session.fields.is_empty());
        assert!(session.log.is_empty());
        assert!(!session.id.is_empty());
    }

    #[test]
    fn test_view_only_contains_revealed_messages() {
        let mut session = SessionState::new("chat-widget", PageContext::default());
        session.log.append(Message::agent("hi, my name is tal", 0));
        session.log.reveal_all();
        session.log.append(Message::agent("what's your name?", 500));
        session.typing = true;

        let view = session.view();
        assert_eq!(view.messages.len(), 1);
        assert_eq!(view.pending, 1);
        assert!(view.typing);
    }
}
