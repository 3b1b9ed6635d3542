//! Append-only message log.

use super::message::Message;
use serde::{Deserialize, Serialize};

/// Ordered record of every message produced in a session.
///
/// Insertion order is the canonical conversation order. The log also tracks a
/// presentation watermark: entries before `revealed` have finished their
/// simulated typing delay and may be rendered. The watermark only moves
/// forward, so late timers can never reorder what the renderer sees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    entries: Vec<Message>,
    revealed: usize,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns its position.
    pub fn append(&mut self, message: Message) -> usize {
        self.entries.push(message);
        self.entries.len() - 1
    }

    /// All messages in conversation order, including ones not yet revealed.
    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    /// Messages the renderer may show.
    pub fn visible(&self) -> &[Message] {
        &self.entries[..self.revealed]
    }

    /// Messages still waiting for their typing delay.
    pub fn pending(&self) -> &[Message] {
        &self.entries[self.revealed..]
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Moves the watermark so that the message with the given id and
    /// everything before it is visible.
    ///
    /// Returns false when the id is unknown (e.g. an option list that was
    /// already resolved) or the message was already visible.
    pub fn reveal_through(&mut self, message_id: &str) -> bool {
        match self.entries.iter().position(|m| m.id == message_id) {
            Some(index) if index >= self.revealed => {
                self.revealed = index + 1;
                true
            }
            _ => false,
        }
    }

    /// Makes every message visible.
    pub fn reveal_all(&mut self) {
        self.revealed = self.entries.len();
    }

    /// Removes pending option lists, returning how many were removed.
    ///
    /// This is the only removal the log allows: once a choice is resolved its
    /// option list must not be offered again.
    pub fn remove_pending_options(&mut self) -> usize {
        let before_watermark = self.entries[..self.revealed]
            .iter()
            .filter(|m| m.is_pending_options())
            .count();
        let before = self.entries.len();
        self.entries.retain(|m| !m.is_pending_options());
        self.revealed -= before_watermark;
        before - self.entries.len()
    }
}
