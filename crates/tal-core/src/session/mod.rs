//! Session domain module.
//!
//! This module contains the per-visitor conversation state the dialogue
//! engine operates on.
//!
//! # Module Structure
//!
//! - `message`: Conversation message types (`Message`, `MessageSender`, `MessageKind`)
//! - `log`: Append-only message log with a presentation watermark (`MessageLog`)
//! - `model`: Session state (`SessionState`, `SessionView`)
//!
//! # Usage
//!
//! ```ignore
//! use tal_core::session::{Message, MessageLog, SessionState};
//! ```

mod log;
mod message;
mod model;

// Re-export public API
pub use log::MessageLog;
pub use message::{Message, MessageKind, MessageSender};
pub use model::{SessionState, SessionView};
