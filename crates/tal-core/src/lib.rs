//! Core domain of the Tal job-matching funnel.
//!
//! Tal greets a visitor, collects contact and job-preference details through
//! a scripted conversation, and submits them once as a lead for WhatsApp
//! follow-up. This crate holds the pure parts of that: the dialogue scripts
//! and engine, the session state they mutate, the lead wire formats, and the
//! traits implemented by the outer layers.
//!
//! # Module Structure
//!
//! - `config`: Branding and secret configuration models
//! - `dialogue`: Script table, validators and the dialogue engine
//! - `error`: Shared error type (`TalError`)
//! - `field`: Collected field names and buffer
//! - `lead`: Lead record, intake payloads, gateway/summarizer/repository traits
//! - `scheduler`: Deferred action scheduling trait
//! - `session`: Message log and per-visitor session state

pub mod config;
pub mod dialogue;
pub mod error;
pub mod field;
pub mod lead;
pub mod scheduler;
pub mod session;

// Re-export common error type
pub use error::TalError;
