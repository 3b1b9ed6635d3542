//! Application layer for Tal.
//!
//! This crate provides use case implementations that coordinate the domain
//! with its collaborators: the chat session runtime that drives a dialogue
//! in real time, and the lead intake service behind the HTTP endpoints.

pub mod chat;
pub mod lead_intake;

pub use chat::{ChatSession, ChatSessionFactory, ImmediateScheduler, StateListener, TokioScheduler};
pub use lead_intake::{IntakeRules, LeadIntakeService};
