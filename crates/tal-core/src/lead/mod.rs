//! Lead domain module.
//!
//! A lead is the visitor's submitted contact and context information,
//! forwarded to the operator for WhatsApp follow-up.
//!
//! # Module Structure
//!
//! - `model`: Lead record and submission tracking (`LeadRecord`, `SubmissionStatus`)
//! - `gateway`: Outbound submission trait (`LeadGateway`)
//! - `wire`: JSON payloads exchanged with the intake endpoints
//! - `repository`: Hosted lead storage trait (`LeadRepository`, `StoredLead`)
//! - `summary`: Optional AI summarization (`Summarizer`, `AiSummary`)

mod gateway;
mod model;
mod repository;
mod summary;
pub mod wire;

// Re-export public API
pub use gateway::LeadGateway;
pub use model::{LeadRecord, PageContext, SubmissionReceipt, SubmissionStatus};
pub use repository::{LeadRepository, StoredLead};
pub use summary::{AiSummary, Summarizer};
pub use wire::IntakeFormat;
