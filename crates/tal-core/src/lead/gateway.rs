//! Outbound lead submission.

use super::model::{LeadRecord, SubmissionReceipt};
use crate::error::Result;
use async_trait::async_trait;

/// Sends a completed lead to the intake collaborator.
///
/// Implementations make a single attempt and never retry: on failure the
/// visitor is offered the WhatsApp link instead. The at-most-once guarantee
/// per session is enforced by the caller, not by the gateway.
#[async_trait]
pub trait LeadGateway: Send + Sync {
    /// Submits the record.
    ///
    /// # Returns
    ///
    /// - `Ok(SubmissionReceipt)`: The intake endpoint accepted the lead
    /// - `Err(TalError::Submission)`: Transport failure or non-success status
    async fn submit(&self, record: &LeadRecord) -> Result<SubmissionReceipt>;
}
