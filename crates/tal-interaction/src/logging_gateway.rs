//! Dry-run gateway.

use async_trait::async_trait;
use tal_core::error::Result;
use tal_core::lead::{LeadGateway, LeadRecord, SubmissionReceipt};

/// Gateway that logs the wire payload instead of sending it.
///
/// Always succeeds, so the dialogue shows its "submitted" closing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingGateway;

#[async_trait]
impl LeadGateway for LoggingGateway {
    async fn submit(&self, record: &LeadRecord) -> Result<SubmissionReceipt> {
        let payload = record.intake.payload(record)?;
        tracing::info!(
            lead_id = %record.id,
            variant = %record.variant,
            path = record.intake.path(),
            "[LoggingGateway] Would submit {}",
            payload
        );
        Ok(SubmissionReceipt::default())
    }
}
