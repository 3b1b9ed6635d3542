//! Log-only lead repository.

use tal_core::error::Result;
use tal_core::lead::{LeadRepository, StoredLead};

/// `LeadRepository` used when no hosted store is configured.
///
/// Saving writes the lead to the log and echoes it back; nothing is kept, so
/// listing is always empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLeadRepository;

#[async_trait::async_trait]
impl LeadRepository for LogLeadRepository {
    async fn save(&self, lead: &StoredLead) -> Result<StoredLead> {
        tracing::warn!("[LogLeadRepository] Lead store not configured, lead will only be logged");
        tracing::info!(
            company = %lead.company_name,
            company_slug = %lead.company_slug,
            whatsapp = %lead.whatsapp_number,
            name = %lead.user_name,
            workplace = %lead.user_workplace,
            basic_ask = %lead.basic_ask,
            page_url = %lead.page_url,
            utm = %lead.utm_raw,
            "[LogLeadRepository] New lead registration"
        );

        let mut stored = lead.clone();
        if stored.created_at.is_none() {
            stored.created_at = Some(chrono::Utc::now().to_rfc3339());
        }
        Ok(stored)
    }

    async fn list(&self, _company_slug: Option<&str>) -> Result<Vec<StoredLead>> {
        tracing::warn!("[LogLeadRepository] Lead store not configured, no leads to list");
        Ok(Vec::new())
    }
}
