//! Hosted lead storage.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A lead row as stored by the hosted database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLead {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub company_slug: String,
    pub company_name: String,
    pub whatsapp_number: String,
    pub user_name: String,
    pub user_workplace: String,
    pub basic_ask: String,
    pub page_url: String,
    pub utm_raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Persistence for registered leads.
///
/// Storage is delegated to an external service; implementations decouple the
/// intake use case from it (hosted REST table, or log-only when unconfigured).
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Saves a lead and returns the stored row.
    async fn save(&self, lead: &StoredLead) -> Result<StoredLead>;

    /// Lists stored leads, newest first, optionally for one company.
    async fn list(&self, company_slug: Option<&str>) -> Result<Vec<StoredLead>>;
}
