//! Lead record and submission tracking.

use super::summary::AiSummary;
use super::wire::IntakeFormat;
use crate::config::BrandConfig;
use crate::field::FieldSnapshot;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where the visitor opened the funnel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    /// Full page URL.
    pub page_url: String,
    /// Raw query string, including UTM parameters (e.g. `?utm_source=x`).
    pub utm_raw: String,
}

impl PageContext {
    pub fn new(page_url: impl Into<String>, utm_raw: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            utm_raw: utm_raw.into(),
        }
    }

    /// Builds a context from a page URL, taking the query string from it.
    pub fn from_url(page_url: &str) -> Self {
        let utm_raw = url::Url::parse(page_url)
            .ok()
            .and_then(|u| u.query().map(|q| format!("?{q}")))
            .unwrap_or_default();
        Self::new(page_url, utm_raw)
    }
}

/// Submission payload built once at the terminal step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    /// Unique record identifier (UUID format)
    pub id: String,
    /// Dialogue script that produced the lead.
    pub variant: String,
    /// Wire format the intake endpoint expects.
    pub intake: IntakeFormat,
    pub company_slug: String,
    pub company_name: String,
    pub fields: FieldSnapshot,
    pub page_url: String,
    pub utm_raw: String,
    /// Timestamp when the record was built (ISO 8601 format)
    pub submitted_at: String,
}

impl LeadRecord {
    pub fn new(
        variant: impl Into<String>,
        intake: IntakeFormat,
        brand: &BrandConfig,
        fields: FieldSnapshot,
        context: &PageContext,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            variant: variant.into(),
            intake,
            company_slug: brand.slug.clone(),
            company_name: brand.name.clone(),
            fields,
            page_url: context.page_url.clone(),
            utm_raw: context.utm_raw.clone(),
            submitted_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// What the intake endpoint answered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<AiSummary>,
}

/// Progress of the single outbound submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    NotAttempted,
    InFlight,
    Succeeded,
    Failed { reason: String },
}

impl SubmissionStatus {
    /// Returns true once the outcome is known.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldName;

    #[test]
    fn test_page_context_extracts_query_string() {
        let ctx = PageContext::from_url("https://tal.example/acme?utm_source=li&utm_campaign=q3");
        assert_eq!(ctx.utm_raw, "?utm_source=li&utm_campaign=q3");
    }

    #[test]
    fn test_page_context_without_query() {
        let ctx = PageContext::from_url("https://tal.example/acme");
        assert_eq!(ctx.utm_raw, "");

        let ctx = PageContext::from_url("not a url");
        assert_eq!(ctx.page_url, "not a url");
        assert_eq!(ctx.utm_raw, "");
    }

    #[test]
    fn test_lead_record_copies_brand_and_context() {
        let brand = BrandConfig::default();
        let ctx = PageContext::new("https://tal.example/", "?utm_source=x");
        let fields = FieldSnapshot::from([(FieldName::Name, "Asha")]);

        let record = LeadRecord::new("chat-onboarding", IntakeFormat::ChatOnboarding, &brand, fields, &ctx);

        assert_eq!(record.company_slug, brand.slug);
        assert_eq!(record.utm_raw, "?utm_source=x");
        assert_eq!(record.fields.get(FieldName::Name), Some("Asha"));
    }

    #[test]
    fn test_submission_status_settled() {
        assert!(!SubmissionStatus::NotAttempted.is_settled());
        assert!(!SubmissionStatus::InFlight.is_settled());
        assert!(SubmissionStatus::Succeeded.is_settled());
        assert!(SubmissionStatus::Failed { reason: "503".into() }.is_settled());
    }
}
