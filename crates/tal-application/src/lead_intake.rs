//! Lead intake use case.
//!
//! Server-side counterpart of the chat funnels: validates the JSON payload of
//! each intake endpoint, optionally enriches registrations with an AI summary
//! and hands them to the lead repository.

use std::sync::Arc;
use tal_core::error::{Result, TalError};
use tal_core::lead::wire::{
    ChatOnboardingPayload, IntakeResponse, LeadPayload, RegisterLeadPayload,
};
use tal_core::lead::{AiSummary, LeadRepository, StoredLead, Summarizer};

/// Wire names of the lead-form fields that must be non-blank.
pub const DEFAULT_REQUIRED_LEAD_FIELDS: [&str; 7] = [
    "fullName",
    "whatsAppNumber",
    "currentRole",
    "experienceBand",
    "city",
    "primarySkill",
    "email",
];

/// Validation thresholds for the intake endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeRules {
    /// Lead-form fields (wire names) that must be non-blank.
    pub required_lead_fields: Vec<String>,
    /// Minimum WhatsApp number length.
    pub min_phone_length: usize,
}

impl Default for IntakeRules {
    fn default() -> Self {
        Self {
            required_lead_fields: DEFAULT_REQUIRED_LEAD_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            min_phone_length: 7,
        }
    }
}

/// Validates and records inbound leads.
pub struct LeadIntakeService {
    rules: IntakeRules,
    summarizer: Option<Arc<dyn Summarizer>>,
    repository: Arc<dyn LeadRepository>,
}

impl LeadIntakeService {
    /// Creates a new `LeadIntakeService`.
    ///
    /// # Arguments
    ///
    /// * `rules` - Validation thresholds
    /// * `summarizer` - Optional AI summarizer; `None` skips summarization
    /// * `repository` - Storage for registered leads
    pub fn new(
        rules: IntakeRules,
        summarizer: Option<Arc<dyn Summarizer>>,
        repository: Arc<dyn LeadRepository>,
    ) -> Self {
        Self {
            rules,
            summarizer,
            repository,
        }
    }

    /// Handles `POST /api/chat-onboarding`.
    pub async fn chat_onboarding(&self, mut payload: ChatOnboardingPayload) -> Result<IntakeResponse> {
        if payload.name.trim().is_empty() {
            return Err(TalError::validation("name", "Name is required"));
        }
        if payload.phone.trim().is_empty() {
            return Err(TalError::validation("phone", "Phone is required"));
        }
        payload.created_at.get_or_insert_with(now);

        tracing::info!(
            "[LeadIntake] Chat onboarding: {}",
            serde_json::to_string(&payload)?
        );
        Ok(IntakeResponse::ok())
    }

    /// Handles `POST /api/lead`.
    pub async fn lead(&self, mut payload: LeadPayload) -> Result<IntakeResponse> {
        for field in &self.rules.required_lead_fields {
            let value = payload.field(field).unwrap_or_default();
            if value.trim().is_empty() {
                return Err(TalError::validation(
                    field.as_str(),
                    format!("Missing required field: {field}"),
                ));
            }
        }

        if !payload.email.contains('@') || !payload.email.contains('.') {
            return Err(TalError::validation("email", "Invalid email format"));
        }

        if payload.whats_app_number.trim().chars().count() < self.rules.min_phone_length {
            return Err(TalError::validation(
                "whatsAppNumber",
                "Invalid WhatsApp number",
            ));
        }

        payload.created_at.get_or_insert_with(now);

        tracing::info!("[LeadIntake] Lead: {}", serde_json::to_string(&payload)?);
        Ok(IntakeResponse::ok())
    }

    /// Handles `POST /api/register-lead`.
    pub async fn register_lead(&self, payload: RegisterLeadPayload) -> Result<IntakeResponse> {
        if payload.whats_app_number.chars().count() < self.rules.min_phone_length {
            return Err(TalError::validation(
                "whatsAppNumber",
                "WhatsApp number is required",
            ));
        }
        if payload.basic_ask.trim().is_empty() {
            return Err(TalError::validation("basicAsk", "Basic ask is required"));
        }

        tracing::info!(
            "[LeadIntake] New lead registration for {} ({}): whatsapp={}, name={}, workplace={}, ask={:?}, page={}, utm={}",
            payload.company_name,
            payload.company_slug,
            payload.whats_app_number,
            payload.user_name,
            payload.user_workplace,
            payload.basic_ask,
            payload.page_url,
            payload.utm.raw
        );

        let ai_summary = self.summarize(&payload).await;
        if let Some(summary) = &ai_summary {
            tracing::info!("[LeadIntake] AI summary: {:?}", summary);
        }

        let lead = StoredLead {
            id: None,
            company_slug: payload.company_slug,
            company_name: payload.company_name,
            whatsapp_number: payload.whats_app_number,
            user_name: payload.user_name,
            user_workplace: payload.user_workplace,
            basic_ask: payload.basic_ask,
            page_url: payload.page_url,
            utm_raw: payload.utm.raw,
            ai_title: ai_summary.as_ref().map(|s| s.title.clone()),
            ai_tags: ai_summary.as_ref().map(|s| s.tags.clone()),
            created_at: Some(now()),
        };
        let stored = self.repository.save(&lead).await?;
        tracing::debug!("[LeadIntake] Stored lead {:?}", stored.id);

        Ok(IntakeResponse::with_summary(ai_summary))
    }

    /// Lists registered leads, newest first.
    pub async fn list_leads(&self, company_slug: Option<&str>) -> Result<Vec<StoredLead>> {
        self.repository.list(company_slug).await
    }

    /// Best-effort summary; any failure means no summary.
    async fn summarize(&self, payload: &RegisterLeadPayload) -> Option<AiSummary> {
        let Some(summarizer) = &self.summarizer else {
            tracing::debug!("[LeadIntake] No summarizer configured, skipping AI analysis");
            return None;
        };
        match summarizer
            .summarize(&payload.basic_ask, &payload.user_workplace)
            .await
        {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::warn!("[LeadIntake] AI summary failed: {}", e);
                None
            }
        }
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tal_core::lead::wire::UtmInfo;

    #[derive(Default)]
    struct MemoryRepository {
        leads: Mutex<Vec<StoredLead>>,
    }

    #[async_trait]
    impl LeadRepository for MemoryRepository {
        async fn save(&self, lead: &StoredLead) -> Result<StoredLead> {
            let mut stored = lead.clone();
            stored.id = Some(format!("lead-{}", self.leads.lock().unwrap().len() + 1));
            self.leads.lock().unwrap().push(stored.clone());
            Ok(stored)
        }

        async fn list(&self, company_slug: Option<&str>) -> Result<Vec<StoredLead>> {
            Ok(self
                .leads
                .lock()
                .unwrap()
                .iter()
                .filter(|l| company_slug.is_none_or(|slug| l.company_slug == slug))
                .cloned()
                .collect())
        }
    }

    struct FixedSummarizer(Result<AiSummary>);

    #[async_trait]
    impl Summarizer for FixedSummarizer {
        async fn summarize(&self, _basic_ask: &str, _user_workplace: &str) -> Result<AiSummary> {
            self.0.clone()
        }
    }

    fn service(summarizer: Option<Arc<dyn Summarizer>>) -> (LeadIntakeService, Arc<MemoryRepository>) {
        let repository = Arc::new(MemoryRepository::default());
        (
            LeadIntakeService::new(IntakeRules::default(), summarizer, repository.clone()),
            repository,
        )
    }

    fn complete_lead() -> LeadPayload {
        LeadPayload {
            full_name: "Asha".into(),
            whats_app_number: "9876543210".into(),
            current_role: "Engineer".into(),
            experience_band: "3-5 years".into(),
            city: "Bengaluru".into(),
            primary_skill: "Data / ML".into(),
            email: "asha@acme.com".into(),
            ..Default::default()
        }
    }

    fn registration() -> RegisterLeadPayload {
        RegisterLeadPayload {
            company_slug: "acme".into(),
            company_name: "Acme Corporation".into(),
            whats_app_number: "9876543210".into(),
            user_name: "Asha".into(),
            user_workplace: "Payments".into(),
            basic_ask: "backend role in Pune".into(),
            page_url: "https://tal.example/acme".into(),
            utm: UtmInfo {
                raw: "?utm_source=li".into(),
            },
        }
    }

    fn message(err: TalError) -> String {
        match err {
            TalError::Validation { message, .. } => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_chat_onboarding_requires_name_and_phone() {
        let (service, _) = service(None);

        let err = service
            .chat_onboarding(ChatOnboardingPayload {
                phone: "9876543210".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(message(err), "Name is required");

        let err = service
            .chat_onboarding(ChatOnboardingPayload {
                name: "Asha".into(),
                phone: "  ".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(message(err), "Phone is required");

        let ok = service
            .chat_onboarding(ChatOnboardingPayload {
                name: "Asha".into(),
                phone: "9876543210".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(ok.ok);
    }

    #[tokio::test]
    async fn test_lead_reports_first_missing_field() {
        let (service, _) = service(None);
        let payload = LeadPayload {
            current_role: String::new(),
            ..complete_lead()
        };

        let err = service.lead(payload).await.unwrap_err();
        assert_eq!(message(err), "Missing required field: currentRole");
    }

    #[tokio::test]
    async fn test_lead_validates_email_and_phone() {
        let (service, _) = service(None);

        let err = service
            .lead(LeadPayload {
                email: "not-an-email".into(),
                ..complete_lead()
            })
            .await
            .unwrap_err();
        assert_eq!(message(err), "Invalid email format");

        let err = service
            .lead(LeadPayload {
                whats_app_number: " 12345 ".into(),
                ..complete_lead()
            })
            .await
            .unwrap_err();
        assert_eq!(message(err), "Invalid WhatsApp number");

        assert!(service.lead(complete_lead()).await.unwrap().ok);
    }

    #[tokio::test]
    async fn test_required_fields_are_configurable() {
        let rules = IntakeRules {
            required_lead_fields: vec!["fullName".into(), "email".into(), "urgency".into()],
            ..IntakeRules::default()
        };
        let service = LeadIntakeService::new(rules, None, Arc::new(MemoryRepository::default()));

        let err = service.lead(complete_lead()).await.unwrap_err();
        assert_eq!(message(err), "Missing required field: urgency");
    }

    #[tokio::test]
    async fn test_register_lead_validation() {
        let (service, repository) = service(None);

        let err = service
            .register_lead(RegisterLeadPayload {
                whats_app_number: "12345".into(),
                ..registration()
            })
            .await
            .unwrap_err();
        assert_eq!(message(err), "WhatsApp number is required");

        let err = service
            .register_lead(RegisterLeadPayload {
                basic_ask: "   ".into(),
                ..registration()
            })
            .await
            .unwrap_err();
        assert_eq!(message(err), "Basic ask is required");
        assert!(repository.leads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_lead_without_summarizer() {
        let (service, repository) = service(None);

        let response = service.register_lead(registration()).await.unwrap();

        assert_eq!(response, IntakeResponse::ok());
        let stored = repository.leads.lock().unwrap()[0].clone();
        assert_eq!(stored.whatsapp_number, "9876543210");
        assert_eq!(stored.utm_raw, "?utm_source=li");
        assert!(stored.ai_title.is_none());
        assert!(stored.created_at.is_some());
    }

    #[tokio::test]
    async fn test_register_lead_attaches_summary() {
        let summary = AiSummary {
            title: "Backend engineer, Pune".into(),
            tags: vec!["backend".into(), "pune".into()],
        };
        let (service, repository) = service(Some(Arc::new(FixedSummarizer(Ok(summary.clone())))));

        let response = service.register_lead(registration()).await.unwrap();

        assert_eq!(response.ai_summary, Some(summary));
        let stored = repository.leads.lock().unwrap()[0].clone();
        assert_eq!(stored.ai_title.as_deref(), Some("Backend engineer, Pune"));
        assert_eq!(stored.ai_tags.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_summarizer_failure_degrades_to_no_summary() {
        let (service, _) = service(Some(Arc::new(FixedSummarizer(Err(TalError::internal(
            "rate limited",
        ))))));

        let response = service.register_lead(registration()).await.unwrap();
        assert!(response.ok);
        assert!(response.ai_summary.is_none());
    }

    #[tokio::test]
    async fn test_list_leads_filters_by_company() {
        let (service, _) = service(None);
        service.register_lead(registration()).await.unwrap();
        service
            .register_lead(RegisterLeadPayload {
                company_slug: "globex".into(),
                ..registration()
            })
            .await
            .unwrap();

        assert_eq!(service.list_leads(None).await.unwrap().len(), 2);
        assert_eq!(service.list_leads(Some("globex")).await.unwrap().len(), 1);
    }
}
