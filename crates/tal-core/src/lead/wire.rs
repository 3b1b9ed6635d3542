//! JSON payloads exchanged with the lead-intake endpoints.
//!
//! Field names are camelCase on the wire. Required fields default to empty
//! strings when absent so the intake service can report which one is missing
//! instead of failing deserialization.

use super::model::LeadRecord;
use super::summary::AiSummary;
use crate::field::FieldName;
use serde::{Deserialize, Serialize};

/// Payload shape an intake endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeFormat {
    /// `{name, phone, company}` onboarding payload.
    ChatOnboarding,
    /// Full lead-form payload.
    Lead,
    /// Company-scoped registration with page/UTM context.
    RegisterLead,
}

impl IntakeFormat {
    /// Path of the endpoint accepting this format.
    pub fn path(&self) -> &'static str {
        match self {
            IntakeFormat::ChatOnboarding => "/api/chat-onboarding",
            IntakeFormat::Lead => "/api/lead",
            IntakeFormat::RegisterLead => "/api/register-lead",
        }
    }

    /// Renders a lead record in this format.
    pub fn payload(&self, record: &LeadRecord) -> serde_json::Result<serde_json::Value> {
        match self {
            IntakeFormat::ChatOnboarding => serde_json::to_value(ChatOnboardingPayload::from(record)),
            IntakeFormat::Lead => serde_json::to_value(LeadPayload::from(record)),
            IntakeFormat::RegisterLead => serde_json::to_value(RegisterLeadPayload::from(record)),
        }
    }
}

/// Body of `POST /api/chat-onboarding`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatOnboardingPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<&LeadRecord> for ChatOnboardingPayload {
    fn from(record: &LeadRecord) -> Self {
        Self {
            name: record.fields.get_or_empty(FieldName::Name),
            phone: record.fields.get_or_empty(FieldName::Phone),
            company: Some(record.fields.get_or_empty(FieldName::Workplace)),
            created_at: Some(record.submitted_at.clone()),
        }
    }
}

/// Body of `POST /api/lead`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_persona: Option<String>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub whats_app_number: String,
    #[serde(default)]
    pub current_role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_company: Option<String>,
    #[serde(default)]
    pub experience_band: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub primary_skill: String,
    #[serde(default, rename = "currentCTC", skip_serializing_if = "Option::is_none")]
    pub current_ctc: Option<String>,
    #[serde(default, rename = "targetCTC", skip_serializing_if = "Option::is_none")]
    pub target_ctc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice_period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl LeadPayload {
    /// Looks up a required field by its wire name.
    ///
    /// Optional fields report an empty string when absent.
    pub fn field(&self, wire_name: &str) -> Option<&str> {
        let value = match wire_name {
            "fullName" => self.full_name.as_str(),
            "whatsAppNumber" => self.whats_app_number.as_str(),
            "currentRole" => self.current_role.as_str(),
            "experienceBand" => self.experience_band.as_str(),
            "city" => self.city.as_str(),
            "primarySkill" => self.primary_skill.as_str(),
            "email" => self.email.as_str(),
            "selectedPersona" => self.selected_persona.as_deref().unwrap_or_default(),
            "currentCompany" => self.current_company.as_deref().unwrap_or_default(),
            "urgency" => self.urgency.as_deref().unwrap_or_default(),
            "source" => self.source.as_deref().unwrap_or_default(),
            _ => return None,
        };
        Some(value)
    }
}

impl From<&LeadRecord> for LeadPayload {
    fn from(record: &LeadRecord) -> Self {
        let fields = &record.fields;
        Self {
            selected_persona: fields.get(FieldName::Persona).map(str::to_string),
            full_name: fields.get_or_empty(FieldName::Name),
            whats_app_number: fields.get_or_empty(FieldName::Phone),
            current_role: fields.get_or_empty(FieldName::Role),
            current_company: Some(fields.get_or_empty(FieldName::Workplace)),
            experience_band: fields.get_or_empty(FieldName::Experience),
            city: fields.get_or_empty(FieldName::City),
            primary_skill: fields.get_or_empty(FieldName::Skill),
            email: fields.get_or_empty(FieldName::Email),
            source: Some(record.variant.clone()),
            created_at: Some(record.submitted_at.clone()),
            ..Default::default()
        }
    }
}

/// Raw query string wrapper used by `RegisterLeadPayload`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmInfo {
    #[serde(default)]
    pub raw: String,
}

/// Body of `POST /api/register-lead`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterLeadPayload {
    #[serde(default)]
    pub company_slug: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub whats_app_number: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_workplace: String,
    #[serde(default)]
    pub basic_ask: String,
    #[serde(default)]
    pub page_url: String,
    #[serde(default)]
    pub utm: UtmInfo,
}

impl From<&LeadRecord> for RegisterLeadPayload {
    fn from(record: &LeadRecord) -> Self {
        let fields = &record.fields;
        Self {
            company_slug: record.company_slug.clone(),
            company_name: record.company_name.clone(),
            whats_app_number: fields.get_or_empty(FieldName::Phone),
            user_name: fields.get_or_empty(FieldName::Name),
            user_workplace: fields.get_or_empty(FieldName::Workplace),
            basic_ask: fields.get_or_empty(FieldName::Intent),
            page_url: record.page_url.clone(),
            utm: UtmInfo {
                raw: record.utm_raw.clone(),
            },
        }
    }
}

/// Response body shared by the intake endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<AiSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntakeResponse {
    pub fn ok() -> Self {
        Self {
            ok: true,
            ..Default::default()
        }
    }

    pub fn with_summary(ai_summary: Option<AiSummary>) -> Self {
        Self {
            ok: true,
            ai_summary,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BrandConfig;
    use crate::field::FieldSnapshot;
    use crate::lead::PageContext;

    fn record(intake: IntakeFormat, fields: FieldSnapshot) -> LeadRecord {
        LeadRecord::new(
            "test",
            intake,
            &BrandConfig::default(),
            fields,
            &PageContext::new("https://tal.example/?utm_source=x", "?utm_source=x"),
        )
    }

    #[test]
    fn test_chat_onboarding_payload_uses_collected_fields() {
        let rec = record(
            IntakeFormat::ChatOnboarding,
            FieldSnapshot::from([
                (FieldName::Name, "Asha"),
                (FieldName::Phone, "9876543210"),
                (FieldName::Workplace, "Acme"),
            ]),
        );
        let json = IntakeFormat::ChatOnboarding.payload(&rec).unwrap();

        assert_eq!(json["name"], "Asha");
        assert_eq!(json["phone"], "9876543210");
        assert_eq!(json["company"], "Acme");
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn test_lead_payload_uses_camel_case_names() {
        let rec = record(
            IntakeFormat::Lead,
            FieldSnapshot::from([
                (FieldName::Persona, "I'm actively job hunting"),
                (FieldName::Phone, "9876543210"),
                (FieldName::Experience, "3-5 years"),
            ]),
        );
        let json = IntakeFormat::Lead.payload(&rec).unwrap();

        assert_eq!(json["selectedPersona"], "I'm actively job hunting");
        assert_eq!(json["whatsAppNumber"], "9876543210");
        assert_eq!(json["experienceBand"], "3-5 years");
        assert_eq!(json["fullName"], "");
        assert!(json.get("currentCTC").is_none());
    }

    #[test]
    fn test_lead_payload_reads_ctc_fields() {
        let payload: LeadPayload =
            serde_json::from_str(r#"{"fullName":"Asha","currentCTC":"12L","targetCTC":"18L"}"#).unwrap();
        assert_eq!(payload.current_ctc.as_deref(), Some("12L"));
        assert_eq!(payload.target_ctc.as_deref(), Some("18L"));
        assert_eq!(payload.field("fullName"), Some("Asha"));
        assert_eq!(payload.field("email"), Some(""));
        assert_eq!(payload.field("salary"), None);
    }

    #[test]
    fn test_register_lead_payload_carries_context() {
        let rec = record(
            IntakeFormat::RegisterLead,
            FieldSnapshot::from([(FieldName::Intent, "backend role in Pune")]),
        );
        let json = IntakeFormat::RegisterLead.payload(&rec).unwrap();

        assert_eq!(json["basicAsk"], "backend role in Pune");
        assert_eq!(json["companySlug"], BrandConfig::default().slug);
        assert_eq!(json["utm"]["raw"], "?utm_source=x");
    }

    #[test]
    fn test_intake_response_omits_empty_fields() {
        let json = serde_json::to_value(IntakeResponse::ok()).unwrap();
        assert_eq!(json, serde_json::json!({"ok": true}));
    }
}
