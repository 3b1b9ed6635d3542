//! Lead repository backed by a hosted Supabase table.
//!
//! Talks to the PostgREST interface directly:
//!
//! - insert: `POST {url}/rest/v1/{table}` with `Prefer: return=representation`
//! - list: `GET {url}/rest/v1/{table}?select=*&order=created_at.desc[&company_slug=eq.{slug}]`
//!
//! Both carry the service-role key in the `apikey` and `Authorization` headers.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Duration;
use tal_core::config::{SecretConfig, SupabaseConfig};
use tal_core::error::{Result, TalError};
use tal_core::lead::{LeadRepository, StoredLead};

const DEFAULT_TABLE: &str = "leads";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Supabase-backed `LeadRepository`.
pub struct SupabaseLeadRepository {
    client: reqwest::Client,
    base_url: String,
    service_role_key: String,
    table: String,
}

impl SupabaseLeadRepository {
    /// Creates a repository from explicit configuration.
    pub fn new(config: &SupabaseConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            service_role_key: config.service_role_key.clone(),
            table: config
                .table
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
        }
    }

    /// Creates a repository if the secrets carry a usable Supabase section.
    ///
    /// # Returns
    ///
    /// - `Some(SupabaseLeadRepository)`: URL and service-role key are set
    /// - `None`: The hosted store is not configured
    pub fn from_secrets(secrets: &SecretConfig) -> Option<Self> {
        let config = secrets.supabase.as_ref()?;
        if config.url.trim().is_empty() || config.service_role_key.trim().is_empty() {
            tracing::warn!("[SupabaseLeadRepository] Supabase section is incomplete, ignoring it");
            return None;
        }
        Some(Self::new(config))
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn auth_headers(&self) -> Result<HeaderMap> {
        let invalid = |e: reqwest::header::InvalidHeaderValue| {
            TalError::config(format!("Invalid Supabase service role key: {}", e))
        };

        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(&self.service_role_key).map_err(invalid)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.service_role_key)).map_err(invalid)?,
        );
        Ok(headers)
    }

    /// Builds the insert request for one lead.
    pub fn insert_request(&self, lead: &StoredLead) -> Result<reqwest::Request> {
        self.client
            .post(self.table_url())
            .headers(self.auth_headers()?)
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=representation")
            .json(&[lead])
            .build()
            .map_err(|e| TalError::internal(format!("Failed to build Supabase request: {}", e)))
    }

    /// Builds the list request, newest first, optionally for one company.
    pub fn list_request(&self, company_slug: Option<&str>) -> Result<reqwest::Request> {
        let mut query = vec![
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
        ];
        if let Some(slug) = company_slug {
            query.push(("company_slug", format!("eq.{}", slug)));
        }

        self.client
            .get(self.table_url())
            .headers(self.auth_headers()?)
            .query(&query)
            .build()
            .map_err(|e| TalError::internal(format!("Failed to build Supabase request: {}", e)))
    }

    async fn execute(&self, request: reqwest::Request) -> Result<Vec<StoredLead>> {
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| TalError::internal(format!("Supabase request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TalError::internal(format!(
                "Supabase returned {}: {}",
                status, body
            )));
        }

        response
            .json::<Vec<StoredLead>>()
            .await
            .map_err(|e| TalError::internal(format!("Failed to parse Supabase response: {}", e)))
    }
}

#[async_trait::async_trait]
impl LeadRepository for SupabaseLeadRepository {
    async fn save(&self, lead: &StoredLead) -> Result<StoredLead> {
        let request = self.insert_request(lead)?;
        let rows = self.execute(request).await.inspect_err(|e| {
            tracing::error!("[SupabaseLeadRepository] Failed to save lead: {}", e);
        })?;

        tracing::info!(
            "[SupabaseLeadRepository] Saved lead for company '{}'",
            lead.company_slug
        );
        Ok(rows.into_iter().next().unwrap_or_else(|| lead.clone()))
    }

    async fn list(&self, company_slug: Option<&str>) -> Result<Vec<StoredLead>> {
        let request = self.list_request(company_slug)?;
        match self.execute(request).await {
            Ok(rows) => Ok(rows),
            Err(e) => {
                // Listing is an admin convenience; a failing store reads as empty.
                tracing::error!("[SupabaseLeadRepository] Error fetching leads: {}", e);
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository(table: Option<&str>) -> SupabaseLeadRepository {
        SupabaseLeadRepository::new(&SupabaseConfig {
            url: "https://xyz.supabase.co/".to_string(),
            service_role_key: "service-key".to_string(),
            table: table.map(str::to_string),
        })
    }

    fn lead() -> StoredLead {
        StoredLead {
            company_slug: "acme".to_string(),
            company_name: "Acme Corporation".to_string(),
            whatsapp_number: "9876543210".to_string(),
            user_name: "Asha".to_string(),
            user_workplace: "Acme".to_string(),
            basic_ask: "backend roles".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_request_shape() {
        let request = repository(None).insert_request(&lead()).unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "https://xyz.supabase.co/rest/v1/leads");
        assert_eq!(request.headers()["apikey"], "service-key");
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer service-key");
        assert_eq!(request.headers()["Prefer"], "return=representation");

        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        let rows: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(rows[0]["company_slug"], "acme");
        assert_eq!(rows[0]["whatsapp_number"], "9876543210");
        assert!(rows[0].get("id").is_none());
    }

    #[test]
    fn test_list_request_filters_by_company() {
        let request = repository(Some("funnel_leads"))
            .list_request(Some("acme"))
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().path(), "/rest/v1/funnel_leads");
        let query: Vec<(String, String)> = request.url().query_pairs().into_owned().collect();
        assert!(query.contains(&("order".to_string(), "created_at.desc".to_string())));
        assert!(query.contains(&("company_slug".to_string(), "eq.acme".to_string())));
    }

    #[test]
    fn test_list_request_without_filter() {
        let request = repository(None).list_request(None).unwrap();
        assert!(!request.url().as_str().contains("company_slug"));
    }

    #[test]
    fn test_from_secrets_requires_url_and_key() {
        assert!(SupabaseLeadRepository::from_secrets(&SecretConfig::default()).is_none());

        let incomplete = SecretConfig {
            openai: None,
            supabase: Some(SupabaseConfig {
                url: "https://xyz.supabase.co".to_string(),
                service_role_key: " ".to_string(),
                table: None,
            }),
        };
        assert!(SupabaseLeadRepository::from_secrets(&incomplete).is_none());
    }
}
