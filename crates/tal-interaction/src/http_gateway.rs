//! HttpLeadGateway - POSTs completed leads to the intake endpoints.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tal_core::error::{Result, TalError};
use tal_core::lead::wire::IntakeResponse;
use tal_core::lead::{IntakeFormat, LeadGateway, LeadRecord, SubmissionReceipt};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Gateway submitting each record in its variant's wire format.
///
/// The endpoint is `base_url` joined with the format's path
/// (e.g. `https://tal.example` + `/api/chat-onboarding`). One attempt per
/// call; any transport error or non-2xx status is a submission failure.
#[derive(Clone)]
pub struct HttpLeadGateway {
    client: Client,
    base_url: String,
}

impl HttpLeadGateway {
    /// Creates a gateway for the intake service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self::with_client(client, base_url)
    }

    /// Creates a gateway with a preconfigured HTTP client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the URL a record of `intake` format is posted to.
    pub fn endpoint(&self, intake: IntakeFormat) -> String {
        format!("{}{}", self.base_url, intake.path())
    }
}

#[async_trait]
impl LeadGateway for HttpLeadGateway {
    async fn submit(&self, record: &LeadRecord) -> Result<SubmissionReceipt> {
        let url = self.endpoint(record.intake);
        let payload = record.intake.payload(record)?;

        tracing::debug!("[HttpLeadGateway] Submitting lead {} to {}", record.id, url);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| TalError::submission(format!("Request to {url} failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                "[HttpLeadGateway] Intake endpoint answered {} for lead {}: {}",
                status,
                record.id,
                body
            );
            return Err(TalError::submission(format!(
                "Intake endpoint answered {}",
                status
            )));
        }

        // The acknowledgement body is informational; an unparsable one still counts as accepted.
        let ai_summary = response
            .json::<IntakeResponse>()
            .await
            .ok()
            .and_then(|body| body.ai_summary);

        tracing::info!("[HttpLeadGateway] Lead {} accepted", record.id);
        Ok(SubmissionReceipt { ai_summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::post;
    use std::sync::{Arc, Mutex};
    use tal_core::config::BrandConfig;
    use tal_core::field::{FieldName, FieldSnapshot};
    use tal_core::lead::PageContext;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn onboarding_record() -> LeadRecord {
        let fields = FieldSnapshot::from([
            (FieldName::Name, "Asha"),
            (FieldName::Phone, "9876543210"),
            (FieldName::Workplace, "Acme"),
        ]);
        LeadRecord::new(
            "chat-onboarding",
            IntakeFormat::ChatOnboarding,
            &BrandConfig::default(),
            fields,
            &PageContext::default(),
        )
    }

    #[test]
    fn test_endpoint_joins_base_and_path() {
        let gateway = HttpLeadGateway::new("https://tal.example/");
        assert_eq!(
            gateway.endpoint(IntakeFormat::RegisterLead),
            "https://tal.example/api/register-lead"
        );
    }

    #[tokio::test]
    async fn test_submit_posts_wire_payload() {
        let received = Arc::new(Mutex::new(Vec::<serde_json::Value>::new()));
        let recorder = Arc::clone(&received);
        let router = Router::new().route(
            "/api/chat-onboarding",
            post(move |axum::Json(body): axum::Json<serde_json::Value>| {
                let recorder = Arc::clone(&recorder);
                async move {
                    recorder.lock().unwrap().push(body);
                    axum::Json(serde_json::json!({"ok": true}))
                }
            }),
        );
        let gateway = HttpLeadGateway::new(serve(router).await);

        let receipt = gateway.submit(&onboarding_record()).await.unwrap();

        assert!(receipt.ai_summary.is_none());
        let bodies = received.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["name"], "Asha");
        assert_eq!(bodies[0]["phone"], "9876543210");
        assert_eq!(bodies[0]["company"], "Acme");
    }

    #[tokio::test]
    async fn test_submit_returns_ai_summary() {
        let router = Router::new().route(
            "/api/chat-onboarding",
            post(|| async {
                axum::Json(serde_json::json!({
                    "ok": true,
                    "aiSummary": {"title": "Backend roles", "tags": ["backend"]}
                }))
            }),
        );
        let gateway = HttpLeadGateway::new(serve(router).await);

        let receipt = gateway.submit(&onboarding_record()).await.unwrap();
        assert_eq!(receipt.ai_summary.unwrap().title, "Backend roles");
    }

    #[tokio::test]
    async fn test_non_success_status_is_submission_error() {
        let router = Router::new().route(
            "/api/chat-onboarding",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    axum::Json(serde_json::json!({"error": "Phone is required"})),
                )
            }),
        );
        let gateway = HttpLeadGateway::new(serve(router).await);

        let err = gateway.submit(&onboarding_record()).await.unwrap_err();
        assert!(err.is_submission());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_submission_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway = HttpLeadGateway::new(format!("http://{}", addr));
        let err = gateway.submit(&onboarding_record()).await.unwrap_err();
        assert!(err.is_submission());
    }
}
