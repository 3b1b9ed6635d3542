//! OpenAISummarizer - OpenAI chat completions turning a job seeker's ask into
//! a short title and tags.
//!
//! Built from the `openai` section of the loaded secrets, which already
//! includes the environment fallback.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tal_core::config::SecretConfig;
use tal_core::error::{Result, TalError};
use tal_core::lead::{AiSummary, Summarizer};

const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 150;
const MAX_TAGS: usize = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const SYSTEM_PROMPT: &str = "You are an assistant that summarizes a job seeker's ask into a short title and up to 3 tags. Return JSON only with format: {\"title\": \"...\", \"tags\": [\"...\", \"...\", \"...\"]}";

/// Summarizer implementation that talks to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAISummarizer {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAISummarizer {
    /// Creates a new summarizer with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            endpoint: BASE_URL.to_string(),
        }
    }

    /// Creates a summarizer from loaded secrets.
    ///
    /// Returns `None` when no OpenAI key is configured; summarization is then
    /// skipped entirely.
    pub fn from_secrets(secrets: &SecretConfig) -> Option<Self> {
        let openai = secrets.openai.as_ref()?;
        if openai.api_key.trim().is_empty() {
            return None;
        }

        let model = openai
            .model_name
            .clone()
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into());
        Some(Self::new(openai.api_key.clone(), model))
    }

    /// Overrides the chat completions endpoint (proxies, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, basic_ask: &str, user_workplace: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!(
                        "Job seeker's ask: \"{}\"\nCurrent workplace: \"{}\"",
                        basic_ask, user_workplace
                    ),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| TalError::internal(format!("OpenAI API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| TalError::internal(format!("Failed to parse OpenAI response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl Summarizer for OpenAISummarizer {
    async fn summarize(&self, basic_ask: &str, user_workplace: &str) -> Result<AiSummary> {
        let request = self.build_request(basic_ask, user_workplace);
        let content = self.send_request(&request).await?;

        parse_summary_content(&content).inspect_err(|_| {
            tracing::warn!("[OpenAISummarizer] Failed to parse AI response: {}", content);
        })
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| TalError::internal("OpenAI API returned no content in the response"))
}

fn map_http_error(status: StatusCode, body: String) -> TalError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    TalError::internal(format!("OpenAI API error ({}): {}", status.as_u16(), message))
}

/// Parses the model's reply into a summary.
///
/// Models occasionally wrap JSON in a Markdown code fence; the fence is
/// stripped. Tags beyond the third are dropped.
fn parse_summary_content(content: &str) -> Result<AiSummary> {
    let trimmed = content.trim();
    let json = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let mut summary: AiSummary = serde_json::from_str(json)?;
    if summary.title.trim().is_empty() {
        return Err(TalError::internal("AI summary has an empty title"));
    }
    summary.tags.truncate(MAX_TAGS);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::HeaderMap;
    use axum::routing::post;
    use std::sync::{Arc, Mutex};
    use tal_core::config::OpenAIConfig;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v1/chat/completions", addr)
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
    }

    #[test]
    fn test_parse_plain_json() {
        let summary =
            parse_summary_content(r#"{"title": "Backend roles", "tags": ["rust", "remote"]}"#)
                .unwrap();
        assert_eq!(summary.title, "Backend roles");
        assert_eq!(summary.tags, vec!["rust", "remote"]);
    }

    #[test]
    fn test_parse_fenced_json_and_caps_tags() {
        let content = "```json\n{\"title\": \"Data roles\", \"tags\": [\"a\", \"b\", \"c\", \"d\"]}\n```";
        let summary = parse_summary_content(content).unwrap();
        assert_eq!(summary.title, "Data roles");
        assert_eq!(summary.tags.len(), 3);
    }

    #[test]
    fn test_parse_rejects_malformed_content() {
        assert!(parse_summary_content("Sure! Here's a summary: backend roles").is_err());
        assert!(parse_summary_content(r#"{"title": "  ", "tags": []}"#).is_err());
    }

    #[test]
    fn test_map_http_error_prefers_api_message() {
        let err = map_http_error(
            StatusCode::UNAUTHORIZED,
            r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#
                .to_string(),
        );
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("Incorrect API key provided"));

        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert!(err.to_string().contains("upstream down"));
    }

    #[test]
    fn test_from_secrets() {
        assert!(OpenAISummarizer::from_secrets(&SecretConfig::default()).is_none());

        let secrets = SecretConfig {
            openai: Some(OpenAIConfig {
                api_key: "sk-test".to_string(),
                model_name: None,
            }),
            supabase: None,
        };
        let summarizer = OpenAISummarizer::from_secrets(&secrets).unwrap();
        assert_eq!(summarizer.model(), "gpt-3.5-turbo");
    }

    #[test]
    fn test_request_carries_ask_and_workplace() {
        let request = OpenAISummarizer::new("sk-test", "gpt-3.5-turbo")
            .build_request("backend roles in Bengaluru", "Acme");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(
            body["messages"][1]["content"],
            "Job seeker's ask: \"backend roles in Bengaluru\"\nCurrent workplace: \"Acme\""
        );
        assert_eq!(body["max_tokens"], 150);
    }

    #[tokio::test]
    async fn test_summarize_against_local_endpoint() {
        let seen_auth = Arc::new(Mutex::new(None::<String>));
        let recorder = Arc::clone(&seen_auth);
        let router = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap| {
                let recorder = Arc::clone(&recorder);
                async move {
                    *recorder.lock().unwrap() = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    axum::Json(completion(
                        r#"{"title": "Senior backend roles", "tags": ["backend", "senior"]}"#,
                    ))
                }
            }),
        );
        let endpoint = serve(router).await;

        let summary = OpenAISummarizer::new("sk-test", "gpt-3.5-turbo")
            .with_endpoint(endpoint)
            .summarize("senior backend roles", "Acme")
            .await
            .unwrap();

        assert_eq!(summary.title, "Senior backend roles");
        assert_eq!(seen_auth.lock().unwrap().as_deref(), Some("Bearer sk-test"));
    }

    #[tokio::test]
    async fn test_summarize_reports_http_errors() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                (
                    axum::http::StatusCode::TOO_MANY_REQUESTS,
                    axum::Json(serde_json::json!({"error": {"message": "Rate limit reached"}})),
                )
            }),
        );
        let endpoint = serve(router).await;

        let err = OpenAISummarizer::new("sk-test", "gpt-3.5-turbo")
            .with_endpoint(endpoint)
            .summarize("anything", "")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Rate limit reached"));
    }
}
