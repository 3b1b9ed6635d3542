//! Optional AI summarization of a visitor's ask.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Short title and up to three tags describing a job seeker's ask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSummary {
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Third-party text summarization collaborator.
///
/// Summarization is best effort. Callers treat any error as "no summary" and
/// skip the call entirely when no summarizer is configured.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, basic_ask: &str, user_workplace: &str) -> Result<AiSummary>;
}
