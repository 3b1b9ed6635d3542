//! Shared server state.

use anyhow::Context;
use std::sync::Arc;
use tal_application::{IntakeRules, LeadIntakeService};
use tal_core::config::BrandConfig;
use tal_core::lead::{LeadRepository, Summarizer};
use tal_infrastructure::{BrandStorage, LogLeadRepository, SecretStorage, SupabaseLeadRepository};
use tal_interaction::OpenAISummarizer;

/// Collaborators shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<LeadIntakeService>,
    pub brand: Arc<BrandConfig>,
}

impl AppState {
    pub fn new(intake: LeadIntakeService, brand: BrandConfig) -> Self {
        Self {
            intake: Arc::new(intake),
            brand: Arc::new(brand),
        }
    }

    /// Builds the state from `~/.config/tal/` and the environment.
    ///
    /// Missing optional credentials degrade features: no OpenAI key skips
    /// summaries, no Supabase section logs leads instead of storing them.
    pub fn from_config() -> anyhow::Result<Self> {
        let brand = BrandStorage::new()
            .context("Failed to resolve brand file path")?
            .load()
            .context("Failed to load brand.toml")?;

        let secrets = SecretStorage::new()
            .context("Failed to resolve secret file path")?
            .load_with_env()
            .context("Failed to load secret.json")?;

        let summarizer: Option<Arc<dyn Summarizer>> = match OpenAISummarizer::from_secrets(&secrets) {
            Some(summarizer) => {
                tracing::info!("AI summaries enabled (model {})", summarizer.model());
                Some(Arc::new(summarizer))
            }
            None => {
                tracing::info!("OPENAI_API_KEY not set, AI summaries disabled");
                None
            }
        };

        let repository: Arc<dyn LeadRepository> = match SupabaseLeadRepository::from_secrets(&secrets) {
            Some(repository) => Arc::new(repository),
            None => {
                tracing::warn!("Supabase not configured, leads will only be logged");
                Arc::new(LogLeadRepository)
            }
        };

        let intake = LeadIntakeService::new(IntakeRules::default(), summarizer, repository);
        tracing::info!("Serving leads for {} ({})", brand.name, brand.slug);
        Ok(Self::new(intake, brand))
    }
}
