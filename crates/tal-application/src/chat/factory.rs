use super::session::ChatSession;
use std::sync::Arc;
use tal_core::config::BrandConfig;
use tal_core::dialogue::{DialogueEngine, ScriptRepository};
use tal_core::error::{Result, TalError};
use tal_core::lead::{LeadGateway, PageContext};
use tal_core::scheduler::Scheduler;

/// Factory for creating `ChatSession` instances by variant id.
///
/// Holds the collaborators every session of a deployment shares: the
/// script source, branding, the scheduler and the submission gateway.
pub struct ChatSessionFactory {
    scripts: Arc<dyn ScriptRepository>,
    brand: Arc<BrandConfig>,
    scheduler: Arc<dyn Scheduler>,
    gateway: Arc<dyn LeadGateway>,
}

impl ChatSessionFactory {
    /// Creates a new ChatSessionFactory.
    ///
    /// # Arguments
    ///
    /// * `scripts` - Source of dialogue scripts
    /// * `brand` - Branding used in scripted lines and lead records
    /// * `scheduler` - Scheduler for typing delays
    /// * `gateway` - Destination of completed leads
    pub fn new(
        scripts: Arc<dyn ScriptRepository>,
        brand: Arc<BrandConfig>,
        scheduler: Arc<dyn Scheduler>,
        gateway: Arc<dyn LeadGateway>,
    ) -> Self {
        Self {
            scripts,
            brand,
            scheduler,
            gateway,
        }
    }

    /// Creates a session for `variant`. The session is not started yet.
    ///
    /// # Errors
    ///
    /// Returns `TalError::NotFound` if no script has this id.
    pub async fn create(&self, variant: &str, context: PageContext) -> Result<ChatSession> {
        let script = self
            .scripts
            .find_by_id(variant)
            .await?
            .ok_or_else(|| TalError::not_found("dialogue script", variant))?;

        tracing::debug!("[ChatSessionFactory] Creating session for variant '{}'", variant);

        let engine = DialogueEngine::new(Arc::new(script), Arc::clone(&self.brand));
        Ok(ChatSession::new(
            engine,
            context,
            Arc::clone(&self.scheduler),
            Arc::clone(&self.gateway),
        ))
    }

    /// Ids of every variant the factory can create.
    pub async fn variants(&self) -> Result<Vec<String>> {
        Ok(self
            .scripts
            .get_all()
            .await?
            .iter()
            .map(|s| s.id().to_string())
            .collect())
    }
}
