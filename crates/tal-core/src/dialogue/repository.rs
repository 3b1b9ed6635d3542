//! Dialogue script repository trait.

use super::script::DialogueScript;
use crate::error::Result;

/// Source of dialogue scripts available to the funnel.
///
/// Implementations combine the built-in variants with any configured
/// ones (e.g. TOML files). Scripts are immutable once loaded.
#[async_trait::async_trait]
pub trait ScriptRepository: Send + Sync {
    /// Finds a script by its variant id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(DialogueScript))`: Script found
    /// - `Ok(None)`: No script with this id
    /// - `Err(TalError)`: A configured script could not be read
    async fn find_by_id(&self, script_id: &str) -> Result<Option<DialogueScript>>;

    /// Retrieves every available script.
    async fn get_all(&self) -> Result<Vec<DialogueScript>>;
}
