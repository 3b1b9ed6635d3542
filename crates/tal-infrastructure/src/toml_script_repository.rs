//! TOML-backed ScriptRepository implementation
//!
//! Built-in scripts come from `get_default_scripts()`. Additional variants are
//! read from one TOML file per script:
//!
//! ```text
//! ~/.config/tal/
//! └── scripts/
//!     ├── <script-id-1>.toml
//!     └── <script-id-2>.toml
//! ```
//!
//! A configured script whose id matches a built-in one replaces it, so a
//! deployment can reword a variant without a rebuild.

use crate::paths::TalPaths;
use std::path::{Path, PathBuf};
use tal_core::dialogue::{DialogueScript, ScriptRepository, get_default_scripts};
use tal_core::error::{Result, TalError};

/// Script repository merging built-in variants with TOML files.
#[derive(Debug, Clone)]
pub struct TomlScriptRepository {
    scripts_dir: PathBuf,
}

impl TomlScriptRepository {
    /// Creates a repository reading `~/.config/tal/scripts/`.
    pub fn default_location() -> Result<Self> {
        let scripts_dir = TalPaths::default()
            .scripts_dir()
            .map_err(|e| TalError::config(e.to_string()))?;
        Ok(Self::new(scripts_dir))
    }

    /// Creates a repository reading scripts from `scripts_dir`.
    ///
    /// # Arguments
    ///
    /// * `scripts_dir` - Directory of `*.toml` scripts; it need not exist
    pub fn new(scripts_dir: impl Into<PathBuf>) -> Self {
        Self {
            scripts_dir: scripts_dir.into(),
        }
    }

    pub fn scripts_dir(&self) -> &Path {
        &self.scripts_dir
    }

    /// Reads and validates every configured script, sorted by id.
    ///
    /// Any invalid file fails the whole load: serving a half-configured set
    /// of variants would hide the mistake.
    async fn load_configured(&self) -> Result<Vec<DialogueScript>> {
        if !tokio::fs::try_exists(&self.scripts_dir).await? {
            return Ok(Vec::new());
        }

        let mut scripts = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.scripts_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }

            let content = tokio::fs::read_to_string(&path).await?;
            let script = DialogueScript::from_toml_str(&content).map_err(|e| {
                TalError::config(format!("Invalid script file {}: {}", path.display(), e))
            })?;
            tracing::debug!(
                "[TomlScriptRepository] Loaded script '{}' from {}",
                script.id(),
                path.display()
            );
            scripts.push(script);
        }

        scripts.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(scripts)
    }
}

#[async_trait::async_trait]
impl ScriptRepository for TomlScriptRepository {
    async fn find_by_id(&self, script_id: &str) -> Result<Option<DialogueScript>> {
        // Configured scripts shadow built-in ones
        if let Some(script) = self
            .load_configured()
            .await?
            .into_iter()
            .find(|s| s.id() == script_id)
        {
            return Ok(Some(script));
        }

        Ok(get_default_scripts()
            .into_iter()
            .find(|s| s.id() == script_id))
    }

    async fn get_all(&self) -> Result<Vec<DialogueScript>> {
        let mut configured = self.load_configured().await?;

        let mut scripts: Vec<DialogueScript> = get_default_scripts()
            .into_iter()
            .map(|builtin| {
                match configured.iter().position(|s| s.id() == builtin.id()) {
                    Some(pos) => {
                        tracing::info!(
                            "[TomlScriptRepository] Script '{}' overridden by configuration",
                            builtin.id()
                        );
                        configured.remove(pos)
                    }
                    None => builtin,
                }
            })
            .collect();

        scripts.extend(configured);
        Ok(scripts)
    }
}
