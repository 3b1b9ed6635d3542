//! Secret configuration file storage.
//!
//! Provides loading of secret configuration from ~/.config/tal/secret.json,
//! with environment variables filling in sections the file leaves out.

use crate::paths::TalPaths;
use std::fs;
use std::path::PathBuf;
use tal_core::config::{OpenAIConfig, SecretConfig, SupabaseConfig};

/// Errors that can occur during secret storage operations.
#[derive(Debug)]
pub enum SecretStorageError {
    /// Configuration file not found.
    NotFound(PathBuf),
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing error.
    ParseError(serde_json::Error),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for SecretStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretStorageError::NotFound(path) => {
                write!(f, "Configuration file not found at: {}", path.display())
            }
            SecretStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            SecretStorageError::ParseError(e) => write!(f, "JSON parse error: {}", e),
            SecretStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine config directory")
            }
        }
    }
}

impl std::error::Error for SecretStorageError {}

impl From<std::io::Error> for SecretStorageError {
    fn from(e: std::io::Error) -> Self {
        SecretStorageError::IoError(e)
    }
}

impl From<serde_json::Error> for SecretStorageError {
    fn from(e: serde_json::Error) -> Self {
        SecretStorageError::ParseError(e)
    }
}

/// Storage for the secret configuration file (secret.json).
///
/// Read-only: secrets are provisioned by the operator, never written back.
///
/// # Security Note
///
/// The file is plaintext JSON and should have 600 permissions.
#[derive(Debug, Clone)]
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Creates a new SecretStorage with the default path (~/.config/tal/secret.json).
    ///
    /// # Returns
    ///
    /// - `Ok(SecretStorage)`: Successfully determined config path
    /// - `Err(SecretStorageError::ConfigDirNotFound)`: Could not find config directory
    pub fn new() -> Result<Self, SecretStorageError> {
        let path = TalPaths::default()
            .secret_file()
            .map_err(|_| SecretStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a new SecretStorage with a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the secret configuration from the JSON file.
    ///
    /// # Returns
    ///
    /// - `Ok(SecretConfig)`: Successfully loaded and parsed
    /// - `Err(SecretStorageError::NotFound)`: File doesn't exist
    /// - `Err(SecretStorageError::IoError)`: Failed to read file
    /// - `Err(SecretStorageError::ParseError)`: Invalid JSON format
    pub fn load(&self) -> Result<SecretConfig, SecretStorageError> {
        if !self.path.exists() {
            return Err(SecretStorageError::NotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&content)?;

        Ok(config)
    }

    /// Loads the file if present and fills missing sections from the process
    /// environment.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load_with_env(&self) -> Result<SecretConfig, SecretStorageError> {
        let config = match self.load() {
            Ok(config) => config,
            Err(SecretStorageError::NotFound(path)) => {
                tracing::debug!(
                    "[SecretStorage] No secret file at {}, using environment only",
                    path.display()
                );
                SecretConfig::default()
            }
            Err(e) => return Err(e),
        };

        Ok(apply_env_fallback(config, |key| std::env::var(key).ok()))
    }

    /// Returns the path to the secret file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

/// Fills sections absent from `config` using `lookup` (normally `std::env::var`).
///
/// File values always win. Blank variables count as unset.
///
/// | Section    | Variables                                                        |
/// |------------|------------------------------------------------------------------|
/// | `openai`   | `OPENAI_API_KEY`, `OPENAI_MODEL_NAME`                            |
/// | `supabase` | `SUPABASE_URL` or `NEXT_PUBLIC_SUPABASE_URL`, `SUPABASE_SERVICE_ROLE_KEY` |
pub fn apply_env_fallback<F>(mut config: SecretConfig, lookup: F) -> SecretConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if config.openai.is_none() {
        config.openai = get("OPENAI_API_KEY").map(|api_key| OpenAIConfig {
            api_key,
            model_name: get("OPENAI_MODEL_NAME"),
        });
    }

    if config.supabase.is_none() {
        let url = get("SUPABASE_URL").or_else(|| get("NEXT_PUBLIC_SUPABASE_URL"));
        if let (Some(url), Some(service_role_key)) = (url, get("SUPABASE_SERVICE_ROLE_KEY")) {
            config.supabase = Some(SupabaseConfig {
                url,
                service_role_key,
                table: None,
            });
        }
    }

    config
}
