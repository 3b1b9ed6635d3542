//! Unified path management for Tal configuration files.
//!
//! ```text
//! ~/.config/tal/               # Config directory
//! ├── brand.toml               # Deployment branding
//! ├── secret.json              # API keys and hosted store credentials
//! └── scripts/                 # Additional dialogue scripts
//!     └── <script-id>.toml
//! ```

use std::path::{Path, PathBuf};
use tal_core::config::{OpenAIConfig, SecretConfig, SupabaseConfig};

const APP_DIR: &str = "tal";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Path resolver for Tal configuration.
///
/// Without a base directory every path lives under the platform config
/// directory (`~/.config/tal` on Linux). With one, paths are resolved
/// relative to it, which keeps tests inside a temporary directory.
#[derive(Debug, Clone, Default)]
pub struct TalPaths {
    base_dir: Option<PathBuf>,
}

impl TalPaths {
    /// Creates a path resolver.
    ///
    /// # Arguments
    ///
    /// * `base_dir` - Override for the config directory, `None` for the platform default
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the Tal configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/tal/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    /// Returns the path to the secrets file.
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    /// Returns the path to the branding file.
    pub fn brand_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("brand.toml"))
    }

    /// Returns the directory holding additional dialogue scripts.
    pub fn scripts_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("scripts"))
    }

    /// Ensures the secret file exists, creating it with a template if it doesn't.
    ///
    /// # Security Note
    ///
    /// This function sets file permissions to 600 (user read/write only) on Unix systems.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to the secret file (existing or newly created)
    /// - `Err(std::io::Error)`: If file creation or permission setting fails
    pub fn ensure_secret_file(&self) -> Result<PathBuf, std::io::Error> {
        let secret_path = self
            .secret_file()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;

        if secret_path.exists() {
            return Ok(secret_path);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template_config = SecretConfig {
            openai: Some(OpenAIConfig {
                api_key: String::new(),
                model_name: Some("gpt-3.5-turbo".to_string()),
            }),
            supabase: Some(SupabaseConfig {
                url: String::new(),
                service_role_key: String::new(),
                table: Some("leads".to_string()),
            }),
        };

        let template_json =
            serde_json::to_string_pretty(&template_config).map_err(std::io::Error::other)?;
        std::fs::write(&secret_path, template_json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}
