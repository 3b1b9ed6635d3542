//! Branding file storage (brand.toml).

use crate::paths::TalPaths;
use std::fs;
use std::path::PathBuf;
use tal_core::config::BrandConfig;

/// Errors that can occur while reading brand.toml.
#[derive(Debug)]
pub enum BrandStorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parsing error.
    TomlParseError(toml::de::Error),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for BrandStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrandStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            BrandStorageError::TomlParseError(e) => write!(f, "TOML parse error: {}", e),
            BrandStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine config directory")
            }
        }
    }
}

impl std::error::Error for BrandStorageError {}

impl From<std::io::Error> for BrandStorageError {
    fn from(e: std::io::Error) -> Self {
        BrandStorageError::IoError(e)
    }
}

impl From<toml::de::Error> for BrandStorageError {
    fn from(e: toml::de::Error) -> Self {
        BrandStorageError::TomlParseError(e)
    }
}

/// Read-only storage for deployment branding.
///
/// A missing file yields `BrandConfig::default()`; keys absent from the file
/// keep their default values.
#[derive(Debug, Clone)]
pub struct BrandStorage {
    path: PathBuf,
}

impl BrandStorage {
    /// Creates a BrandStorage with the default path (~/.config/tal/brand.toml).
    pub fn new() -> Result<Self, BrandStorageError> {
        let path = TalPaths::default()
            .brand_file()
            .map_err(|_| BrandStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a BrandStorage with a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the branding configuration.
    pub fn load(&self) -> Result<BrandConfig, BrandStorageError> {
        if !self.path.exists() {
            tracing::debug!(
                "[BrandStorage] No brand file at {}, using defaults",
                self.path.display()
            );
            return Ok(BrandConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Returns the path to the brand file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
