//! Error types for the Tal funnel.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the whole Tal workspace.
///
/// Validation failures are recoverable (the dialogue re-prompts), submission
/// failures degrade the terminal message, and configuration failures disable
/// optional features. None of them is fatal to a chat session.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TalError {
    /// The user submitted nothing but whitespace.
    #[error("Input is empty")]
    EmptyInput,

    /// Malformed or missing user input.
    #[error("Validation failed at '{step}': {message}")]
    Validation { step: String, message: String },

    /// An option was selected on a step that does not offer options.
    #[error("Step '{step}' does not accept a choice")]
    NotAChoice { step: String },

    /// The operation is not allowed in the session's current state.
    #[error("Invalid session state: {0}")]
    InvalidState(String),

    /// The dialogue script table is malformed.
    #[error("Invalid dialogue script '{script}': {message}")]
    Script { script: String, message: String },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Lead submission failed (transport or non-success status).
    #[error("Submission failed: {0}")]
    Submission(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TalError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error for the given step.
    pub fn validation(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            step: step.into(),
            message: message.into(),
        }
    }

    /// Creates a Script error
    pub fn script(script: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Script {
            script: script.into(),
            message: message.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Submission error
    pub fn submission(message: impl Into<String>) -> Self {
        Self::Submission(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an InvalidState error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a submission error
    pub fn is_submission(&self) -> bool {
        matches!(self, Self::Submission(_))
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true for errors caused by the visitor's input rather than by
    /// the system.
    ///
    /// The HTTP layer maps these to 4xx responses.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput | Self::Validation { .. } | Self::NotAChoice { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for TalError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TalError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TalError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for TalError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (used at bootstrap edges)
impl From<anyhow::Error> for TalError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Conversion from String (for error messages)
impl From<String> for TalError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, TalError>`.
pub type Result<T> = std::result::Result<T, TalError>;
