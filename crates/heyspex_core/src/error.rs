//! Error types for the HeySpex workspace shell.
//!
//! Layout preferences are a best-effort convenience feature: nothing in the
//! layout engine is allowed to throw past its own boundary. Errors defined
//! here surface at the service layer (storage, config, geometry measurement)
//! and are absorbed and logged by callers.

use thiserror::Error;

/// Main error type for HeySpex.
#[derive(Debug, Error)]
pub enum HeySpexError {
    /// Local preference storage error.
    #[error("Storage error: {message}")]
    Storage {
        /// Human-readable error message.
        message: String,
        /// Actionable hint for the user.
        hint: Option<String>,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Config error: {message}")]
    Config {
        /// Human-readable error message.
        message: String,
    },

    /// Viewport or zone measurement error.
    #[error("Geometry error: {message}")]
    Geometry {
        /// Human-readable error message.
        message: String,
    },

    /// Unexpected internal error.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl HeySpexError {
    // ========== Constructors ==========

    /// Create a new storage error.
    pub fn storage(message: impl Into<String>, hint: Option<&str>) -> Self {
        Self::Storage { message: message.into(), hint: hint.map(String::from), source: None }
    }

    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create a new geometry error.
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::Geometry { message: message.into() }
    }

    /// Create a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), source: None }
    }

    // ========== Methods ==========

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Storage { .. } => "Storage",
            Self::Config { .. } => "Config",
            Self::Geometry { .. } => "Geometry",
            Self::Internal { .. } => "Internal",
        }
    }

    /// Get actionable hint for the user.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Storage { hint, .. } => hint.as_deref(),
            Self::Config { .. } => None,
            Self::Geometry { .. } => None,
            Self::Internal { .. } => Some("Please report this issue"),
        }
    }
}

// ========== Error Conversions ==========

/// Convert from rusqlite::Error to HeySpexError.
impl From<rusqlite::Error> for HeySpexError {
    fn from(err: rusqlite::Error) -> Self {
        HeySpexError::Storage {
            message: err.to_string(),
            hint: Some("The preferences database may be corrupted".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

/// Convert from std::io::Error to HeySpexError.
impl From<std::io::Error> for HeySpexError {
    fn from(err: std::io::Error) -> Self {
        HeySpexError::Storage {
            message: err.to_string(),
            hint: Some("Check file permissions and disk space".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

/// Convert from serde_json::Error to HeySpexError.
impl From<serde_json::Error> for HeySpexError {
    fn from(err: serde_json::Error) -> Self {
        HeySpexError::Storage {
            message: format!("JSON error: {err}"),
            hint: Some("Stored preference data may be corrupted".to_string()),
            source: Some(Box::new(err)),
        }
    }
}
