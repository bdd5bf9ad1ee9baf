//! Error types for the smoke-test runner
//!
//! Only faults that should stop the run live here. Non-2xx responses and
//! transport failures are ordinary `Outcome` values, not errors.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the smoke-test runner
#[derive(Error, Debug)]
pub enum Error {
    // === Request Construction Errors ===
    #[error("Unsupported method: {0}. Expected one of GET, POST, PATCH, PUT, DELETE")]
    UnsupportedMethod(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an unsupported method error
    pub fn unsupported_method(method: &str) -> Self {
        Self::UnsupportedMethod(method.to_string())
    }

    /// Create a file read error for a path
    pub fn file_read(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }
}
