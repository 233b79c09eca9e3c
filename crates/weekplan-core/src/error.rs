//! Core error types for weekplan-core.
//!
//! Policy rejections from the replan coordinator (already running, cooldown,
//! nothing to replan) are NOT errors -- they are expected control-flow
//! outcomes and live in [`crate::replan::ReplanOutcome`]. Everything here is
//! a genuine fault.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for weekplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Calendar provider errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Optimizer backend errors
    #[error("Optimizer error: {0}")]
    Optimizer(#[from] OptimizerError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors from the calendar data provider.
///
/// Each failure aborts the single operation that raised it; coordinator
/// state is never left inconsistent by a provider fault.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// HTTP transport failure
    #[error("Calendar API error: {0}")]
    Api(String),

    /// Network error from the HTTP client
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Event not found on the remote calendar
    #[error("Event not found: {0}")]
    EventNotFound(String),

    /// Missing or rejected credentials
    #[error("Authentication required")]
    AuthenticationRequired,
}

/// Errors from the AI/heuristic optimizer backend.
#[derive(Error, Debug)]
pub enum OptimizerError {
    /// The model/backend is not loaded yet
    #[error("Optimizer backend unavailable: {0}")]
    Unavailable(String),

    /// The backend ran but produced an unusable result
    #[error("Optimizer failed: {0}")]
    Failed(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end ({end}) must be greater than start ({start})")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
