//! Core error types for studyplan-core.
//!
//! Every rejected intent surfaces as one of these errors and leaves the
//! session untouched, so callers can report the problem and let the user retry.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::SessionState;

/// Core error type for studyplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Session state machine errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Text-to-tasks extraction errors
    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

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

/// Validation errors raised at the boundary of the task queue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Task name is empty or whitespace only
    #[error("Task name must not be blank")]
    EmptyName,

    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors from the session controller when an intent does not fit the
/// current session state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Start requested with nothing to work on
    #[error("Cannot start a session with an empty task queue")]
    EmptyQueue,

    /// Intent not available in the current session state
    #[error("Operation requires a {expected} session, but the session is {actual}")]
    InvalidState {
        expected: SessionState,
        actual: SessionState,
    },

    /// A completion decision for the active task must be made first
    #[error("The active task is waiting for a complete/continue-later decision")]
    ConfirmationPending,

    /// Complete/continue-later requested without a finished work phase
    #[error("No work phase has finished for the active task yet")]
    NoPendingConfirmation,

    /// Skip requested on the last remaining task
    #[error("There is no later task to skip to")]
    NothingToSkip,
}

/// Failure of the text-to-tasks collaborator. Never mutates the task queue.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// No API key available in the configured environment variable
    #[error("No API key found in environment variable {env_var}")]
    MissingApiKey { env_var: String },

    /// Transport failure talking to the model service
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Model service answered with a non-success status
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// Response could not be turned into task records
    #[error("Could not parse tasks from response: {0}")]
    Format(String),
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

    /// Key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<serde_json::Error> for ExtractError {
    fn from(err: serde_json::Error) -> Self {
        ExtractError::Format(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
