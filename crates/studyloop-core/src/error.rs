//! Core error types for studyloop-core.
//!
//! The analytics engines themselves never fail: malformed records are dropped
//! and thin history falls through to documented defaults. The errors below
//! belong to the seams around them (the attempt log, configuration, session
//! bookkeeping and the question bank).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studyloop-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Attempt log / profile store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Question bank errors
    #[error("Question bank error: {0}")]
    QuestionBank(#[from] QuestionBankError),
}

/// Errors raised by an [`ActivityLog`](crate::ActivityLog) or the
/// [`ProfileRegistry`](crate::ProfileRegistry).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store cannot be reached (or its lock is poisoned)
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// No mastery profile exists for the pair
    #[error("mastery profile not found for user '{user_id}' in '{subject}'")]
    ProfileNotFound { user_id: String, subject: String },

    /// Failed to read a log file
    #[error("failed to read activity log at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Log content is not a JSON array of attempts
    #[error("failed to parse activity log: {0}")]
    Parse(#[from] serde_json::Error),
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

    /// Key does not name a configuration field
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// Session was already completed
    #[error("learning session {0} is not active")]
    SessionNotActive(uuid::Uuid),

    /// Session has no topic to select questions for
    #[error("learning session {0} has no topic")]
    MissingTopic(uuid::Uuid),

    /// Focus session was already ended
    #[error("focus session {0} has already ended")]
    AlreadyEnded(uuid::Uuid),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Question bank errors.
#[derive(Error, Debug, PartialEq)]
pub enum QuestionBankError {
    /// Neither the subtopic key nor the topic key has questions
    #[error("no questions found for {key}")]
    NoQuestions { key: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
