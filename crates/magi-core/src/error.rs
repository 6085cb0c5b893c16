//! Core error types for magi-core.
//!
//! This module defines the error hierarchy using thiserror. Backend
//! failures, input validation and missing-session conditions are kept
//! distinguishable so callers can decide what to show the user.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for magi-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence collaborator errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Identity provider errors
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A mutation was attempted with nobody signed in.
    #[error("No authenticated user: sign in before changing data")]
    NotSignedIn,

    /// The targeted record does not exist in the current snapshot.
    #[error("{collection} not found: {id}")]
    NotFound { collection: &'static str, id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a storage backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the SQLite database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A uniqueness constraint rejected an insert
    #[error("Constraint violation in {collection}: {message}")]
    Constraint {
        collection: &'static str,
        message: String,
    },

    /// The remote backend answered with a non-success status
    #[error("Backend returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Local snapshot could not be read or written
    #[error("Snapshot error at {path}: {message}")]
    Snapshot { path: PathBuf, message: String },

    /// A row could not be decoded into the canonical schema
    #[error("Failed to decode {collection} record: {message}")]
    Decode {
        collection: &'static str,
        message: String,
    },
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

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),

    /// Seed plan is not valid TOML or does not match the plan layout
    #[error("Invalid seed plan: {0}")]
    InvalidPlan(#[from] toml::de::Error),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Identity collaborator errors.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Credentials rejected by the provider
    #[error("Sign-in rejected: {0}")]
    Rejected(String),

    /// The provider could not be reached
    #[error("Identity provider unreachable: {0}")]
    Transport(String),

    /// Operation requires an active session
    #[error("No active session")]
    NoSession,

    /// The provider does not implement this operation
    #[error("{0} is not supported by this identity provider")]
    Unsupported(&'static str),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Malformed email address
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Password shorter than the minimum
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    /// Username outside of the accepted length range
    #[error("Username must be between {min} and {max} characters")]
    UsernameLength { min: usize, max: usize },

    /// Weekday index outside 0..=6
    #[error("Invalid weekday index {0} (expected 0=Sunday .. 6=Saturday)")]
    InvalidWeekday(u8),

    /// Value outside of its allowed range
    #[error("Value for '{field}' must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    /// Required text was empty
    #[error("'{0}' must not be empty")]
    Empty(&'static str),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, msg) => match code.code {
                rusqlite::ErrorCode::DatabaseLocked | rusqlite::ErrorCode::DatabaseBusy => {
                    StoreError::Locked
                }
                rusqlite::ErrorCode::ConstraintViolation => StoreError::Constraint {
                    collection: "sqlite",
                    message: msg.clone().unwrap_or_else(|| code.to_string()),
                },
                _ => StoreError::QueryFailed(err.to_string()),
            },
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => StoreError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => StoreError::Transport(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for IdentityError {
    fn from(err: reqwest::Error) -> Self {
        IdentityError::Transport(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
