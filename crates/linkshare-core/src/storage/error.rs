//! Gateway error handling
//!
//! Provides typed errors for gateway operations with descriptive messages
//! and recovery suggestions.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while talking to the persistence gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Failed to create data directory
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A write violated a table constraint (foreign key, check, unique)
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A stored row could not be turned back into a model
    #[error("Invalid value in column '{column}': {details}")]
    InvalidRow {
        column: &'static str,
        details: String,
    },

    /// The connection lock was poisoned by a panicking writer
    #[error("Database connection is unusable after a failed operation")]
    Poisoned,

    /// SQLite database error
    #[error("Database error: {0}")]
    Database(rusqlite::Error),
}

impl From<rusqlite::Error> for GatewayError {
    /// Classifies the error, separating constraint violations from the rest
    fn from(error: rusqlite::Error) -> Self {
        match &error {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                GatewayError::Constraint(msg.clone().unwrap_or_else(|| e.to_string()))
            }
            _ => GatewayError::Database(error),
        }
    }
}

impl GatewayError {
    /// Check if this error was caused by rejected input rather than a broken store
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, GatewayError::Constraint(_))
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            GatewayError::CreateDirectory { .. } => {
                Some("Check that the parent directory exists and you have write permissions.")
            }
            GatewayError::Constraint(_) => {
                Some("The record refers to missing data or has empty required fields.")
            }
            GatewayError::Poisoned => Some("Restart the application."),
            _ => None,
        }
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
