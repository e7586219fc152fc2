//! Error taxonomy for link and share operations
//!
//! Every operation either completes or fails as a whole. Errors are passed
//! through to the caller unchanged; nothing here retries.

use thiserror::Error;
use uuid::Uuid;

use crate::storage::GatewayError;

/// Errors returned by repositories and the link collection
#[derive(Error, Debug)]
pub enum Error {
    /// No signed-in user when the operation needs one
    #[error("Not signed in: {operation} requires an authenticated user")]
    Auth { operation: &'static str },

    /// Caller-side input problem, detected before the gateway is called
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The gateway rejected a read or write
    #[error("Backend error: {0}")]
    Backend(#[from] GatewayError),

    /// The referenced link does not exist
    #[error("Link not found: {0}")]
    LinkNotFound(Uuid),

    /// The link exists but belongs to someone else
    #[error("Link {link_id} is not owned by the current user")]
    NotOwner { link_id: Uuid },
}

impl Error {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }

    /// Whether the error came from missing or insufficient identity
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth { .. } | Error::NotOwner { .. })
    }
}

/// Result type for link and share operations
pub type Result<T> = std::result::Result<T, Error>;
