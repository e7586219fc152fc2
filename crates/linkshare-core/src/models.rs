//! Data models for linkshare
//!
//! Defines the core data structures: Link, SharedLink, and User.
//! Records are created by the gateway, which assigns identifiers and
//! creation timestamps; callers only ever describe what to insert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// An authenticated user as resolved by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Email address, also the key recipients are matched on
    pub email: String,
}

impl User {
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

/// A saved link owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    /// Unique identifier (assigned by the gateway)
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// The URL
    pub url: String,
    /// Tags in insertion order
    pub tags: Vec<String>,
    /// Owner of this link
    pub user_id: Uuid,
    /// When this link was created
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Check whether the given user owns this link
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Input for creating a link
///
/// Carries only the caller-supplied fields; owner, id and timestamp are
/// filled in by the repository and gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewLink {
    pub title: String,
    pub url: String,
    pub tags: Vec<String>,
}

impl NewLink {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            tags: Vec::new(),
        }
    }

    /// Set all tags (replacing existing)
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Check the required fields before anything reaches the gateway
    ///
    /// Title and URL must contain something other than whitespace.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("title", "Title is required"));
        }
        if self.url.trim().is_empty() {
            return Err(Error::validation("url", "URL is required"));
        }
        Ok(())
    }
}

/// A link shared with someone, joined with the link it points at
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SharedLink {
    /// Identifier of the sharing relation
    pub id: Uuid,
    /// The shared link, fully expanded
    pub link: Link,
    /// User who shared the link
    pub shared_by: Uuid,
    /// Email of the user who shared the link
    pub shared_by_email: String,
    /// Email the link was shared with
    pub recipient_email: String,
    /// When the link was shared
    pub created_at: DateTime<Utc>,
}

/// Check that an email address has a plausible `local@domain` shape
///
/// Deliverability is not checked.
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(Error::validation("email", "Email is required"));
    }
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(())
        }
        _ => Err(Error::validation(
            "email",
            format!("'{}' is not a valid email address", email),
        )),
    }
}
