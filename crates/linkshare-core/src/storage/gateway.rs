//! Persistence gateway contract
//!
//! The gateway is the remote (or local) relational store that owns the
//! `links` and `shared_links` tables. It assigns identifiers and creation
//! timestamps and enforces referential integrity. Repositories only talk to
//! it through this trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Link, SharedLink};
use crate::storage::error::GatewayResult;

/// Row filter for reads from `links`
///
/// Empty fields do not filter. Results are always ordered newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFilter {
    /// Only links owned by this user
    pub owner: Option<Uuid>,
    /// Only the link with this id
    pub id: Option<Uuid>,
}

impl LinkFilter {
    pub fn owned_by(owner: Uuid) -> Self {
        Self {
            owner: Some(owner),
            id: None,
        }
    }

    pub fn by_id(id: Uuid) -> Self {
        Self {
            owner: None,
            id: Some(id),
        }
    }
}

/// Row filter for joined reads from `shared_links`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareFilter {
    /// Only relations addressed to this email (case-insensitive)
    pub recipient_email: Option<String>,
}

impl ShareFilter {
    pub fn for_recipient(email: impl Into<String>) -> Self {
        Self {
            recipient_email: Some(email.into()),
        }
    }
}

/// Values for a new `links` row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInsert {
    pub title: String,
    pub url: String,
    pub tags: Vec<String>,
    pub user_id: Uuid,
}

/// Values for a new `shared_links` row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareInsert {
    pub link_id: Uuid,
    /// The sharing user
    pub user_id: Uuid,
    pub recipient_email: String,
    pub shared_by_email: String,
}

/// Table-scoped CRUD and join queries over links and shares
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Read links matching `filter`, newest first
    async fn select_links(&self, filter: LinkFilter) -> GatewayResult<Vec<Link>>;

    /// Insert one link, returning the stored record
    async fn insert_link(&self, record: LinkInsert) -> GatewayResult<Link>;

    /// Insert one sharing relation
    async fn insert_share(&self, record: ShareInsert) -> GatewayResult<()>;

    /// Read sharing relations joined with their link, newest share first
    async fn select_shares(&self, filter: ShareFilter) -> GatewayResult<Vec<SharedLink>>;
}
