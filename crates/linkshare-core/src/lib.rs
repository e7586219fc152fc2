//! linkshare Core Library
//!
//! Bookmarks ("links") with tags that can be shared with other users by
//! email. This crate owns the link and share records, the operations over
//! them, and the in-memory state a front end needs to stay consistent.
//!
//! # Architecture
//!
//! - **Gateway**: relational store with table-scoped inserts and reads
//! - **Repositories**: own links and sharing relations, with explicit
//!   ownership checks against the signed-in identity
//! - **LinkCollection**: per-session state (links, shared links, loading)
//!
//! # Quick Start
//!
//! ```text
//! let gateway = Arc::new(SqliteGateway::open(&config)?);
//! let user = gateway.upsert_user("alice@example.com")?;
//! let collection = LinkCollection::new(gateway, Arc::new(Session::signed_in(user)));
//!
//! collection.add_link(NewLink::new("Go Docs", "https://go.dev")).await?;
//! collection.fetch_links().await?;
//! let matching = collection.filtered_links("go");
//! ```
//!
//! # Modules
//!
//! - `collection`: Link collection controller (main entry point)
//! - `models`: Link, SharedLink and User
//! - `repository`: Link and share repositories
//! - `storage`: Gateway contract and SQLite implementation
//! - `identity`: Current-user resolution
//! - `tags`: Tag input handling
//! - `search`: Search filtering
//! - `config`: Application configuration

pub mod collection;
pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod repository;
pub mod search;
pub mod storage;
pub mod tags;

#[cfg(test)]
mod test_support;

pub use collection::{CollectionState, LinkCollection};
pub use config::Config;
pub use error::{Error, Result};
pub use identity::{IdentityProvider, Session};
pub use models::{Link, NewLink, SharedLink, User};
pub use repository::{LinkRepository, ShareRepository};
pub use storage::{Gateway, GatewayError, SqliteGateway};
pub use tags::TagEditor;
