//! Storage layer
//!
//! The persistence gateway contract and its SQLite implementation.
//!
//! ## Architecture
//!
//! - **Gateway**: table-scoped inserts and reads, including the
//!   `shared_links` to `links` join
//! - **SQLite**: local store that assigns ids and timestamps and enforces
//!   foreign keys

pub mod error;
pub mod gateway;
pub mod schema;
pub mod sqlite;

pub use error::{GatewayError, GatewayResult};
pub use gateway::{Gateway, LinkFilter, LinkInsert, ShareFilter, ShareInsert};
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
pub use sqlite::SqliteGateway;
