//! SQLite implementation of the persistence gateway
//!
//! A single connection guarded by a mutex. Every call runs to completion
//! while holding the lock, so the async methods never suspend mid-query.
//!
//! ## Tables
//!
//! - `users` - Known identities (email is unique, case-insensitive)
//! - `links` - Link records
//! - `link_tags` - Ordered tags for each link
//! - `shared_links` - Sharing relations, joined with `links` on read

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::models::{Link, SharedLink, User};
use crate::storage::error::{GatewayError, GatewayResult};
use crate::storage::gateway::{Gateway, LinkFilter, LinkInsert, ShareFilter, ShareInsert};
use crate::storage::schema::{init_schema, needs_init};

/// Gateway backed by a local SQLite database
pub struct SqliteGateway {
    conn: Mutex<Connection>,
}

impl SqliteGateway {
    /// Open or create the SQLite database
    pub fn open(config: &Config) -> GatewayResult<Self> {
        let path = config.sqlite_path();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| GatewayError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(&path)?;
        debug!("Opened database at {:?}", path);
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> GatewayResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> GatewayResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        if needs_init(&conn) {
            init_schema(&conn)?;
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert the user for `email` unless it exists, then return it
    ///
    /// Emails are trimmed and compared case-insensitively, so repeated sign-ins
    /// with the same address resolve to the same user.
    pub fn upsert_user(&self, email: &str) -> GatewayResult<User> {
        let email = email.trim();
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO users (id, email, created_at) VALUES (?, ?, ?)
                ON CONFLICT(email) DO NOTHING
                "#,
                params![
                    Uuid::new_v4().to_string(),
                    email,
                    Utc::now().timestamp_millis()
                ],
            )?;

            let (id, email): (String, String) = conn.query_row(
                "SELECT id, email FROM users WHERE email = ?",
                params![email],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            Ok(User::new(parse_uuid("users.id", &id)?, email))
        })
    }

    /// Run `f` with exclusive access to the connection
    fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> GatewayResult<T>,
    ) -> GatewayResult<T> {
        let mut conn = self.conn.lock().map_err(|_| GatewayError::Poisoned)?;
        f(&mut conn)
    }

    fn query_links(&self, filter: &LinkFilter) -> GatewayResult<Vec<Link>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, title, url, user_id, created_at FROM links
                WHERE (?1 IS NULL OR user_id = ?1) AND (?2 IS NULL OR id = ?2)
                ORDER BY created_at DESC, rowid DESC
                "#,
            )?;

            let rows = stmt
                .query_map(
                    params![
                        filter.owner.map(|id| id.to_string()),
                        filter.id.map(|id| id.to_string())
                    ],
                    |row| {
                        Ok(LinkRow {
                            id: row.get(0)?,
                            title: row.get(1)?,
                            url: row.get(2)?,
                            user_id: row.get(3)?,
                            created_at: row.get(4)?,
                        })
                    },
                )?
                .collect::<Result<Vec<_>, _>>()?;

            rows.into_iter()
                .map(|row| hydrate_link(&*conn, row))
                .collect()
        })
    }

    fn write_link(&self, record: LinkInsert) -> GatewayResult<Link> {
        self.with_conn(|conn| {
            let link = Link {
                id: Uuid::new_v4(),
                title: record.title,
                url: record.url,
                tags: record.tags,
                user_id: record.user_id,
                created_at: now_millis(),
            };

            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO links (id, title, url, user_id, created_at) VALUES (?, ?, ?, ?, ?)",
                params![
                    link.id.to_string(),
                    link.title,
                    link.url,
                    link.user_id.to_string(),
                    link.created_at.timestamp_millis(),
                ],
            )?;

            for (i, tag) in link.tags.iter().enumerate() {
                tx.execute(
                    "INSERT INTO link_tags (link_id, position, tag) VALUES (?, ?, ?)",
                    params![link.id.to_string(), i as i64, tag],
                )?;
            }
            tx.commit()?;

            Ok(link)
        })
    }

    fn write_share(&self, record: ShareInsert) -> GatewayResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO shared_links
                    (id, link_id, user_id, recipient_email, shared_by_email, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
                params![
                    Uuid::new_v4().to_string(),
                    record.link_id.to_string(),
                    record.user_id.to_string(),
                    record.recipient_email,
                    record.shared_by_email,
                    Utc::now().timestamp_millis(),
                ],
            )?;
            Ok(())
        })
    }

    fn query_shares(&self, filter: &ShareFilter) -> GatewayResult<Vec<SharedLink>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT s.id, s.user_id, s.shared_by_email, s.recipient_email, s.created_at,
                       l.id, l.title, l.url, l.user_id, l.created_at
                FROM shared_links s
                JOIN links l ON l.id = s.link_id
                WHERE (?1 IS NULL OR s.recipient_email = ?1)
                ORDER BY s.created_at DESC, s.rowid DESC
                "#,
            )?;

            let rows = stmt
                .query_map(params![filter.recipient_email.as_deref()], |row| {
                    Ok(ShareRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        shared_by_email: row.get(2)?,
                        recipient_email: row.get(3)?,
                        created_at: row.get(4)?,
                        link: LinkRow {
                            id: row.get(5)?,
                            title: row.get(6)?,
                            url: row.get(7)?,
                            user_id: row.get(8)?,
                            created_at: row.get(9)?,
                        },
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            rows.into_iter()
                .map(|row| -> GatewayResult<SharedLink> {
                    Ok(SharedLink {
                        id: parse_uuid("shared_links.id", &row.id)?,
                        shared_by: parse_uuid("shared_links.user_id", &row.user_id)?,
                        shared_by_email: row.shared_by_email,
                        recipient_email: row.recipient_email,
                        created_at: parse_millis("shared_links.created_at", row.created_at)?,
                        link: hydrate_link(&*conn, row.link)?,
                    })
                })
                .collect()
        })
    }
}

#[async_trait]
impl Gateway for SqliteGateway {
    async fn select_links(&self, filter: LinkFilter) -> GatewayResult<Vec<Link>> {
        debug!(?filter, "select links");
        self.query_links(&filter)
    }

    async fn insert_link(&self, record: LinkInsert) -> GatewayResult<Link> {
        debug!(user_id = %record.user_id, url = %record.url, "insert link");
        self.write_link(record)
    }

    async fn insert_share(&self, record: ShareInsert) -> GatewayResult<()> {
        debug!(link_id = %record.link_id, "insert share");
        self.write_share(record)
    }

    async fn select_shares(&self, filter: ShareFilter) -> GatewayResult<Vec<SharedLink>> {
        debug!(?filter, "select shares");
        self.query_shares(&filter)
    }
}

// ==================== Internal structs ====================

struct LinkRow {
    id: String,
    title: String,
    url: String,
    user_id: String,
    created_at: i64,
}

struct ShareRow {
    id: String,
    user_id: String,
    shared_by_email: String,
    recipient_email: String,
    created_at: i64,
    link: LinkRow,
}

// ==================== Row helpers ====================

/// Hydrate a link row with its tags
fn hydrate_link(conn: &Connection, row: LinkRow) -> GatewayResult<Link> {
    let mut stmt = conn.prepare("SELECT tag FROM link_tags WHERE link_id = ? ORDER BY position")?;
    let tags = stmt
        .query_map(params![row.id], |r| r.get(0))?
        .collect::<Result<Vec<String>, _>>()?;

    Ok(Link {
        id: parse_uuid("links.id", &row.id)?,
        title: row.title,
        url: row.url,
        tags,
        user_id: parse_uuid("links.user_id", &row.user_id)?,
        created_at: parse_millis("links.created_at", row.created_at)?,
    })
}

fn parse_uuid(column: &'static str, value: &str) -> GatewayResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| GatewayError::InvalidRow {
        column,
        details: format!("'{}': {}", value, e),
    })
}

fn parse_millis(column: &'static str, value: i64) -> GatewayResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| GatewayError::InvalidRow {
        column,
        details: format!("timestamp {} out of range", value),
    })
}

/// Current time truncated to what the database stores
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
