//! SQLite schema for the persistence gateway
//!
//! Timestamps are stored as milliseconds since the Unix epoch. Tags keep
//! their insertion order through the `position` column.

use rusqlite::{Connection, Result};

/// Current schema version for migrations
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_info (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- Known identities
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE CHECK (length(email) > 0),
            created_at INTEGER NOT NULL
        );

        -- Links table
        CREATE TABLE IF NOT EXISTS links (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL CHECK (length(title) > 0),
            url TEXT NOT NULL CHECK (length(url) > 0),
            user_id TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id)
        );

        -- Tags for links (ordered list per link)
        CREATE TABLE IF NOT EXISTS link_tags (
            link_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            tag TEXT NOT NULL,
            PRIMARY KEY (link_id, position),
            FOREIGN KEY (link_id) REFERENCES links(id) ON DELETE CASCADE
        );

        -- Sharing relations (many per link)
        CREATE TABLE IF NOT EXISTS shared_links (
            id TEXT PRIMARY KEY,
            link_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            recipient_email TEXT NOT NULL COLLATE NOCASE CHECK (length(recipient_email) > 0),
            shared_by_email TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            FOREIGN KEY (link_id) REFERENCES links(id),
            FOREIGN KEY (user_id) REFERENCES users(id)
        );

        -- Own links, newest first
        CREATE INDEX IF NOT EXISTS idx_links_user_created_at ON links(user_id, created_at);

        -- Links shared with a recipient, newest first
        CREATE INDEX IF NOT EXISTS idx_shared_links_recipient
            ON shared_links(recipient_email, created_at);
        CREATE INDEX IF NOT EXISTS idx_shared_links_link_id ON shared_links(link_id);
        "#,
    )?;

    // Set schema version
    conn.execute(
        "INSERT OR REPLACE INTO schema_info (key, value) VALUES ('version', ?)",
        [SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> Result<Option<i32>> {
    let mut stmt = conn.prepare("SELECT value FROM schema_info WHERE key = 'version'")?;
    let result: Result<String> = stmt.query_row([], |row| row.get(0));

    match result {
        Ok(version_str) => Ok(version_str.parse().ok()),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Check if schema needs initialization or migration
pub fn needs_init(conn: &Connection) -> bool {
    let table_exists: bool = conn
        .prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_info'")
        .and_then(|mut stmt| stmt.exists([]))
        .unwrap_or(false);

    if !table_exists {
        return true;
    }

    match get_schema_version(conn) {
        Ok(Some(v)) => v < SCHEMA_VERSION,
        _ => true,
    }
}
