use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result};

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS entries (
            key         TEXT PRIMARY KEY,
            value       TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS meta (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}

/// Stamp a fresh database with the current schema version, and refuse one
/// written by a newer build.
pub fn migrate(conn: &Connection) -> Result<()> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM meta WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()?;

    match stored.and_then(|v| v.parse::<u32>().ok()) {
        None => {
            conn.execute(
                "INSERT OR REPLACE INTO meta (key, value) VALUES ('schema_version', ?1)",
                params![SCHEMA_VERSION.to_string()],
            )?;
        }
        Some(db) if db > SCHEMA_VERSION => {
            return Err(Error::SchemaTooNew {
                db,
                code: SCHEMA_VERSION,
            });
        }
        Some(_) => {}
    }
    Ok(())
}
