//! SQLite-backed substrate over the `kv_entries` table.
//!
//! # Invariants
//! - Connections must come from `db::open_db*` so the table exists.
//! - `set` is a single upsert statement.

use crate::repo::substrate::{KvSubstrate, SubstrateResult};
use rusqlite::{params, Connection, OptionalExtension};

pub struct SqliteSubstrate<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSubstrate<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KvSubstrate for SqliteSubstrate<'_> {
    fn get(&self, key: &str) -> SubstrateResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> SubstrateResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> SubstrateResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}
