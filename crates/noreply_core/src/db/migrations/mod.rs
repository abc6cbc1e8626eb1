//! Store schema history.
//!
//! 0001 `kv_entries`: the key-value table holding one JSON document per
//! collection (follow-ups, rules, templates). Collection shapes evolve inside
//! the JSON, so new steps are only needed when the table itself changes.
//!
//! Versions are stamped into `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "kv_entries",
    sql: include_str!("0001_kv_entries.sql"),
}];

/// Schema version a freshly opened store ends up at.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the store up to `latest_version()` in one transaction.
///
/// Returns how many steps ran; `0` for an already current store.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<u32> {
    let found = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();

    if found > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > found)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        let step_failed = |source| DbError::Migration {
            version: migration.version,
            name: migration.name,
            source,
        };
        tx.execute_batch(migration.sql).map_err(step_failed)?;
        tx.pragma_update(None, "user_version", migration.version)
            .map_err(step_failed)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={found} to_version={latest} steps={}",
        pending.len()
    );
    Ok(pending.len() as u32)
}
