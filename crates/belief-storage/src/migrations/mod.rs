//! Schema migrations, tracked with `PRAGMA user_version`.

mod v001_initial_schema;
mod v002_concept_indexes;

use rusqlite::Connection;
use tracing::info;

use belief_core::errors::{BeliefResult, StorageError};

type Migration = fn(&Connection) -> BeliefResult<()>;

const MIGRATIONS: &[(u32, Migration)] = &[
    (1, v001_initial_schema::migrate),
    (2, v002_concept_indexes::migrate),
];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 2;

/// Apply every migration newer than the database's current version.
pub fn run_migrations(conn: &Connection) -> BeliefResult<u32> {
    let current = current_version(conn)?;
    for (version, migrate) in MIGRATIONS {
        if current >= *version {
            continue;
        }
        migrate(conn).map_err(|e| StorageError::MigrationFailed {
            version: *version,
            reason: e.to_string(),
        })?;
        conn.pragma_update(None, "user_version", version)
            .map_err(|e| StorageError::MigrationFailed {
                version: *version,
                reason: e.to_string(),
            })?;
        info!(version = *version, "applied schema migration");
    }
    current_version(conn)
}

pub fn current_version(conn: &Connection) -> BeliefResult<u32> {
    let version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StorageError::MigrationFailed {
            version: 0,
            reason: e.to_string(),
        })?;
    Ok(version)
}
