//! v001: events, derived_views, stable_concepts.

use rusqlite::Connection;

use belief_core::errors::BeliefResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> BeliefResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS events (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            timestamp   TEXT NOT NULL,
            actor       TEXT,
            action      TEXT NOT NULL,
            target      TEXT NOT NULL,
            quantity    REAL,
            unit        TEXT,
            confidence  REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_events_user_time ON events(user_id, timestamp);

        CREATE TABLE IF NOT EXISTS derived_views (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL,
            hypothesis_key  TEXT NOT NULL,
            view_type       TEXT NOT NULL,
            status          TEXT NOT NULL,
            data            TEXT NOT NULL,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_views_user_status ON derived_views(user_id, status);
        CREATE INDEX IF NOT EXISTS idx_views_key ON derived_views(hypothesis_key);

        CREATE TABLE IF NOT EXISTS stable_concepts (
            concept_id      TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL,
            canonical_name  TEXT NOT NULL,
            version         INTEGER NOT NULL,
            parent_id       TEXT REFERENCES stable_concepts(concept_id),
            is_deprecated   INTEGER NOT NULL DEFAULT 0,
            data            TEXT NOT NULL,
            created_at      TEXT NOT NULL,
            UNIQUE(user_id, canonical_name, version)
        );

        CREATE INDEX IF NOT EXISTS idx_concepts_chain ON stable_concepts(user_id, canonical_name);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
