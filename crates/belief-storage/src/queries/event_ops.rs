//! Event ingestion and range queries.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use belief_core::errors::BeliefResult;
use belief_core::models::{Event, EventQuery};

use crate::{to_storage_err, ts_to_sql};

/// Insert or replace an event. Event ids are owned upstream, so a re-send
/// of the same id overwrites in place.
pub fn upsert_event(conn: &Connection, event: &Event) -> BeliefResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO events (
            id, user_id, timestamp, actor, action, target, quantity, unit, confidence
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            event.id,
            event.user_id,
            ts_to_sql(event.timestamp),
            event.actor,
            event.action,
            event.target,
            event.quantity,
            event.unit,
            event.confidence,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Events matching `query`, ordered by `(timestamp, id)`.
pub fn query_events(conn: &Connection, query: &EventQuery) -> BeliefResult<Vec<Event>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, user_id, timestamp, actor, action, target, quantity, unit, confidence
             FROM events
             WHERE user_id = ?1
               AND timestamp >= ?2 AND timestamp <= ?3
               AND (?4 IS NULL OR action = ?4)
               AND (?5 IS NULL OR target = ?5)
             ORDER BY timestamp ASC, id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(
            params![
                query.user_id,
                ts_to_sql(query.range.start),
                ts_to_sql(query.range.end),
                query.action,
                query.target,
            ],
            row_to_event,
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn count_events(conn: &Connection, user_id: &str) -> BeliefResult<usize> {
    let n: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM events WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n.max(0) as usize)
}

fn row_to_event(row: &Row<'_>) -> rusqlite::Result<Event> {
    let ts: String = row.get(2)?;
    Ok(Event {
        id: row.get(0)?,
        user_id: row.get(1)?,
        timestamp: parse_ts(&ts, 2)?,
        actor: row.get(3)?,
        action: row.get(4)?,
        target: row.get(5)?,
        quantity: row.get(6)?,
        unit: row.get(7)?,
        confidence: row.get(8)?,
    })
}

pub(crate) fn parse_ts(s: &str, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}
