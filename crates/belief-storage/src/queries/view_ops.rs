//! Derived view rows. The full view is stored as JSON; the indexed columns
//! mirror the fields queries filter on.

use rusqlite::{params, Connection, OptionalExtension};

use belief_core::errors::{BeliefError, BeliefResult};
use belief_core::models::{DerivedView, ViewStatus};

use crate::{to_storage_err, ts_to_sql};

pub fn insert_view(conn: &Connection, view: &DerivedView) -> BeliefResult<()> {
    let data = serde_json::to_string(view)?;
    conn.execute(
        "INSERT INTO derived_views (
            id, user_id, hypothesis_key, view_type, status, data, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            view.id,
            view.user_id,
            view.hypothesis_key(),
            view.view_type.as_str(),
            view.status.as_str(),
            data,
            ts_to_sql(view.created_at),
            ts_to_sql(view.updated_at),
        ],
    )
    .map_err(|e| to_storage_err(format!("insert_view {}: {e}", view.id)))?;
    Ok(())
}

pub fn update_view(conn: &Connection, view: &DerivedView) -> BeliefResult<()> {
    let data = serde_json::to_string(view)?;
    let changed = conn
        .execute(
            "UPDATE derived_views
             SET hypothesis_key = ?2, status = ?3, data = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                view.id,
                view.hypothesis_key(),
                view.status.as_str(),
                data,
                ts_to_sql(view.updated_at),
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if changed == 0 {
        return Err(BeliefError::ViewNotFound {
            id: view.id.clone(),
        });
    }
    Ok(())
}

pub fn get_view(conn: &Connection, id: &str) -> BeliefResult<Option<DerivedView>> {
    let data: Option<String> = conn
        .query_row(
            "SELECT data FROM derived_views WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    data.map(|d| serde_json::from_str(&d).map_err(BeliefError::from))
        .transpose()
}

/// Views of a user, oldest first, optionally restricted to one status.
pub fn views_for_user(
    conn: &Connection,
    user_id: &str,
    status: Option<ViewStatus>,
) -> BeliefResult<Vec<DerivedView>> {
    let mut stmt = conn
        .prepare(
            "SELECT data FROM derived_views
             WHERE user_id = ?1 AND (?2 IS NULL OR status = ?2)
             ORDER BY created_at ASC, id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![user_id, status.map(ViewStatus::as_str)], |row| {
            row.get::<_, String>(0)
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut views = Vec::new();
    for row in rows {
        let data = row.map_err(|e| to_storage_err(e.to_string()))?;
        views.push(serde_json::from_str(&data)?);
    }
    Ok(views)
}
