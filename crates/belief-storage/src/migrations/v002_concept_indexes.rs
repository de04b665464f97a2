//! v002: at most one non-deprecated concept per (user, canonical name).

use rusqlite::Connection;

use belief_core::errors::BeliefResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> BeliefResult<()> {
    conn.execute_batch(
        "
        CREATE UNIQUE INDEX IF NOT EXISTS idx_concepts_one_current
            ON stable_concepts(user_id, canonical_name)
            WHERE is_deprecated = 0;

        CREATE INDEX IF NOT EXISTS idx_concepts_user_current
            ON stable_concepts(user_id, is_deprecated);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
