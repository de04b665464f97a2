//! Version-chained concept rows.
//!
//! Rows are inserted once. The only later writes are deprecation and access
//! tracking, both of which rewrite the JSON payload alongside the flag column.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use belief_core::errors::{BeliefError, BeliefResult};
use belief_core::models::{DeprecationOutcome, StableConcept};

use crate::{to_storage_err, ts_to_sql};

/// Insert `concept` and deprecate `supersedes` in one transaction.
pub fn append_version(
    conn: &Connection,
    concept: &StableConcept,
    supersedes: Option<&str>,
    at: DateTime<Utc>,
) -> BeliefResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("append_version begin: {e}")))?;

    match append_version_inner(&tx, concept, supersedes, at) {
        Ok(()) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("append_version commit: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn append_version_inner(
    conn: &Connection,
    concept: &StableConcept,
    supersedes: Option<&str>,
    at: DateTime<Utc>,
) -> BeliefResult<()> {
    let current = current_concept(conn, &concept.user_id, &concept.canonical_name)?;
    match (current.as_ref(), supersedes) {
        (None, None) => {}
        (Some(cur), Some(expected)) if cur.concept_id == expected => {}
        (cur, expected) => {
            return Err(BeliefError::ConcurrencyError(format!(
                "chain {}/{} expected current {:?}, found {:?}",
                concept.user_id,
                concept.canonical_name,
                expected,
                cur.map(|c| c.concept_id.as_str()),
            )));
        }
    }

    let latest = latest_version(conn, &concept.user_id, &concept.canonical_name)?;
    if concept.version <= latest {
        return Err(BeliefError::ConcurrencyError(format!(
            "chain {}/{} already has version {latest}, cannot append v{}",
            concept.user_id, concept.canonical_name, concept.version
        )));
    }

    if let Some(mut previous) = current {
        previous.is_deprecated = true;
        previous.deprecated_at = Some(at);
        previous.deprecation_reason = Some(format!("superseded by v{}", concept.version));
        write_payload(conn, &previous)?;
    }

    let data = serde_json::to_string(concept)?;
    conn.execute(
        "INSERT INTO stable_concepts (
            concept_id, user_id, canonical_name, version, parent_id,
            is_deprecated, data, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            concept.concept_id,
            concept.user_id,
            concept.canonical_name,
            concept.version,
            concept.parent_concept_id,
            concept.is_deprecated as i32,
            data,
            ts_to_sql(concept.created_at),
        ],
    )
    .map_err(|e| to_storage_err(format!("insert concept {}: {e}", concept.concept_id)))?;
    Ok(())
}

pub fn get_concept(conn: &Connection, concept_id: &str) -> BeliefResult<Option<StableConcept>> {
    let data: Option<String> = conn
        .query_row(
            "SELECT data FROM stable_concepts WHERE concept_id = ?1",
            params![concept_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    decode_opt(data)
}

pub fn current_concept(
    conn: &Connection,
    user_id: &str,
    canonical_name: &str,
) -> BeliefResult<Option<StableConcept>> {
    let data: Option<String> = conn
        .query_row(
            "SELECT data FROM stable_concepts
             WHERE user_id = ?1 AND canonical_name = ?2 AND is_deprecated = 0",
            params![user_id, canonical_name],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    decode_opt(data)
}

pub fn concept_chain(
    conn: &Connection,
    user_id: &str,
    canonical_name: &str,
) -> BeliefResult<Vec<StableConcept>> {
    collect(
        conn,
        "SELECT data FROM stable_concepts
         WHERE user_id = ?1 AND canonical_name = ?2
         ORDER BY version ASC",
        params![user_id, canonical_name],
    )
}

pub fn current_concepts(conn: &Connection, user_id: &str) -> BeliefResult<Vec<StableConcept>> {
    collect(
        conn,
        "SELECT data FROM stable_concepts
         WHERE user_id = ?1 AND is_deprecated = 0
         ORDER BY canonical_name ASC",
        params![user_id],
    )
}

pub fn deprecate_concept(
    conn: &Connection,
    concept_id: &str,
    at: DateTime<Utc>,
    reason: Option<&str>,
) -> BeliefResult<DeprecationOutcome> {
    let mut concept = get_concept(conn, concept_id)?.ok_or_else(|| BeliefError::ConceptNotFound {
        id: concept_id.to_string(),
    })?;
    if concept.is_deprecated {
        return Ok(DeprecationOutcome::AlreadyDeprecated(concept));
    }
    concept.is_deprecated = true;
    concept.deprecated_at = Some(at);
    concept.deprecation_reason = reason.map(str::to_string);
    write_payload(conn, &concept)?;
    Ok(DeprecationOutcome::Deprecated(concept))
}

pub fn record_access(conn: &Connection, concept_id: &str, at: DateTime<Utc>) -> BeliefResult<()> {
    let mut concept = get_concept(conn, concept_id)?.ok_or_else(|| BeliefError::ConceptNotFound {
        id: concept_id.to_string(),
    })?;
    concept.access_count += 1;
    concept.last_accessed_at = Some(at);
    write_payload(conn, &concept)
}

fn latest_version(conn: &Connection, user_id: &str, canonical_name: &str) -> BeliefResult<u32> {
    let v: Option<u32> = conn
        .query_row(
            "SELECT MAX(version) FROM stable_concepts WHERE user_id = ?1 AND canonical_name = ?2",
            params![user_id, canonical_name],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(v.unwrap_or(0))
}

fn write_payload(conn: &Connection, concept: &StableConcept) -> BeliefResult<()> {
    let data = serde_json::to_string(concept)?;
    conn.execute(
        "UPDATE stable_concepts SET is_deprecated = ?2, data = ?3 WHERE concept_id = ?1",
        params![concept.concept_id, concept.is_deprecated as i32, data],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

fn collect(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> BeliefResult<Vec<StableConcept>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        let data = row.map_err(|e| to_storage_err(e.to_string()))?;
        out.push(serde_json::from_str(&data)?);
    }
    Ok(out)
}

fn decode_opt(data: Option<String>) -> BeliefResult<Option<StableConcept>> {
    data.map(|d| serde_json::from_str(&d).map_err(BeliefError::from))
        .transpose()
}
