//! Structured log events for view and concept lifecycle transitions.

pub fn view_created(view_id: &str, user_id: &str, view_type: &str, confidence: f64) {
    tracing::info!(
        event = "view_created",
        view_id = %view_id,
        user_id = %user_id,
        view_type = %view_type,
        confidence = confidence,
        "derived view created"
    );
}

pub fn view_reconfirmed(view_id: &str, new_evidence: usize, validated_count: u32) {
    tracing::debug!(
        event = "view_reconfirmed",
        view_id = %view_id,
        new_evidence = new_evidence,
        validated_count = validated_count,
        "derived view reconfirmed"
    );
}

pub fn view_transitioned(view_id: &str, status: &str) {
    tracing::info!(
        event = "view_transitioned",
        view_id = %view_id,
        status = %status,
        "derived view reached terminal state"
    );
}

pub fn concept_reconfirmed(concept_id: &str, view_hypothesis: &str) {
    tracing::debug!(
        event = "concept_reconfirmed",
        concept_id = %concept_id,
        hypothesis = %view_hypothesis,
        "pattern restates a current concept"
    );
}

pub fn conflict_flagged(view_id: &str, counterpart_id: &str, target: &str) {
    tracing::warn!(
        event = "conflict_flagged",
        view_id = %view_id,
        counterpart_id = %counterpart_id,
        target = %target,
        "conflicting beliefs flagged for review"
    );
}

pub fn cycle_failed(user_id: &str, error_code: &str, error: &str) {
    tracing::warn!(
        event = "cycle_failed",
        user_id = %user_id,
        error_code = %error_code,
        error = %error,
        "user cycle failed"
    );
}

pub fn cycle_timed_out(user_id: &str, timeout_ms: u64) {
    tracing::error!(
        event = "cycle_timed_out",
        user_id = %user_id,
        timeout_ms = timeout_ms,
        "user cycle cancelled after timeout"
    );
}
