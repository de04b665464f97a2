//! Regularity scoring.
//!
//! Scores are `1 - CV` (coefficient of variation), clamped to [0, 1]:
//! perfectly even spacing scores 1.0, spacing whose spread matches its mean scores 0.

use belief_core::Event;

/// Regularity of an event series. Uses the gaps between consecutive events and,
/// when every event carries a quantity, the quantities too (mean of both scores).
/// Fewer than two events score 0.
pub fn regularity(events: &[&Event]) -> f64 {
    if events.len() < 2 {
        return 0.0;
    }
    let gaps: Vec<f64> = events
        .windows(2)
        .map(|w| (w[1].timestamp - w[0].timestamp).num_seconds() as f64)
        .collect();
    let timing = score(&gaps);

    let quantities: Option<Vec<f64>> = events.iter().map(|e| e.quantity).collect();
    match quantities {
        Some(q) => (timing + score(&q)) / 2.0,
        None => timing,
    }
}

/// `1 - min(CV, 1)`. A zero mean counts as perfectly regular.
pub fn score(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean.abs() < f64::EPSILON {
        return 1.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let cv = variance.sqrt() / mean.abs();
    (1.0 - cv.min(1.0)).max(0.0)
}
