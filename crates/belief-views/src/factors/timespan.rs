/// Time-span bonus relative to a reference span (30 days by default).
///
/// Formula: `1 + 0.25 × ln(days / reference)`, days floored at 1.
/// Range: 0.2 – 1.25 (clamped). Exactly 1.0 at the reference span.
pub fn calculate(span_days: f64, reference_days: f64) -> f64 {
    let days = if span_days.is_finite() { span_days.max(1.0) } else { 1.0 };
    let reference = reference_days.max(1.0);
    (1.0 + 0.25 * (days / reference).ln()).clamp(0.2, 1.25)
}
