/// Evidence-count bonus.
///
/// Piecewise in `log10(n)`: 1 item → 1.0, 10 → 1.3, 100 → 1.5, flat beyond.
/// Range: 1.0 – 1.5.
pub fn calculate(evidence_count: usize) -> f64 {
    if evidence_count <= 1 {
        return 1.0;
    }
    let decades = (evidence_count as f64).log10();
    if decades < 1.0 {
        1.0 + 0.3 * decades
    } else if decades < 2.0 {
        1.3 + 0.2 * (decades - 1.0)
    } else {
        1.5
    }
}
