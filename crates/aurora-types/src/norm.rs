// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Normalized Score Helpers
// ─────────────────────────────────────────────────────────────────────

/// Clamp a score to [0, 1], mapping NaN to 0 and Inf to the nearest bound.
///
/// Every ratio the engines emit (similarity, coherence, strength, cost)
/// passes through here before it reaches a report.
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_unit: NaN detected, clamping to 0.0");
        return 0.0;
    }
    if value.is_infinite() {
        let boundary = if value > 0.0 { 1.0 } else { 0.0 };
        log::warn!("clamp_unit: Inf detected, clamping to {boundary:.1}");
        return boundary;
    }
    value.clamp(0.0, 1.0)
}
