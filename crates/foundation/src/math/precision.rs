//! Precision policies.
//!
//! Placement math is done in `f64` on the CPU. These helpers keep the results
//! deterministic when inputs degenerate.

/// Canonicalize a floating-point value for deterministic comparisons.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Return `v` when finite, otherwise `fallback`.
#[inline]
pub fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { canonical_f64(v) } else { fallback }
}
