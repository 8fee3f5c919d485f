//! Deterministic float handling for pick ordering.

use core::cmp::Ordering;

/// Tolerance for coordinate equality (ring closure, projected points).
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// Canonicalize a floating-point value for deterministic ordering.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Deterministic total ordering for floats.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= GEOMETRY_EPSILON
}
