//! Rounding helpers shared by every projection step
//!
//! All rounding is round-half-to-even so that repeated `.5` cases do not
//! bias totals upward.

/// Round to the nearest whole number, ties to even.
pub fn round_whole(value: f64) -> f64 {
    value.round_ties_even()
}

/// Round a non-negative real count to an integer, ties to even.
/// Negative and NaN inputs map to 0.
pub fn round_count(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value.round_ties_even() as u64
    }
}

/// Round to `decimals` digits after the point, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}
