//! Rounding used for stored estimate fields
//!
//! Halves round to even, so 0.125 at 2 decimals becomes 0.12.

/// Round `value` to `decimals` places, ties to even
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Round to the nearest whole number, ties to even
pub fn round_whole(value: f64) -> f64 {
    value.round_ties_even()
}
