/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Magnitudes below this collapse to zero, and lattice hits are tested against it.
pub const ZERO_TOL: f64 = 5e-6;

/// Number of fractional digits kept on every pattern coordinate.
pub const COORD_RESOLUTION: i32 = 15;

/// Rounds a coordinate to the pattern resolution.
///
/// Values whose magnitude does not exceed [`ZERO_TOL`] become exactly `0.0`;
/// everything else is rounded half-to-even at [`COORD_RESOLUTION`] fractional
/// digits. Values too large to carry that many fractional digits are returned
/// unchanged.
#[must_use]
pub fn round_coord(value: f64) -> f64 {
    if value.abs() <= ZERO_TOL {
        return 0.0;
    }
    round_to(value, COORD_RESOLUTION)
}

/// Rounds `value` half-to-even at `digits` fractional digits.
#[must_use]
pub fn round_to(value: f64, digits: i32) -> f64 {
    let power = 10f64.powi(digits);
    let scaled = value * power;
    // Past 2^53 the scaled value has no fractional part left to round.
    if !scaled.is_finite() || scaled.abs() >= 9_007_199_254_740_992.0 {
        return value;
    }
    scaled.round_ties_even() / power
}
