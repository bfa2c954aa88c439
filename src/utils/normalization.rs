//! Score Normalization Utilities
//!
//! Every sub-score in the engine lives on a 0-100 scale. These helpers keep
//! the clamping and interpolation rules in one place so the scorers agree.

use serde::Serializer;

/// Lower bound of every score
pub const SCORE_MIN: f64 = 0.0;

/// Upper bound of every score
pub const SCORE_MAX: f64 = 100.0;

/// Clamp a raw score into [0, 100]
///
/// NaN collapses to 0 so a malformed intermediate value can never rank a crop.
#[inline]
pub fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return SCORE_MIN;
    }
    raw.clamp(SCORE_MIN, SCORE_MAX)
}

/// Linear interpolation between a zero point and a full-score point
///
/// Returns 0 at `zero_at`, 100 at `full_at`, and interpolates linearly in
/// between. Values beyond either end are clamped. Works in both directions
/// (`zero_at` may be larger than `full_at`).
///
/// Example: temperature decay from optimal_min (100) down to min (0)
/// ```
/// use crop_recommender_rust::utils::linear_score;
/// assert_eq!(linear_score(18.0, 18.0, 25.0), 0.0);
/// assert_eq!(linear_score(25.0, 18.0, 25.0), 100.0);
/// ```
pub fn linear_score(value: f64, zero_at: f64, full_at: f64) -> f64 {
    let span = full_at - zero_at;
    if span == 0.0 {
        // Degenerate band: all-or-nothing at the boundary
        return if value == full_at { SCORE_MAX } else { SCORE_MIN };
    }

    let fraction = (value - zero_at) / span;
    clamp_score(fraction * SCORE_MAX)
}

/// Round to one decimal place for display
#[inline]
pub fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Serde helper: serialize a full-precision score rounded to one decimal
pub fn serialize_display_score<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(round_to_one_decimal(*value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-5.0), 0.0);
        assert_eq!(clamp_score(105.0), 100.0);
        assert_eq!(clamp_score(42.5), 42.5);
        assert_eq!(clamp_score(f64::NAN), 0.0);
    }

    #[test]
    fn test_linear_score_ascending() {
        // Band 18 -> 25: 6/7 of the way at 24
        assert_relative_eq!(linear_score(24.0, 18.0, 25.0), 85.714, epsilon = 0.001);
        assert_eq!(linear_score(10.0, 18.0, 25.0), 0.0);
        assert_eq!(linear_score(30.0, 18.0, 25.0), 100.0);
    }

    #[test]
    fn test_linear_score_descending() {
        // Upper band: 35 (full) -> 40 (zero)
        assert_relative_eq!(linear_score(37.5, 40.0, 35.0), 50.0, epsilon = 0.0001);
        assert_eq!(linear_score(41.0, 40.0, 35.0), 0.0);
    }

    #[test]
    fn test_linear_score_degenerate_band() {
        assert_eq!(linear_score(25.0, 25.0, 25.0), 100.0);
        assert_eq!(linear_score(24.9, 25.0, 25.0), 0.0);
    }

    #[test]
    fn test_round_to_one_decimal() {
        assert_eq!(round_to_one_decimal(86.6349), 86.6);
        assert_eq!(round_to_one_decimal(86.66), 86.7);
    }
}
