//! Temperature suitability
//!
//! 100 inside the optimal band, linear decay to 0 at the crop's absolute
//! min/max, 0 beyond.

use super::comparator::compare_to_range;
use crate::catalog::TemperatureRange;
use crate::utils::{linear_score, SCORE_MAX};

/// Temperature sub-score (0-100) for an expected mean temperature
pub fn temperature_score(temp_c: f64, range: &TemperatureRange) -> f64 {
    if temp_c < range.optimal_min {
        linear_score(temp_c, range.min, range.optimal_min)
    } else if temp_c > range.optimal_max {
        linear_score(temp_c, range.max, range.optimal_max)
    } else {
        SCORE_MAX
    }
}

/// Degrees beyond the crop's absolute min/max (0 when inside)
pub fn temperature_deviation(temp_c: f64, range: &TemperatureRange) -> f64 {
    compare_to_range(temp_c, range.min, range.max).distance_from_range
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const JOWAR: TemperatureRange = TemperatureRange {
        min: 18.0,
        optimal_min: 25.0,
        optimal_max: 35.0,
        max: 40.0,
    };

    #[test]
    fn test_optimal_band() {
        assert_eq!(temperature_score(25.0, &JOWAR), 100.0);
        assert_eq!(temperature_score(30.0, &JOWAR), 100.0);
        assert_eq!(temperature_score(35.0, &JOWAR), 100.0);
    }

    #[test]
    fn test_linear_decay() {
        assert_relative_eq!(temperature_score(24.0, &JOWAR), 600.0 / 7.0, epsilon = 1e-9);
        assert_relative_eq!(temperature_score(37.5, &JOWAR), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_outside_absolute_range() {
        assert_eq!(temperature_score(18.0, &JOWAR), 0.0);
        assert_eq!(temperature_score(45.0, &JOWAR), 0.0);
        assert_eq!(temperature_score(-5.0, &JOWAR), 0.0);
    }

    #[test]
    fn test_deviation() {
        assert_eq!(temperature_deviation(30.0, &JOWAR), 0.0);
        assert_relative_eq!(temperature_deviation(44.0, &JOWAR), 4.0);
        assert_relative_eq!(temperature_deviation(15.0, &JOWAR), 3.0);
    }
}
