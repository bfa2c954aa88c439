//! Range Comparator
//!
//! Core logic for comparing a local value (soil pH, expected temperature)
//! against a crop's tolerated [min, max] range.

use serde::Serialize;

/// Result of comparing a local value to a crop's range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RangeFit {
    /// Local value is below the crop's range (local < min)
    BelowRange,

    /// Local value is within the crop's range (min <= local <= max)
    WithinRange,

    /// Local value exceeds the crop's range (local > max)
    AboveRange,
}

/// Result of range comparison with additional context
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeComparison {
    /// Whether local is below, within, or above the crop's range
    pub fit: RangeFit,

    /// Local value being compared
    pub local_value: f64,

    pub min: f64,

    pub max: f64,

    /// Distance from nearest boundary (0 if within range)
    pub distance_from_range: f64,
}

impl RangeComparison {
    pub fn is_within_range(&self) -> bool {
        self.fit == RangeFit::WithinRange
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn half_width(&self) -> f64 {
        (self.max - self.min) / 2.0
    }
}

/// Compare a local value against a crop's [min, max] range
pub fn compare_to_range(local: f64, min: f64, max: f64) -> RangeComparison {
    let (fit, distance) = if local < min {
        (RangeFit::BelowRange, min - local)
    } else if local > max {
        (RangeFit::AboveRange, local - max)
    } else {
        (RangeFit::WithinRange, 0.0)
    };

    RangeComparison {
        fit,
        local_value: local,
        min,
        max,
        distance_from_range: distance,
    }
}
