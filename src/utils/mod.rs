//! Utility modules shared across scorers
//!
//! - Normalization: 0-100 clamping, linear interpolation, display rounding
//! - Geo: haversine distance for nearest-region lookup

pub mod normalization;
pub mod geo;

// Re-export commonly used helpers
pub use normalization::{clamp_score, linear_score, round_to_one_decimal, SCORE_MAX, SCORE_MIN};
pub use geo::haversine_km;
