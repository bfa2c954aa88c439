//! Error types for the recommendation engine.

use crate::season::Season;

/// Malformed soil input, rejected before any scoring begins.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SoilProfileError {
    #[error("soil pH must be within 0-14, got {ph}")]
    InvalidPh { ph: f64 },

    #[error("unknown soil texture '{0}' (expected Sandy, Loam, Clay, Clay-Loam or Silty)")]
    UnknownTexture(String),

    #[error("unknown organic matter level '{0}' (expected Low, Medium or High)")]
    UnknownOrganicMatter(String),

    #[error("unknown drainage class '{0}' (expected Poor, Moderate or Good)")]
    UnknownDrainage(String),
}

/// Error type for all fallible engine operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecommendationError {
    /// Resolved season is not grown in the region. Recoverable: callers fall
    /// back to the region's first supported season.
    #[error("season {season} is not supported in region {region_id}")]
    UnsupportedSeason {
        season: Season,
        region_id: String,
    },

    #[error("no eligible crops for {season} season in region {region_id}")]
    NoEligibleCrops {
        season: Season,
        region_id: String,
    },

    /// Crop record lacks data needed for this request (skipped, never fatal).
    #[error("crop {crop_id} has no suitability coefficient for region {region_id}")]
    IncompleteCropRecord {
        crop_id: String,
        region_id: String,
    },

    #[error("invalid soil profile: {0}")]
    InvalidSoilProfile(#[from] SoilProfileError),

    #[error("unknown season '{0}' (expected Kharif, Rabi or Zaid)")]
    UnknownSeason(String),

    #[error("unknown region '{0}'")]
    UnknownRegion(String),

    /// No catalog region within the lookup radius of the coordinates.
    #[error("no region within {max_distance_km} km of ({latitude}, {longitude})")]
    NoRegionNearby {
        latitude: f64,
        longitude: f64,
        /// Kilometres
        max_distance_km: f64,
    },

    /// Plan request carries neither a region id nor coordinates.
    #[error("request needs a region id or latitude/longitude")]
    MissingLocation,

    /// Forecast outlook contains a non-finite or negative value.
    #[error("invalid forecast outlook: {field} = {value}")]
    InvalidForecast { field: &'static str, value: f64 },

    /// Neither live weather nor climatology is available to build an outlook.
    #[error("no live weather or climatology available for region {region_id}")]
    NoWeatherData {
        region_id: String,
    },

    /// Planning horizon must cover at least one day.
    #[error("planning horizon must be >= 1 day, got {0}")]
    InvalidPlanningHorizon(u32),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RecommendationError {
    /// True for errors that describe bad caller input rather than catalog gaps
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RecommendationError::InvalidSoilProfile(_)
                | RecommendationError::UnknownSeason(_)
                | RecommendationError::MissingLocation
                | RecommendationError::InvalidForecast { .. }
                | RecommendationError::InvalidPlanningHorizon(_)
        )
    }
}
