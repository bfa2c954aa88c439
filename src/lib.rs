//! Crop Recommender Rust Implementation
//!
//! Ranks short-duration crops for a region, season, soil profile, irrigation
//! level and medium-range weather outlook.
//!
//! Module layout:
//! - `soil/`: Soil profile types and compatibility scoring
//! - `season/`: Kharif/Rabi/Zaid calendar and season resolution
//! - `metrics/`: Temperature, water balance and risk assessment
//! - `scorer`: Weighted suitability composite
//! - `recommender`: Orchestrator (filter, score, rank)
//! - `catalog/`: Static crop and region tables
//! - `forecast/`: Daily weather features, climatology, outlook blending
//! - `api_server`: Axum REST API (feature `api`)

pub mod utils;
pub mod error;
pub mod soil;
pub mod season;
pub mod metrics;
pub mod scorer;
pub mod catalog;
pub mod forecast;
pub mod config;
pub mod recommender;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use catalog::{CropCatalog, CropRecord, DroughtTolerance, Region, RegionCatalog};
pub use config::EngineConfig;
pub use error::{RecommendationError, SoilProfileError};
pub use forecast::{ClimatologySource, DailyWeather, ForecastOutlook, MediumRangeForecaster};
pub use metrics::{IrrigationLevel, RiskNote, RiskSeverity};
pub use recommender::{
    PlanRequest, RecommendationEngine, RecommendationReport, RecommendationRequest,
    RecommendationResult, SoilSource,
};
pub use scorer::{SubScores, SuitabilityScorer};
pub use season::{Season, SeasonContext, SeasonalEligibility};
pub use soil::{Drainage, OrganicMatter, SoilProfile, SoilTexture};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
