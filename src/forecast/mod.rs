//! Weather Forecast Inputs
//!
//! ## Architecture
//!
//! - `features`: daily weather records and derived agri features
//! - `climatology`: ClimatologySource trait + in-memory multi-year store
//! - `outlook`: ForecastOutlook and the live/climatology blending forecaster

pub mod climatology;
pub mod features;
pub mod outlook;

pub use climatology::{ClimatologySource, ClimatologyStats, DateWindow, InMemoryClimatology};
pub use features::{agri_features, longest_dry_spell, AgriDay, DailyWeather};
pub use outlook::{DrySpellRisk, ForecastOutlook, MediumRangeForecaster, LIVE_FORECAST_DAYS};
