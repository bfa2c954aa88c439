//! Season Resolver
//!
//! ## Architecture
//!
//! - `calendar`: Season enum, month table, boundaries, planting windows
//! - `resolver`: SeasonContext, resolution with fallback, seasonal eligibility

pub mod calendar;
pub mod resolver;

pub use calendar::{calendar_season, PlantingWindow, Season};
pub use resolver::{
    resolve_season, resolve_season_with_fallback, SeasonContext, SeasonalEligibility,
    TRANSITION_WINDOW_DAYS,
};
