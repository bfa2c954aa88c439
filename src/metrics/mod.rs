//! Per-crop metric modules
//!
//! Each metric is a pure function over validated inputs; the suitability
//! scorer combines them.
//!
//! ## Architecture
//!
//! - `comparator`: value vs [min, max] range comparison
//! - `temperature`: temperature sub-score and deviation
//! - `water_balance`: seasonal rainfall adjustment, irrigation need, water sub-score
//! - `risk`: first-match risk rule table

pub mod comparator;
pub mod risk;
pub mod temperature;
pub mod water_balance;

pub use comparator::{compare_to_range, RangeComparison, RangeFit};
pub use risk::{assess_risk, RiskInputs, RiskNote, RiskSeverity, DRY_SPELL_THRESHOLD_DAYS};
pub use temperature::{temperature_deviation, temperature_score};
pub use water_balance::{
    seasonal_factors, water_balance, window_rainfall, IrrigationLevel, WaterBalance,
};
