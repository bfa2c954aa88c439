//! Water Balance Calculator
//!
//! Seasonal adjustment:
//! - Kharif: monsoon losses, effective rainfall x0.85
//! - Rabi: residual moisture, effective rainfall x0.95
//! - Zaid: high evaporation, requirement x1.10
//!
//! Irrigation covers the deficit up to a cap set by the irrigation level
//! (None 0, Limited 60%, Full 100% of the crop's base requirement). Whatever
//! remains uncovered drives the water sub-score and the risk assessor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::season::Season;
use crate::utils::{clamp_score, SCORE_MAX};

/// Farmer's access to irrigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IrrigationLevel {
    None,
    Limited,
    Full,
}

impl IrrigationLevel {
    /// Fraction of the base requirement irrigation can supply
    pub fn capacity_fraction(&self) -> f64 {
        match self {
            IrrigationLevel::None => 0.0,
            IrrigationLevel::Limited => 0.6,
            IrrigationLevel::Full => 1.0,
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            IrrigationLevel::None => "None",
            IrrigationLevel::Limited => "Limited",
            IrrigationLevel::Full => "Full",
        }
    }

    pub fn all() -> &'static [IrrigationLevel] {
        &[IrrigationLevel::None, IrrigationLevel::Limited, IrrigationLevel::Full]
    }
}

impl fmt::Display for IrrigationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

impl FromStr for IrrigationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "rainfed" => Ok(IrrigationLevel::None),
            "limited" | "partial" => Ok(IrrigationLevel::Limited),
            "full" => Ok(IrrigationLevel::Full),
            _ => Err(format!("unknown irrigation level '{}'", s)),
        }
    }
}

/// (rainfall factor, requirement factor) for a season
pub fn seasonal_factors(season: Season) -> (f64, f64) {
    match season {
        Season::Kharif => (0.85, 1.0),
        Season::Rabi => (0.95, 1.0),
        Season::Zaid => (1.0, 1.10),
    }
}

/// Forecast rainfall attributed pro-rata to a crop's growth window (mm)
pub fn window_rainfall(total_rainfall_mm: f64, horizon_days: u32, growth_days: u32) -> f64 {
    if horizon_days == 0 {
        return 0.0;
    }
    total_rainfall_mm / f64::from(horizon_days) * f64::from(growth_days)
}

/// Full water balance for one crop
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaterBalance {
    /// Crop's base requirement over the growth cycle (mm)
    pub requirement_mm: f64,
    pub adjusted_requirement_mm: f64,
    /// Forecast rainfall attributed to the growth window (mm)
    pub window_rainfall_mm: f64,
    pub effective_rainfall_mm: f64,
    pub deficit_mm: f64,
    /// Always within [0, requirement_mm]
    pub irrigation_need_mm: f64,
    pub residual_deficit_mm: f64,
    /// Water availability sub-score (0-100)
    pub water_score: f64,
    /// residual deficit / adjusted requirement
    pub deficit_fraction: f64,
}

/// Compute the water balance for a crop over its growth window
pub fn water_balance(
    requirement_mm: f64,
    window_rainfall_mm: f64,
    irrigation: IrrigationLevel,
    season: Season,
) -> WaterBalance {
    let requirement_mm = requirement_mm.max(0.0);
    let window_rainfall_mm = window_rainfall_mm.max(0.0);
    let (rain_factor, requirement_factor) = seasonal_factors(season);

    let adjusted_requirement_mm = requirement_mm * requirement_factor;
    let effective_rainfall_mm = window_rainfall_mm * rain_factor;
    let deficit_mm = (adjusted_requirement_mm - effective_rainfall_mm).max(0.0);

    let irrigation_cap = irrigation.capacity_fraction() * requirement_mm;
    let irrigation_need_mm = deficit_mm.min(irrigation_cap);
    let residual_deficit_mm = (deficit_mm - irrigation_need_mm).max(0.0);

    let (water_score, deficit_fraction) = if adjusted_requirement_mm > 0.0 {
        let fraction = residual_deficit_mm / adjusted_requirement_mm;
        (clamp_score(SCORE_MAX * (1.0 - fraction)), fraction)
    } else {
        (SCORE_MAX, 0.0)
    };

    WaterBalance {
        requirement_mm,
        adjusted_requirement_mm,
        window_rainfall_mm,
        effective_rainfall_mm,
        deficit_mm,
        irrigation_need_mm,
        residual_deficit_mm,
        water_score,
        deficit_fraction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rabi_limited_irrigation() {
        // Jowar in Pune: 450 mm, 40 mm over 90 days -> 37.78 mm over 85 days
        let wb = water_balance(450.0, 40.0 / 90.0 * 85.0, IrrigationLevel::Limited, Season::Rabi);
        assert_relative_eq!(wb.effective_rainfall_mm, 35.888, epsilon = 0.001);
        assert_relative_eq!(wb.irrigation_need_mm, 270.0, epsilon = 1e-9);
        assert_relative_eq!(wb.residual_deficit_mm, 144.111, epsilon = 0.001);
        assert_relative_eq!(wb.water_score, 67.975, epsilon = 0.001);
    }

    #[test]
    fn test_no_irrigation_means_zero_need() {
        let wb = water_balance(500.0, 0.0, IrrigationLevel::None, Season::Kharif);
        assert_eq!(wb.irrigation_need_mm, 0.0);
        assert_eq!(wb.water_score, 0.0);
        assert_relative_eq!(wb.deficit_fraction, 1.0);
    }

    #[test]
    fn test_full_irrigation_covers_deficit() {
        let wb = water_balance(400.0, 100.0, IrrigationLevel::Full, Season::Kharif);
        assert_relative_eq!(wb.deficit_mm, 315.0);
        assert_relative_eq!(wb.irrigation_need_mm, 315.0);
        assert_eq!(wb.water_score, 100.0);
    }

    #[test]
    fn test_zaid_requirement_inflated_but_need_capped() {
        let wb = water_balance(400.0, 0.0, IrrigationLevel::Full, Season::Zaid);
        assert_relative_eq!(wb.adjusted_requirement_mm, 440.0, epsilon = 1e-9);
        assert_relative_eq!(wb.irrigation_need_mm, 400.0);
        assert_relative_eq!(wb.residual_deficit_mm, 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_surplus_rainfall() {
        let wb = water_balance(300.0, 600.0, IrrigationLevel::Limited, Season::Rabi);
        assert_eq!(wb.deficit_mm, 0.0);
        assert_eq!(wb.irrigation_need_mm, 0.0);
        assert_eq!(wb.water_score, 100.0);
    }

    #[test]
    fn test_zero_requirement() {
        let wb = water_balance(0.0, 0.0, IrrigationLevel::None, Season::Zaid);
        assert_eq!(wb.water_score, 100.0);
        assert_eq!(wb.deficit_fraction, 0.0);
    }

    #[test]
    fn test_window_rainfall() {
        assert_relative_eq!(window_rainfall(90.0, 90, 70), 70.0, epsilon = 1e-9);
        assert_eq!(window_rainfall(90.0, 0, 70), 0.0);
    }

    #[test]
    fn test_parse_irrigation_level() {
        assert_eq!("limited".parse::<IrrigationLevel>(), Ok(IrrigationLevel::Limited));
        assert!("drip".parse::<IrrigationLevel>().is_err());
    }
}
