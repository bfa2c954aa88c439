//! Medium-Range Forecast Outlook
//!
//! Live forecasts only reach ~16 days; planning horizons run to 90. The
//! forecaster keeps the live days as-is and fills the remainder from
//! climatology, nudged by the short-term temperature trend.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::climatology::{ClimatologySource, DateWindow};
use super::features::{longest_dry_spell, mean_rainfall, mean_temp, DailyWeather};
use crate::error::RecommendationError;

/// Days of live forecast used before switching to climatology
pub const LIVE_FORECAST_DAYS: usize = 16;

/// Days at each end of the live series compared for the trend
const TREND_SAMPLE_DAYS: usize = 5;

/// Temperature nudge applied in the direction of the live trend (°C)
const TREND_ADJUSTMENT_C: f64 = 1.0;

/// Live daily rain below this is treated as unrepresentative (mm/day)
const MIN_REPRESENTATIVE_RAIN_MM: f64 = 0.5;

/// Conservative daily rain used instead (mm/day)
const FALLBACK_DAILY_RAIN_MM: f64 = 1.5;

/// Categorical dry-spell risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DrySpellRisk {
    Low,
    Moderate,
    High,
}

impl DrySpellRisk {
    /// <= 4 days Low, <= 7 days Moderate, longer High
    pub fn from_days(days: f64) -> Self {
        if days > 7.0 {
            DrySpellRisk::High
        } else if days > 4.0 {
            DrySpellRisk::Moderate
        } else {
            DrySpellRisk::Low
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            DrySpellRisk::Low => "Low",
            DrySpellRisk::Moderate => "Moderate",
            DrySpellRisk::High => "High",
        }
    }
}

impl fmt::Display for DrySpellRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

/// Expected conditions over the planning horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastOutlook {
    /// Expected mean temperature (°C)
    pub expected_avg_temp_c: f64,

    /// Expected cumulative rainfall over the horizon (mm)
    pub expected_rainfall_mm: f64,

    /// Expected longest run of dry days
    pub dry_spell_days: f64,

    pub horizon_days: u32,
}

impl ForecastOutlook {
    pub fn new(
        expected_avg_temp_c: f64,
        expected_rainfall_mm: f64,
        dry_spell_days: f64,
        horizon_days: u32,
    ) -> Self {
        Self {
            expected_avg_temp_c,
            expected_rainfall_mm,
            dry_spell_days,
            horizon_days,
        }
    }

    /// Reject non-finite or negative values
    pub fn validate(&self) -> Result<(), RecommendationError> {
        if !self.expected_avg_temp_c.is_finite() {
            return Err(RecommendationError::InvalidForecast {
                field: "expected_avg_temp_c",
                value: self.expected_avg_temp_c,
            });
        }
        if !self.expected_rainfall_mm.is_finite() || self.expected_rainfall_mm < 0.0 {
            return Err(RecommendationError::InvalidForecast {
                field: "expected_rainfall_mm",
                value: self.expected_rainfall_mm,
            });
        }
        if !self.dry_spell_days.is_finite() || self.dry_spell_days < 0.0 {
            return Err(RecommendationError::InvalidForecast {
                field: "dry_spell_days",
                value: self.dry_spell_days,
            });
        }
        if self.horizon_days == 0 {
            return Err(RecommendationError::InvalidPlanningHorizon(0));
        }
        Ok(())
    }

    pub fn dry_spell_risk(&self) -> DrySpellRisk {
        DrySpellRisk::from_days(self.dry_spell_days)
    }
}

/// Blends live daily weather with climatology into a `ForecastOutlook`
#[derive(Debug, Clone)]
pub struct MediumRangeForecaster<C> {
    climatology: C,
}

impl<C: ClimatologySource> MediumRangeForecaster<C> {
    pub fn new(climatology: C) -> Self {
        Self { climatology }
    }

    /// Outlook for `horizon_days` starting at `start`.
    ///
    /// Up to 16 days of `live` weather (date-ordered) are used directly. The
    /// remaining days use the region's climatology for the matching calendar
    /// window, or the live means when no climatology exists.
    pub fn outlook(
        &self,
        region_id: &str,
        live: &[DailyWeather],
        start: NaiveDate,
        horizon_days: u32,
    ) -> Result<ForecastOutlook, RecommendationError> {
        if horizon_days == 0 {
            return Err(RecommendationError::InvalidPlanningHorizon(0));
        }

        let horizon = horizon_days as usize;
        let live = &live[..live.len().min(LIVE_FORECAST_DAYS).min(horizon)];
        let remaining = horizon - live.len();

        let climatology = if remaining > 0 {
            let window = DateWindow::new(start + Duration::days(live.len() as i64), remaining as u32);
            self.climatology.climatology(region_id, &window)
        } else {
            None
        };

        let live_mean_temp = mean_temp(live);
        let adjustment = temperature_trend_adjustment(live);

        // Temperature and rainfall rate for the days beyond the live forecast
        let (tail_temp, tail_rain_rate, tail_dry_spell) = match (&climatology, live_mean_temp) {
            (Some(stats), _) => (
                stats.mean_temp_c + adjustment,
                stats.mean_daily_rain_mm,
                stats.mean_longest_dry_spell,
            ),
            (None, Some(live_temp)) => {
                let rate = mean_rainfall(live).unwrap_or(0.0);
                let rate = if rate < MIN_REPRESENTATIVE_RAIN_MM {
                    FALLBACK_DAILY_RAIN_MM
                } else {
                    rate
                };
                (live_temp + adjustment, rate, 0.0)
            }
            (None, None) => {
                return Err(RecommendationError::NoWeatherData {
                    region_id: region_id.to_string(),
                })
            }
        };

        let live_days = live.len() as f64;
        let tail_days = remaining as f64;
        let live_temp_sum = live_mean_temp.unwrap_or(0.0) * live_days;
        let expected_avg_temp_c = (live_temp_sum + tail_temp * tail_days) / horizon as f64;

        let live_rain: f64 = live.iter().map(|d| d.rainfall).sum();
        let expected_rainfall_mm = live_rain + tail_rain_rate * tail_days;

        let dry_spell_days = f64::from(longest_dry_spell(live)).max(tail_dry_spell);

        tracing::debug!(
            region = %region_id,
            live_days = live.len(),
            climatology = climatology.is_some(),
            expected_avg_temp_c,
            expected_rainfall_mm,
            dry_spell_days,
            "Built forecast outlook"
        );

        Ok(ForecastOutlook {
            expected_avg_temp_c,
            expected_rainfall_mm,
            dry_spell_days,
            horizon_days,
        })
    }
}

/// +1 °C if the live series is warming, -1 °C if cooling, else 0
fn temperature_trend_adjustment(live: &[DailyWeather]) -> f64 {
    if live.len() < 2 {
        return 0.0;
    }
    let n = TREND_SAMPLE_DAYS.min(live.len());
    let head = mean_temp(&live[..n]).unwrap_or(0.0);
    let tail = mean_temp(&live[live.len() - n..]).unwrap_or(0.0);
    let trend = tail - head;

    if trend > 0.0 {
        TREND_ADJUSTMENT_C
    } else if trend < 0.0 {
        -TREND_ADJUSTMENT_C
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::climatology::InMemoryClimatology;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn live_series(start: NaiveDate, n: i64, temp: impl Fn(i64) -> f64, rain: f64) -> Vec<DailyWeather> {
        (0..n)
            .map(|i| DailyWeather {
                date: start + Duration::days(i),
                temp_max: temp(i) + 5.0,
                temp_min: temp(i) - 5.0,
                rainfall: rain,
            })
            .collect()
    }

    #[test]
    fn test_dry_spell_risk_categories() {
        assert_eq!(DrySpellRisk::from_days(4.0), DrySpellRisk::Low);
        assert_eq!(DrySpellRisk::from_days(5.0), DrySpellRisk::Moderate);
        assert_eq!(DrySpellRisk::from_days(7.0), DrySpellRisk::Moderate);
        assert_eq!(DrySpellRisk::from_days(8.0), DrySpellRisk::High);
    }

    #[test]
    fn test_validate() {
        assert!(ForecastOutlook::new(24.0, 40.0, 3.0, 90).validate().is_ok());
        assert!(matches!(
            ForecastOutlook::new(f64::NAN, 40.0, 3.0, 90).validate(),
            Err(RecommendationError::InvalidForecast { field: "expected_avg_temp_c", .. })
        ));
        assert!(ForecastOutlook::new(24.0, -1.0, 3.0, 90).validate().is_err());
        assert_eq!(
            ForecastOutlook::new(24.0, 40.0, 3.0, 0).validate(),
            Err(RecommendationError::InvalidPlanningHorizon(0))
        );
    }

    #[test]
    fn test_live_only_uses_rain_fallback() {
        let store = InMemoryClimatology::new();
        let forecaster = MediumRangeForecaster::new(&store);
        let start = date(2024, 7, 1);
        let live = live_series(start, 16, |_| 25.0, 0.0);

        let outlook = forecaster.outlook("PUNE", &live, start, 90).unwrap();
        // 16 dry live days, then 74 days at 1.5 mm/day
        assert_relative_eq!(outlook.expected_rainfall_mm, 111.0, epsilon = 1e-9);
        assert_relative_eq!(outlook.expected_avg_temp_c, 25.0, epsilon = 1e-9);
        assert_eq!(outlook.dry_spell_days, 16.0);
        assert_eq!(outlook.dry_spell_risk(), DrySpellRisk::High);
    }

    #[test]
    fn test_warming_trend_nudges_tail() {
        let store = InMemoryClimatology::new();
        let forecaster = MediumRangeForecaster::new(&store);
        let start = date(2024, 7, 1);
        // Warming 20 -> 35 over 16 days, mean 27.5
        let live = live_series(start, 16, |i| 20.0 + i as f64, 5.0);

        let outlook = forecaster.outlook("PUNE", &live, start, 32).unwrap();
        // Half live at 27.5, half tail at 28.5
        assert_relative_eq!(outlook.expected_avg_temp_c, 28.0, epsilon = 1e-9);
    }

    #[test]
    fn test_blends_with_climatology() {
        let mut store = InMemoryClimatology::new();
        for year in 2015..2020 {
            store.insert(
                "NASHIK",
                live_series(date(year, 7, 1), 60, |_| 26.0, 6.0),
            );
        }
        let forecaster = MediumRangeForecaster::new(&store);
        let start = date(2024, 7, 1);
        let live = live_series(start, 10, |_| 26.0, 2.0);

        let outlook = forecaster.outlook("NASHIK", &live, start, 40).unwrap();
        // 10 live days at 2 mm + 30 climatology days at 6 mm
        assert_relative_eq!(outlook.expected_rainfall_mm, 200.0, epsilon = 1e-9);
        assert_relative_eq!(outlook.expected_avg_temp_c, 26.0, epsilon = 1e-9);
        assert_eq!(outlook.dry_spell_days, 0.0);
    }

    #[test]
    fn test_no_data_fails() {
        let store = InMemoryClimatology::new();
        let forecaster = MediumRangeForecaster::new(&store);
        let err = forecaster.outlook("LATUR", &[], date(2024, 7, 1), 90).unwrap_err();
        assert_eq!(
            err,
            RecommendationError::NoWeatherData {
                region_id: "LATUR".to_string()
            }
        );
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let store = InMemoryClimatology::new();
        let forecaster = MediumRangeForecaster::new(&store);
        assert!(forecaster.outlook("PUNE", &[], date(2024, 7, 1), 0).is_err());
    }
}
