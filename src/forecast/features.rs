//! Agricultural weather features
//!
//! Derived per-day quantities used by the forecaster and climatology:
//! average temperature, growing degree days, rolling rainfall, dry-day flags
//! and dry-spell run lengths.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A day counts as dry below this rainfall (mm)
pub const DRY_DAY_THRESHOLD_MM: f64 = 2.0;

/// Base temperature for growing degree days (°C)
pub const GDD_BASE_TEMP_C: f64 = 10.0;

/// Window for rolling rainfall sums (days)
pub const ROLLING_RAIN_WINDOW: usize = 7;

/// One day of observed or forecast weather
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub temp_min: f64,
    /// Daily rainfall (mm)
    pub rainfall: f64,
}

impl DailyWeather {
    pub fn temp_avg(&self) -> f64 {
        (self.temp_max + self.temp_min) / 2.0
    }

    pub fn is_dry(&self) -> bool {
        self.rainfall < DRY_DAY_THRESHOLD_MM
    }

    pub fn growing_degree_days(&self) -> f64 {
        (self.temp_avg() - GDD_BASE_TEMP_C).max(0.0)
    }
}

/// Per-day derived features
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgriDay {
    pub date: NaiveDate,
    pub temp_avg: f64,
    pub gdd: f64,
    /// Rainfall summed over the trailing 7 days (fewer at the start)
    pub rainfall_7d: f64,
    pub dry_day: bool,
    /// Consecutive dry days ending on this day (0 on a wet day)
    pub dry_spell_days: u32,
}

/// Derive agricultural features for a date-ordered series
pub fn agri_features(records: &[DailyWeather]) -> Vec<AgriDay> {
    let mut out = Vec::with_capacity(records.len());
    let mut run = 0u32;

    for (i, day) in records.iter().enumerate() {
        let window_start = (i + 1).saturating_sub(ROLLING_RAIN_WINDOW);
        let rainfall_7d: f64 = records[window_start..=i].iter().map(|d| d.rainfall).sum();

        run = if day.is_dry() { run + 1 } else { 0 };

        out.push(AgriDay {
            date: day.date,
            temp_avg: day.temp_avg(),
            gdd: day.growing_degree_days(),
            rainfall_7d,
            dry_day: day.is_dry(),
            dry_spell_days: run,
        });
    }

    out
}

/// Longest run of consecutive dry days
pub fn longest_dry_spell(records: &[DailyWeather]) -> u32 {
    records
        .iter()
        .scan(0u32, |run, day| {
            *run = if day.is_dry() { *run + 1 } else { 0 };
            Some(*run)
        })
        .max()
        .unwrap_or(0)
}

pub fn mean_temp(records: &[DailyWeather]) -> Option<f64> {
    mean(records.iter().map(DailyWeather::temp_avg))
}

pub fn mean_rainfall(records: &[DailyWeather]) -> Option<f64> {
    mean(records.iter().map(|d| d.rainfall))
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(rain: &[f64]) -> Vec<DailyWeather> {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        rain.iter()
            .enumerate()
            .map(|(i, &r)| DailyWeather {
                date: start + chrono::Duration::days(i as i64),
                temp_max: 32.0,
                temp_min: 22.0,
                rainfall: r,
            })
            .collect()
    }

    #[test]
    fn test_temp_avg_and_gdd() {
        let day = series(&[0.0])[0];
        assert_relative_eq!(day.temp_avg(), 27.0);
        assert_relative_eq!(day.growing_degree_days(), 17.0);
    }

    #[test]
    fn test_dry_day_threshold() {
        let days = series(&[1.9, 2.0]);
        assert!(days[0].is_dry());
        assert!(!days[1].is_dry());
    }

    #[test]
    fn test_longest_dry_spell() {
        let days = series(&[0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 1.0, 12.0]);
        assert_eq!(longest_dry_spell(&days), 5);
        assert_eq!(longest_dry_spell(&[]), 0);
    }

    #[test]
    fn test_agri_features() {
        let days = series(&[10.0, 0.0, 0.0, 3.0, 1.0, 1.0, 1.0, 1.0]);
        let features = agri_features(&days);
        assert_eq!(features.len(), 8);
        assert_eq!(features[2].dry_spell_days, 2);
        assert_eq!(features[3].dry_spell_days, 0);
        assert_eq!(features[7].dry_spell_days, 4);
        // Day 7 window covers days 1..=7
        assert_relative_eq!(features[7].rainfall_7d, 7.0);
        assert_relative_eq!(features[0].rainfall_7d, 10.0);
    }

    #[test]
    fn test_means() {
        let days = series(&[4.0, 0.0]);
        assert_eq!(mean_rainfall(&days), Some(2.0));
        assert_eq!(mean_temp(&[]), None);
    }
}
