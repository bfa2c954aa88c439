//! Historical Climatology Store
//!
//! Multi-year daily records per region, aggregated over a calendar window
//! (month/day span, year-agnostic) into the statistics the forecaster uses
//! beyond the live forecast range.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use super::features::{longest_dry_spell, DailyWeather};

/// Dry spell length counted as a "dry spell year" (days)
pub const DRY_SPELL_EVENT_DAYS: u32 = 7;

/// A calendar span starting at `start`'s month/day and running `days` days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub days: u32,
}

impl DateWindow {
    pub fn new(start: NaiveDate, days: u32) -> Self {
        Self { start, days }
    }

    /// Window start moved into `year` (29 Feb becomes 28 Feb in common years)
    fn anchor_in(&self, year: i32) -> Option<NaiveDate> {
        let (month, day) = (self.start.month(), self.start.day());
        NaiveDate::from_ymd_opt(year, month, day)
            .or_else(|| NaiveDate::from_ymd_opt(year, month, day.saturating_sub(1)))
    }

    /// Year of the window occurrence containing `date`, if any.
    /// Windows that wrap past 31 Dec belong to the year they start in.
    pub fn occurrence_year(&self, date: NaiveDate) -> Option<i32> {
        [date.year(), date.year() - 1].into_iter().find(|&year| {
            self.anchor_in(year).is_some_and(|anchor| {
                let offset = (date - anchor).num_days();
                offset >= 0 && offset < i64::from(self.days)
            })
        })
    }
}

/// Aggregate statistics for one region and calendar window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimatologyStats {
    pub mean_temp_c: f64,
    pub mean_daily_rain_mm: f64,
    /// Population variance of daily rainfall
    pub rain_variance: f64,
    /// Fraction of years with a dry spell longer than 7 days
    pub dry_spell_frequency: f64,
    /// Mean of each year's longest dry spell (days)
    pub mean_longest_dry_spell: f64,
    pub sample_years: usize,
}

/// Source of climatological aggregates
pub trait ClimatologySource: Send + Sync {
    fn climatology(&self, region_id: &str, window: &DateWindow) -> Option<ClimatologyStats>;
}

impl<T: ClimatologySource + ?Sized> ClimatologySource for Arc<T> {
    fn climatology(&self, region_id: &str, window: &DateWindow) -> Option<ClimatologyStats> {
        (**self).climatology(region_id, window)
    }
}

impl<T: ClimatologySource + ?Sized> ClimatologySource for &T {
    fn climatology(&self, region_id: &str, window: &DateWindow) -> Option<ClimatologyStats> {
        (**self).climatology(region_id, window)
    }
}

/// In-memory store of daily records keyed by region id
#[derive(Debug, Clone, Default)]
pub struct InMemoryClimatology {
    records: FxHashMap<String, Vec<DailyWeather>>,
}

impl InMemoryClimatology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records for a region (kept sorted by date)
    pub fn insert(&mut self, region_id: impl Into<String>, records: impl IntoIterator<Item = DailyWeather>) {
        let entry = self.records.entry(region_id.into()).or_default();
        entry.extend(records);
        entry.sort_by_key(|d| d.date);
    }

    /// Load a `{"REGION_ID": [daily records...]}` JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read climatology file {}", path.display()))?;
        let raw: FxHashMap<String, Vec<DailyWeather>> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse climatology file {}", path.display()))?;

        let mut store = Self::new();
        for (region, records) in raw {
            store.insert(region, records);
        }

        tracing::info!(
            regions = store.records.len(),
            records = store.record_count(),
            "Loaded climatology"
        );
        Ok(store)
    }

    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// Region ids with data, sorted
    pub fn regions(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.records.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl ClimatologySource for InMemoryClimatology {
    fn climatology(&self, region_id: &str, window: &DateWindow) -> Option<ClimatologyStats> {
        let records = self.records.get(region_id)?;

        let mut by_year: BTreeMap<i32, Vec<DailyWeather>> = BTreeMap::new();
        for day in records {
            if let Some(year) = window.occurrence_year(day.date) {
                by_year.entry(year).or_default().push(*day);
            }
        }
        if by_year.is_empty() {
            return None;
        }

        let days: Vec<&DailyWeather> = by_year.values().flatten().collect();
        let n = days.len() as f64;
        let mean_temp_c = days.iter().map(|d| d.temp_avg()).sum::<f64>() / n;
        let mean_daily_rain_mm = days.iter().map(|d| d.rainfall).sum::<f64>() / n;
        let rain_variance = days
            .iter()
            .map(|d| (d.rainfall - mean_daily_rain_mm).powi(2))
            .sum::<f64>()
            / n;

        let spells: Vec<u32> = by_year.values().map(|year| longest_dry_spell(year)).collect();
        let sample_years = spells.len();
        let mean_longest_dry_spell =
            spells.iter().map(|&s| f64::from(s)).sum::<f64>() / sample_years as f64;
        let dry_spell_frequency = spells.iter().filter(|&&s| s > DRY_SPELL_EVENT_DAYS).count()
            as f64
            / sample_years as f64;

        Some(ClimatologyStats {
            mean_temp_c,
            mean_daily_rain_mm,
            rain_variance,
            dry_spell_frequency,
            mean_longest_dry_spell,
            sample_years,
        })
    }
}
