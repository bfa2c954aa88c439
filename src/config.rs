//! Engine configuration
//!
//! Defaults can be overridden from a JSON file or environment variables
//! (`TOP_N`, `NEAREST_REGION_KM`, `PLANNING_DAYS`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::catalog::DEFAULT_NEAREST_REGION_KM;
use crate::error::RecommendationError;

/// Results returned when the request does not say
pub const DEFAULT_TOP_N: usize = 10;

/// Planning horizon used when the request does not say (days)
pub const DEFAULT_PLANNING_DAYS: u32 = 90;

/// Tunables for `RecommendationEngine`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of ranked results returned
    pub top_n: usize,

    /// Radius for coordinate-to-region lookup (km)
    pub nearest_region_km: f64,

    pub default_planning_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            nearest_region_km: DEFAULT_NEAREST_REGION_KM,
            default_planning_days: DEFAULT_PLANNING_DAYS,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_nearest_region_km(mut self, km: f64) -> Self {
        self.nearest_region_km = km;
        self
    }

    pub fn with_default_planning_days(mut self, days: u32) -> Self {
        self.default_planning_days = days;
        self
    }

    pub fn validate(&self) -> Result<(), RecommendationError> {
        if self.top_n == 0 {
            return Err(RecommendationError::InvalidConfig(
                "top_n must be at least 1".to_string(),
            ));
        }
        if !(self.nearest_region_km.is_finite() && self.nearest_region_km > 0.0) {
            return Err(RecommendationError::InvalidConfig(format!(
                "nearest_region_km must be positive, got {}",
                self.nearest_region_km
            )));
        }
        if self.default_planning_days == 0 {
            return Err(RecommendationError::InvalidConfig(
                "default_planning_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from a JSON file; missing fields keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `TOP_N`, `NEAREST_REGION_KM` and `PLANNING_DAYS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("TOP_N") {
            config.top_n = v.parse().with_context(|| format!("TOP_N is not an integer: {}", v))?;
        }
        if let Some(v) = lookup("NEAREST_REGION_KM") {
            config.nearest_region_km = v
                .parse()
                .with_context(|| format!("NEAREST_REGION_KM is not a number: {}", v))?;
        }
        if let Some(v) = lookup("PLANNING_DAYS") {
            config.default_planning_days = v
                .parse()
                .with_context(|| format!("PLANNING_DAYS is not an integer: {}", v))?;
        }

        config.validate()?;
        Ok(config)
    }
}
