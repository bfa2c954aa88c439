//! Recommendation Engine - ranks catalog crops for one request
//!
//! Per crop: soil compatibility, water balance, suitability score and risk
//! note. Crops outside the season context are filtered before scoring; crops
//! without a coefficient for the region are logged and skipped.
//!
//! `recommend` takes fully resolved inputs. `plan` resolves region, season and
//! soil defaults first and wraps the ranked list in a `RecommendationReport`.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

use crate::catalog::{CropCatalog, CropRecord, DroughtTolerance, Region, RegionCatalog};
use crate::config::EngineConfig;
use crate::error::RecommendationError;
use crate::forecast::{DrySpellRisk, ForecastOutlook};
use crate::metrics::{
    assess_risk, temperature_deviation, water_balance, window_rainfall, IrrigationLevel,
    RiskInputs, RiskNote, RiskSeverity,
};
use crate::scorer::{ScoreInputs, SubScores, SuitabilityScorer};
use crate::season::{resolve_season_with_fallback, Season, SeasonContext, SeasonalEligibility};
use crate::soil::{assess_soil, SoilProfile};
use crate::utils::normalization::serialize_display_score;

/// Fully resolved input for one ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub region_id: String,
    pub season_context: SeasonContext,
    pub soil_profile: SoilProfile,
    pub irrigation_level: IrrigationLevel,
    pub forecast_outlook: ForecastOutlook,

    /// Days the outlook's rainfall is spread over
    pub planning_days: u32,

    /// Overrides the engine's configured result count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,
}

/// One ranked crop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    pub crop_id: String,
    pub crop_name: String,

    /// 0-100, full precision internally, one decimal when serialized
    #[serde(serialize_with = "serialize_display_score")]
    pub suitability_score: f64,

    pub growth_days: u32,
    pub water_requirement_mm: f64,

    /// Outlook rainfall attributed to the growth window (mm)
    #[serde(serialize_with = "serialize_display_score")]
    pub forecast_rainfall_mm: f64,

    #[serde(serialize_with = "serialize_display_score")]
    pub irrigation_need_mm: f64,

    pub drought_tolerance: DroughtTolerance,
    pub regional_coefficient: f64,
    pub risk_note: RiskNote,
    pub risk_severity: RiskSeverity,
    pub seasonal_eligibility: SeasonalEligibility,
    pub sub_scores: SubScores,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub soil_amendments: Vec<String>,
}

/// Descending score, then lower irrigation need, then crop id
fn rank_order(a: &RecommendationResult, b: &RecommendationResult) -> Ordering {
    b.suitability_score
        .total_cmp(&a.suitability_score)
        .then_with(|| a.irrigation_need_mm.total_cmp(&b.irrigation_need_mm))
        .then_with(|| a.crop_id.cmp(&b.crop_id))
}

/// Request for the full planning flow
///
/// Location is either `region_id` or `latitude`/`longitude` (nearest region
/// within the configured radius). Season and soil fall back to the calendar
/// and the region's default soil.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(default)]
    pub region_id: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,

    pub date: NaiveDate,

    #[serde(default)]
    pub season: Option<Season>,

    #[serde(default)]
    pub soil_profile: Option<SoilProfile>,

    pub irrigation_level: IrrigationLevel,
    pub forecast_outlook: ForecastOutlook,

    #[serde(default)]
    pub planning_days: Option<u32>,

    #[serde(default)]
    pub top_n: Option<usize>,
}

/// Where the soil profile used for scoring came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoilSource {
    User,
    RegionDefault,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub id: String,
    pub name: String,
    pub climate_zone: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Region> for RegionSummary {
    fn from(region: &Region) -> Self {
        Self {
            id: region.id.clone(),
            name: region.name.clone(),
            climate_zone: region.climate_zone.clone(),
            latitude: region.latitude,
            longitude: region.longitude,
        }
    }
}

/// Ranked recommendations with the context they were computed in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationReport {
    pub region: RegionSummary,
    pub season: SeasonContext,
    pub soil: SoilProfile,
    pub soil_source: SoilSource,
    pub irrigation_level: IrrigationLevel,
    pub forecast: ForecastOutlook,
    pub dry_spell_risk: DrySpellRisk,
    pub planning_days: u32,
    pub recommendations: Vec<RecommendationResult>,

    /// Crops scored before truncation to top N
    pub total_crops_analyzed: usize,
}

/// Crop recommendation engine
///
/// Holds immutable catalogs; every call is a pure function of its inputs, so
/// one engine can serve concurrent requests without locking.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    crops: CropCatalog,
    regions: RegionCatalog,
    scorer: SuitabilityScorer,
    config: EngineConfig,
}

impl RecommendationEngine {
    pub fn new(
        crops: CropCatalog,
        regions: RegionCatalog,
        config: EngineConfig,
    ) -> Result<Self, RecommendationError> {
        config.validate()?;
        let regions = regions.with_nearest_radius_km(config.nearest_region_km);
        Ok(Self {
            crops,
            regions,
            scorer: SuitabilityScorer::new(),
            config,
        })
    }

    /// Built-in Maharashtra catalogs with default configuration
    pub fn builtin() -> Self {
        let config = EngineConfig::default();
        Self {
            crops: CropCatalog::builtin(),
            regions: RegionCatalog::builtin().with_nearest_radius_km(config.nearest_region_km),
            scorer: SuitabilityScorer::new(),
            config,
        }
    }

    pub fn crops(&self) -> &CropCatalog {
        &self.crops
    }

    pub fn regions(&self) -> &RegionCatalog {
        &self.regions
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rank eligible crops for a fully resolved request
    pub fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<RecommendationResult>, RecommendationError> {
        self.rank(request).map(|(results, _)| results)
    }

    /// Evaluate independent requests in parallel; output order matches input
    pub fn recommend_many(
        &self,
        requests: &[RecommendationRequest],
    ) -> Vec<Result<Vec<RecommendationResult>, RecommendationError>> {
        requests.par_iter().map(|request| self.recommend(request)).collect()
    }

    /// Region by id, or nearest to the coordinates
    pub fn resolve_region(
        &self,
        region_id: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<&Region, RecommendationError> {
        match (region_id, latitude, longitude) {
            (Some(id), _, _) => self
                .regions
                .get_region(id)
                .ok_or_else(|| RecommendationError::UnknownRegion(id.to_string())),
            (None, Some(latitude), Some(longitude)) => self
                .regions
                .nearest_region(latitude, longitude)
                .ok_or(RecommendationError::NoRegionNearby {
                    latitude,
                    longitude,
                    max_distance_km: self.regions.nearest_radius_km(),
                }),
            _ => Err(RecommendationError::MissingLocation),
        }
    }

    /// Full planning flow: location, season fallback, soil default, ranking
    pub fn plan(&self, request: &PlanRequest) -> Result<RecommendationReport, RecommendationError> {
        if let Some(soil) = &request.soil_profile {
            soil.validate()?;
        }
        request.forecast_outlook.validate()?;

        let region = self.resolve_region(
            request.region_id.as_deref(),
            request.latitude,
            request.longitude,
        )?;

        let season_context = resolve_season_with_fallback(
            request.date,
            &region.id,
            &region.supported_seasons,
            request.season,
        )?;

        let (soil, soil_source) = match request.soil_profile {
            Some(soil) => (soil, SoilSource::User),
            None => (region.default_soil, SoilSource::RegionDefault),
        };

        let planning_days = request
            .planning_days
            .unwrap_or(self.config.default_planning_days);

        let resolved = RecommendationRequest {
            region_id: region.id.clone(),
            season_context,
            soil_profile: soil,
            irrigation_level: request.irrigation_level,
            forecast_outlook: request.forecast_outlook,
            planning_days,
            top_n: request.top_n,
        };

        let (recommendations, total_crops_analyzed) = self.rank(&resolved)?;

        Ok(RecommendationReport {
            region: region.into(),
            season: resolved.season_context,
            soil,
            soil_source,
            irrigation_level: request.irrigation_level,
            forecast: request.forecast_outlook,
            dry_spell_risk: request.forecast_outlook.dry_spell_risk(),
            planning_days,
            recommendations,
            total_crops_analyzed,
        })
    }

    /// Ranked, truncated results plus the number of crops scored
    fn rank(
        &self,
        request: &RecommendationRequest,
    ) -> Result<(Vec<RecommendationResult>, usize), RecommendationError> {
        request.soil_profile.validate()?;
        request.forecast_outlook.validate()?;
        if request.planning_days == 0 {
            return Err(RecommendationError::InvalidPlanningHorizon(0));
        }
        if self.regions.get_region(&request.region_id).is_none() {
            return Err(RecommendationError::UnknownRegion(request.region_id.clone()));
        }

        let context = &request.season_context;
        let no_eligible = || RecommendationError::NoEligibleCrops {
            season: context.active,
            region_id: request.region_id.clone(),
        };

        let eligible: Vec<(&CropRecord, SeasonalEligibility)> = self
            .crops
            .all_crops()
            .iter()
            .filter_map(|crop| context.eligibility(&crop.seasons).map(|e| (crop, e)))
            .collect();

        if eligible.is_empty() {
            return Err(no_eligible());
        }

        let mut results = Vec::with_capacity(eligible.len());
        for (crop, eligibility) in eligible {
            match self.evaluate_crop(crop, eligibility, request) {
                Ok(result) => results.push(result),
                Err(e) => warn!(
                    crop = %crop.id,
                    region = %request.region_id,
                    error = %e,
                    "Skipping crop"
                ),
            }
        }

        if results.is_empty() {
            return Err(no_eligible());
        }

        let analyzed = results.len();
        results.sort_by(rank_order);
        let top_n = request.top_n.unwrap_or(self.config.top_n).max(1);
        results.truncate(top_n);

        info!(
            region = %request.region_id,
            season = %context.active,
            irrigation = %request.irrigation_level,
            analyzed,
            returned = results.len(),
            top = results.first().map(|r| r.crop_id.as_str()).unwrap_or(""),
            "Ranked crops"
        );

        Ok((results, analyzed))
    }

    fn evaluate_crop(
        &self,
        crop: &CropRecord,
        eligibility: SeasonalEligibility,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResult, RecommendationError> {
        let regional_coefficient = crop
            .regional_coefficient(&request.region_id)
            .filter(|c| c.is_finite())
            .ok_or_else(|| RecommendationError::IncompleteCropRecord {
                crop_id: crop.id.clone(),
                region_id: request.region_id.clone(),
            })?;

        let outlook = &request.forecast_outlook;
        let season = request.season_context.active;

        let soil = assess_soil(&request.soil_profile, &crop.soil);
        let rainfall = window_rainfall(
            outlook.expected_rainfall_mm,
            request.planning_days,
            crop.growth_days,
        );
        let water = water_balance(
            crop.water_requirement_mm,
            rainfall,
            request.irrigation_level,
            season,
        );

        let (sub_scores, score) = self.scorer.score(
            crop,
            &ScoreInputs {
                expected_temp_c: outlook.expected_avg_temp_c,
                water_score: water.water_score,
                soil_score: soil.score,
                regional_coefficient,
                eligibility,
            },
        );

        let risk_note = assess_risk(&RiskInputs {
            dry_spell_days: outlook.dry_spell_days,
            deficit_fraction: water.deficit_fraction,
            temperature_deviation: temperature_deviation(
                outlook.expected_avg_temp_c,
                &crop.temperature,
            ),
            drought_tolerance: crop.drought_tolerance,
        });

        debug!(
            crop = %crop.id,
            score,
            temperature = sub_scores.temperature,
            water = sub_scores.water,
            soil = sub_scores.soil,
            irrigation_need_mm = water.irrigation_need_mm,
            risk = %risk_note,
            "Scored crop"
        );

        Ok(RecommendationResult {
            crop_id: crop.id.clone(),
            crop_name: crop.common_name.clone(),
            suitability_score: score,
            growth_days: crop.growth_days,
            water_requirement_mm: crop.water_requirement_mm,
            forecast_rainfall_mm: water.window_rainfall_mm,
            irrigation_need_mm: water.irrigation_need_mm,
            drought_tolerance: crop.drought_tolerance,
            regional_coefficient,
            risk_note,
            risk_severity: risk_note.severity(),
            seasonal_eligibility: eligibility,
            sub_scores,
            soil_amendments: soil.amendments,
        })
    }
}
