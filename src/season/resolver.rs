//! Season Resolution
//!
//! Turns a date, an optional explicit season and a region's supported seasons
//! into the `SeasonContext` used for scoring. The transition window only
//! affects guidance and the seasonal sub-score of incoming-season crops; it
//! never changes the active season.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::calendar::{calendar_season, last_boundary, next_boundary, Season};
use crate::error::RecommendationError;

/// Days before a boundary that count as the transition window (inclusive)
pub const TRANSITION_WINDOW_DAYS: i64 = 30;

/// How a crop qualifies for the current season context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonalEligibility {
    /// Eligible for the active season
    InSeason,
    /// Eligible only for the incoming season of a transition
    IncomingOnly,
}

impl SeasonalEligibility {
    /// Seasonal sub-score (0-100)
    pub fn score(&self) -> f64 {
        match self {
            SeasonalEligibility::InSeason => 100.0,
            SeasonalEligibility::IncomingOnly => 50.0,
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            SeasonalEligibility::InSeason => "In season",
            SeasonalEligibility::IncomingOnly => "Early sowing for next season",
        }
    }
}

/// Resolved season for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonContext {
    /// Season used for scoring
    pub active: Season,

    /// Season the date falls in by the calendar
    pub calendar_season: Season,

    pub date: NaiveDate,

    pub days_until_boundary: i64,

    pub days_since_boundary: i64,

    /// Date lies within the transition window before the next boundary
    pub transitioning: bool,

    /// Season that starts at the next boundary (set only when transitioning)
    pub incoming: Option<Season>,

    /// Farmer-facing guidance text
    pub guidance: String,

    /// Set when the requested season was replaced by a fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SeasonContext {
    /// Build a context for `active` at `date` without checking region support
    pub fn for_season(active: Season, date: NaiveDate) -> Self {
        let calendar = calendar_season(date);
        let (boundary, opening) = next_boundary(date);
        let days_until_boundary = (boundary - date).num_days();
        let days_since_boundary = (date - last_boundary(date)).num_days();
        let transitioning = days_until_boundary <= TRANSITION_WINDOW_DAYS;
        let incoming = transitioning.then_some(opening);

        let guidance = format_guidance(active, calendar, incoming);

        Self {
            active,
            calendar_season: calendar,
            date,
            days_until_boundary,
            days_since_boundary,
            transitioning,
            incoming,
            guidance,
            warning: None,
        }
    }

    /// Eligibility of a crop grown in `crop_seasons`, or None if it is out of season
    pub fn eligibility(&self, crop_seasons: &[Season]) -> Option<SeasonalEligibility> {
        if crop_seasons.contains(&self.active) {
            return Some(SeasonalEligibility::InSeason);
        }
        match self.incoming {
            Some(next) if crop_seasons.contains(&next) => Some(SeasonalEligibility::IncomingOnly),
            _ => None,
        }
    }

    fn with_warning(mut self, warning: String) -> Self {
        self.guidance = format!("{} {}", warning, self.guidance);
        self.warning = Some(warning);
        self
    }
}

fn format_guidance(active: Season, calendar: Season, incoming: Option<Season>) -> String {
    match incoming {
        Some(next) if next != calendar => format!(
            "Currently in late {} season, transitioning to {}. \
             Consider crops suitable for both seasons or early {} varieties.",
            calendar, next, next
        ),
        _ => {
            let crops: Vec<&str> = active.typical_crops().iter().take(3).copied().collect();
            format!(
                "Current season: {}. {}. Optimal for: {}.",
                active,
                active.description(),
                crops.join(", ")
            )
        }
    }
}

/// Resolve the scoring season for a region.
///
/// An explicit season the region supports is used unchanged. Otherwise the
/// calendar season applies. Fails with `UnsupportedSeason` when the resolved
/// season is not grown in the region.
pub fn resolve_season(
    date: NaiveDate,
    region_id: &str,
    supported: &[Season],
    explicit: Option<Season>,
) -> Result<SeasonContext, RecommendationError> {
    let season = explicit.unwrap_or_else(|| calendar_season(date));

    if !supported.contains(&season) {
        return Err(RecommendationError::UnsupportedSeason {
            season,
            region_id: region_id.to_string(),
        });
    }

    Ok(SeasonContext::for_season(season, date))
}

/// Resolve the season, falling back to the region's first supported season.
///
/// Only fails when the region lists no seasons at all.
pub fn resolve_season_with_fallback(
    date: NaiveDate,
    region_id: &str,
    supported: &[Season],
    explicit: Option<Season>,
) -> Result<SeasonContext, RecommendationError> {
    match resolve_season(date, region_id, supported, explicit) {
        Ok(ctx) => Ok(ctx),
        Err(RecommendationError::UnsupportedSeason { season, region_id }) => {
            let Some(&fallback) = supported.first() else {
                return Err(RecommendationError::UnsupportedSeason { season, region_id });
            };

            warn!(
                region = %region_id,
                requested = %season,
                fallback = %fallback,
                "Season not supported in region, falling back"
            );

            let warning = format!(
                "Warning: {} season is not grown in {}; showing {} recommendations instead.",
                season, region_id, fallback
            );
            Ok(SeasonContext::for_season(fallback, date).with_warning(warning))
        }
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KHARIF_RABI: &[Season] = &[Season::Kharif, Season::Rabi];

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_explicit_supported_season_used() {
        let ctx = resolve_season(date(2024, 7, 10), "PUNE", KHARIF_RABI, Some(Season::Rabi)).unwrap();
        assert_eq!(ctx.active, Season::Rabi);
        assert_eq!(ctx.calendar_season, Season::Kharif);
        assert!(ctx.warning.is_none());
    }

    #[test]
    fn test_calendar_season_used_without_override() {
        let ctx = resolve_season(date(2024, 11, 15), "PUNE", KHARIF_RABI, None).unwrap();
        assert_eq!(ctx.active, Season::Rabi);
        assert!(!ctx.transitioning);
        assert!(ctx.guidance.starts_with("Current season: Rabi."));
    }

    #[test]
    fn test_unsupported_season_errors() {
        let err = resolve_season(date(2024, 4, 10), "PUNE", KHARIF_RABI, None).unwrap_err();
        assert_eq!(
            err,
            RecommendationError::UnsupportedSeason {
                season: Season::Zaid,
                region_id: "PUNE".to_string()
            }
        );
    }

    #[test]
    fn test_fallback_to_first_supported() {
        let ctx = resolve_season_with_fallback(
            date(2024, 4, 10),
            "PUNE",
            KHARIF_RABI,
            Some(Season::Zaid),
        )
        .unwrap();
        assert_eq!(ctx.active, Season::Kharif);
        let warning = ctx.warning.as_deref().unwrap();
        assert!(warning.contains("Zaid"));
        assert!(ctx.guidance.starts_with(warning));
    }

    #[test]
    fn test_fallback_with_no_seasons_fails() {
        let result = resolve_season_with_fallback(date(2024, 4, 10), "NOWHERE", &[], None);
        assert!(matches!(result, Err(RecommendationError::UnsupportedSeason { .. })));
    }

    #[test]
    fn test_transition_window_inclusive() {
        // 1 Sep 2024 is exactly 30 days before 1 Oct
        let ctx = SeasonContext::for_season(Season::Kharif, date(2024, 9, 1));
        assert_eq!(ctx.days_until_boundary, 30);
        assert!(ctx.transitioning);
        assert_eq!(ctx.incoming, Some(Season::Rabi));
        assert!(ctx.guidance.contains("Kharif"));
        assert!(ctx.guidance.contains("Rabi"));

        let before = SeasonContext::for_season(Season::Kharif, date(2024, 8, 31));
        assert_eq!(before.days_until_boundary, 31);
        assert!(!before.transitioning);
        assert_eq!(before.incoming, None);
    }

    #[test]
    fn test_transition_does_not_change_active_season() {
        let ctx = resolve_season(date(2025, 2, 20), "PUNE", KHARIF_RABI, None).unwrap();
        assert_eq!(ctx.active, Season::Rabi);
        assert!(ctx.transitioning);
        assert_eq!(ctx.incoming, Some(Season::Zaid));
    }

    #[test]
    fn test_days_since_boundary() {
        let ctx = SeasonContext::for_season(Season::Kharif, date(2024, 6, 11));
        assert_eq!(ctx.days_since_boundary, 10);
    }

    #[test]
    fn test_eligibility() {
        let ctx = SeasonContext::for_season(Season::Kharif, date(2024, 9, 15));
        assert_eq!(
            ctx.eligibility(&[Season::Kharif]),
            Some(SeasonalEligibility::InSeason)
        );
        assert_eq!(
            ctx.eligibility(&[Season::Rabi]),
            Some(SeasonalEligibility::IncomingOnly)
        );
        assert_eq!(ctx.eligibility(&[Season::Zaid]), None);

        let mid = SeasonContext::for_season(Season::Kharif, date(2024, 7, 15));
        assert_eq!(mid.eligibility(&[Season::Rabi]), None);
    }
}
