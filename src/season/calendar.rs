//! Agricultural Season Calendar
//!
//! Month-to-season mapping for the three Indian cropping seasons, the
//! boundary dates between them, and per-season planting windows.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RecommendationError;

/// Indian agricultural season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    /// Monsoon season
    Kharif,
    /// Winter season
    Rabi,
    /// Summer season
    Zaid,
}

impl Season {
    pub fn display_text(&self) -> &'static str {
        match self {
            Season::Kharif => "Kharif",
            Season::Rabi => "Rabi",
            Season::Zaid => "Zaid",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Season::Kharif => "Monsoon season crops (June-September)",
            Season::Rabi => "Winter season crops (October-February)",
            Season::Zaid => "Summer season crops (March-May)",
        }
    }

    pub fn typical_crops(&self) -> &'static [&'static str] {
        match self {
            Season::Kharif => &["Bajra", "Jowar", "Soybean", "Maize", "Cotton"],
            Season::Rabi => &["Wheat", "Chickpea", "Mustard", "Barley"],
            Season::Zaid => &["Watermelon", "Cucumber", "Muskmelon", "Vegetables"],
        }
    }

    /// Main water source during the season
    pub fn water_source(&self) -> &'static str {
        match self {
            Season::Kharif => "Primarily monsoon rainfall",
            Season::Rabi => "Irrigation and residual soil moisture",
            Season::Zaid => "Primarily irrigation",
        }
    }

    /// Recommended sowing window (month/day bounds, inclusive)
    pub fn planting_window(&self) -> PlantingWindow {
        match self {
            Season::Kharif => PlantingWindow {
                start: (6, 1),
                end: (7, 15),
                description: "Plant with onset of monsoon (early June to mid-July)",
            },
            Season::Rabi => PlantingWindow {
                start: (10, 15),
                end: (11, 30),
                description: "Plant after monsoon withdrawal (mid-October to November)",
            },
            Season::Zaid => PlantingWindow {
                start: (3, 1),
                end: (4, 15),
                description: "Plant in early summer (March to mid-April)",
            },
        }
    }

    pub fn all() -> &'static [Season] {
        &[Season::Kharif, Season::Rabi, Season::Zaid]
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

impl FromStr for Season {
    type Err = RecommendationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kharif" => Ok(Season::Kharif),
            "rabi" => Ok(Season::Rabi),
            "zaid" | "zayed" => Ok(Season::Zaid),
            _ => Err(RecommendationError::UnknownSeason(s.to_string())),
        }
    }
}

/// Sowing window within a season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlantingWindow {
    /// (month, day) of the first sowing day
    pub start: (u32, u32),
    /// (month, day) of the last sowing day
    pub end: (u32, u32),
    pub description: &'static str,
}

impl PlantingWindow {
    /// Whether the date's month/day falls inside the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        let md = (date.month(), date.day());
        md >= self.start && md <= self.end
    }
}

/// Ordered (first month, last month, season) rules. First match wins.
const SEASON_TABLE: &[(u32, u32, Season)] = &[
    (3, 5, Season::Zaid),
    (6, 9, Season::Kharif),
    (10, 12, Season::Rabi),
    (1, 2, Season::Rabi),
];

/// Season boundaries as (month, day-1) and the season that begins there
const BOUNDARIES: &[(u32, Season)] = &[(3, Season::Zaid), (6, Season::Kharif), (10, Season::Rabi)];

/// Calendar season for a date
pub fn calendar_season(date: NaiveDate) -> Season {
    let month = date.month();
    SEASON_TABLE
        .iter()
        .find(|(first, last, _)| (*first..=*last).contains(&month))
        .map(|(_, _, season)| *season)
        // Every month 1-12 is covered by the table
        .unwrap_or(Season::Rabi)
}

/// Boundary dates surrounding `year`, in ascending order
fn boundaries_around(year: i32) -> Vec<(NaiveDate, Season)> {
    (year - 1..=year + 1)
        .flat_map(|y| {
            BOUNDARIES
                .iter()
                .filter_map(move |(month, season)| {
                    NaiveDate::from_ymd_opt(y, *month, 1).map(|d| (d, *season))
                })
        })
        .collect()
}

/// Next season boundary strictly after `date`, with the season it opens
pub fn next_boundary(date: NaiveDate) -> (NaiveDate, Season) {
    boundaries_around(date.year())
        .into_iter()
        .find(|(boundary, _)| *boundary > date)
        .unwrap_or((date, calendar_season(date)))
}

/// Most recent season boundary on or before `date`
pub fn last_boundary(date: NaiveDate) -> NaiveDate {
    boundaries_around(date.year())
        .into_iter()
        .rev()
        .find(|(boundary, _)| *boundary <= date)
        .map(|(boundary, _)| boundary)
        .unwrap_or(date)
}
