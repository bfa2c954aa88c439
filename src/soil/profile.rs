//! Soil Profile definition
//!
//! Closed enumerations for texture, organic matter and drainage, plus the
//! validated `SoilProfile` value. Free-form strings are only accepted at the
//! parsing boundary (`FromStr` / serde); everything downstream matches
//! exhaustively on the enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SoilProfileError;

/// Soil texture class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SoilTexture {
    Sandy,
    Loam,
    Clay,
    #[serde(rename = "Clay-Loam")]
    ClayLoam,
    Silty,
}

impl SoilTexture {
    pub fn display_text(&self) -> &'static str {
        match self {
            SoilTexture::Sandy => "Sandy",
            SoilTexture::Loam => "Loam",
            SoilTexture::Clay => "Clay",
            SoilTexture::ClayLoam => "Clay-Loam",
            SoilTexture::Silty => "Silty",
        }
    }

    /// All texture classes
    pub fn all() -> &'static [SoilTexture] {
        &[
            SoilTexture::Sandy,
            SoilTexture::Loam,
            SoilTexture::Clay,
            SoilTexture::ClayLoam,
            SoilTexture::Silty,
        ]
    }
}

impl fmt::Display for SoilTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

impl FromStr for SoilTexture {
    type Err = SoilProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandy" | "sand" => Ok(SoilTexture::Sandy),
            "loam" => Ok(SoilTexture::Loam),
            "clay" => Ok(SoilTexture::Clay),
            "clay-loam" | "clay loam" | "clayloam" => Ok(SoilTexture::ClayLoam),
            "silty" | "silt" => Ok(SoilTexture::Silty),
            _ => Err(SoilProfileError::UnknownTexture(s.to_string())),
        }
    }
}

/// Organic matter content level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrganicMatter {
    Low,
    Medium,
    High,
}

impl OrganicMatter {
    pub fn display_text(&self) -> &'static str {
        match self {
            OrganicMatter::Low => "Low",
            OrganicMatter::Medium => "Medium",
            OrganicMatter::High => "High",
        }
    }
}

impl fmt::Display for OrganicMatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

impl FromStr for OrganicMatter {
    type Err = SoilProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(OrganicMatter::Low),
            "medium" | "moderate" => Ok(OrganicMatter::Medium),
            "high" => Ok(OrganicMatter::High),
            _ => Err(SoilProfileError::UnknownOrganicMatter(s.to_string())),
        }
    }
}

/// Drainage quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Drainage {
    Poor,
    /// "Medium" in older region tables
    #[serde(alias = "Medium")]
    Moderate,
    Good,
}

impl Drainage {
    pub fn display_text(&self) -> &'static str {
        match self {
            Drainage::Poor => "Poor",
            Drainage::Moderate => "Moderate",
            Drainage::Good => "Good",
        }
    }
}

impl fmt::Display for Drainage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

impl FromStr for Drainage {
    type Err = SoilProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "poor" => Ok(Drainage::Poor),
            "moderate" | "medium" => Ok(Drainage::Moderate),
            "good" => Ok(Drainage::Good),
            _ => Err(SoilProfileError::UnknownDrainage(s.to_string())),
        }
    }
}

/// Raw serde shape, validated into `SoilProfile` via `TryFrom`
#[derive(Debug, Clone, Deserialize)]
struct RawSoilProfile {
    texture: SoilTexture,
    ph: f64,
    organic_matter: OrganicMatter,
    drainage: Drainage,
}

/// User's (or region default) soil characteristics.
///
/// Deserialization runs the same pH validation as `SoilProfile::new`, so an
/// out-of-range pH in a request body or catalog file never reaches a scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSoilProfile")]
pub struct SoilProfile {
    pub texture: SoilTexture,

    /// Soil pH (H2O), 0-14
    pub ph: f64,

    pub organic_matter: OrganicMatter,

    pub drainage: Drainage,
}

impl SoilProfile {
    /// Create a validated soil profile
    pub fn new(
        texture: SoilTexture,
        ph: f64,
        organic_matter: OrganicMatter,
        drainage: Drainage,
    ) -> Result<Self, SoilProfileError> {
        let profile = Self {
            texture,
            ph,
            organic_matter,
            drainage,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Parse from free-form strings (form fields, CLI arguments)
    pub fn parse(
        texture: &str,
        ph: f64,
        organic_matter: &str,
        drainage: &str,
    ) -> Result<Self, SoilProfileError> {
        Self::new(
            texture.parse()?,
            ph,
            organic_matter.parse()?,
            drainage.parse()?,
        )
    }

    /// Check numeric invariants (enums are valid by construction)
    pub fn validate(&self) -> Result<(), SoilProfileError> {
        if !self.ph.is_finite() || !(0.0..=14.0).contains(&self.ph) {
            return Err(SoilProfileError::InvalidPh { ph: self.ph });
        }
        Ok(())
    }
}

impl TryFrom<RawSoilProfile> for SoilProfile {
    type Error = SoilProfileError;

    fn try_from(raw: RawSoilProfile) -> Result<Self, Self::Error> {
        SoilProfile::new(raw.texture, raw.ph, raw.organic_matter, raw.drainage)
    }
}

impl fmt::Display for SoilProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} soil, pH {:.1}, {} organic matter, {} drainage",
            self.texture, self.ph, self.organic_matter, self.drainage
        )
    }
}
