//! Crop Catalog
//!
//! Immutable crop records indexed by crop id. The built-in table covers
//! fifteen short-duration (70-90 day) crops grown across Maharashtra;
//! `CropCatalog::from_json_file` loads an alternative table with the same
//! shape.

use anyhow::{bail, Context, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::season::Season;
use crate::soil::SoilTexture;

/// Drought tolerance class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DroughtTolerance {
    Low,
    #[serde(alias = "Moderate")]
    Medium,
    High,
}

impl DroughtTolerance {
    /// Drought tolerance sub-score (0-100)
    pub fn score(&self) -> f64 {
        match self {
            DroughtTolerance::Low => 40.0,
            DroughtTolerance::Medium => 70.0,
            DroughtTolerance::High => 100.0,
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            DroughtTolerance::Low => "Low",
            DroughtTolerance::Medium => "Medium",
            DroughtTolerance::High => "High",
        }
    }
}

impl fmt::Display for DroughtTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

/// Market demand (informational only, not scored)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketDemand {
    Low,
    Moderate,
    High,
}

/// Temperature tolerance in °C (min <= optimal_min <= optimal_max <= max)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min: f64,
    pub optimal_min: f64,
    pub optimal_max: f64,
    pub max: f64,
}

/// Soil conditions a crop prefers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropSoilRequirement {
    pub ph_min: f64,
    pub ph_max: f64,

    /// Preferred textures; the first entry is the primary texture
    pub preferred_textures: Vec<SoilTexture>,

    #[serde(default)]
    pub disallowed_textures: Vec<SoilTexture>,

    /// Crop has low waterlogging tolerance
    #[serde(default)]
    pub requires_good_drainage: bool,
}

impl CropSoilRequirement {
    pub fn primary_texture(&self) -> Option<SoilTexture> {
        self.preferred_textures.first().copied()
    }

    pub fn prefers(&self, texture: SoilTexture) -> bool {
        self.preferred_textures.contains(&texture)
    }

    pub fn disallows(&self, texture: SoilTexture) -> bool {
        self.disallowed_textures.contains(&texture)
    }
}

/// One crop in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRecord {
    pub id: String,
    pub common_name: String,
    pub scientific_name: String,

    /// Days from sowing to harvest
    pub growth_days: u32,

    pub temperature: TemperatureRange,

    /// Total water requirement over the growth cycle (mm)
    pub water_requirement_mm: f64,

    pub drought_tolerance: DroughtTolerance,

    pub soil: CropSoilRequirement,

    /// Region id -> suitability coefficient (0.0-1.0)
    pub regional_suitability: FxHashMap<String, f64>,

    pub seasons: Vec<Season>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_demand: Option<MarketDemand>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub varieties: Vec<String>,
}

impl CropRecord {
    pub fn regional_coefficient(&self, region_id: &str) -> Option<f64> {
        self.regional_suitability.get(region_id).copied()
    }

    pub fn grown_in(&self, season: Season) -> bool {
        self.seasons.contains(&season)
    }

    /// Check structural invariants of a record loaded from outside
    pub fn validate(&self) -> Result<()> {
        let t = &self.temperature;
        if !(t.min <= t.optimal_min && t.optimal_min <= t.optimal_max && t.optimal_max <= t.max) {
            bail!(
                "crop {}: temperature range must satisfy min <= optimal_min <= optimal_max <= max",
                self.id
            );
        }
        if !(self.water_requirement_mm.is_finite() && self.water_requirement_mm >= 0.0) {
            bail!("crop {}: water requirement must be >= 0", self.id);
        }
        if self.growth_days == 0 {
            bail!("crop {}: growth duration must be >= 1 day", self.id);
        }
        if self.soil.ph_min > self.soil.ph_max {
            bail!("crop {}: ph_min exceeds ph_max", self.id);
        }
        if self.seasons.is_empty() {
            bail!("crop {}: no eligible seasons", self.id);
        }
        if let Some((region, coeff)) = self
            .regional_suitability
            .iter()
            .find(|(_, c)| !(0.0..=1.0).contains(*c))
        {
            bail!(
                "crop {}: suitability coefficient {} for {} outside 0-1",
                self.id,
                coeff,
                region
            );
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct CropFile {
    crops: Vec<CropRecord>,
}

/// Immutable crop table with an id index
#[derive(Debug, Clone)]
pub struct CropCatalog {
    crops: Vec<CropRecord>,
    index: FxHashMap<String, usize>,
}

impl CropCatalog {
    pub fn new(crops: Vec<CropRecord>) -> Self {
        let index = crops
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();
        Self { crops, index }
    }

    /// Built-in table of short-duration crops
    pub fn builtin() -> Self {
        Self::new(builtin_crops())
    }

    /// Load a `{"crops": [...]}` JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read crop file {}", path.display()))?;
        let file: CropFile = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse crop file {}", path.display()))?;

        let mut seen = FxHashSet::default();
        for crop in &file.crops {
            crop.validate()?;
            if !seen.insert(crop.id.as_str()) {
                bail!("crop {}: duplicate id in {}", crop.id, path.display());
            }
        }

        tracing::info!(count = file.crops.len(), path = %path.display(), "Loaded crop catalog");
        Ok(Self::new(file.crops))
    }

    pub fn all_crops(&self) -> &[CropRecord] {
        &self.crops
    }

    pub fn get_crop(&self, crop_id: &str) -> Option<&CropRecord> {
        self.index.get(crop_id).map(|&i| &self.crops[i])
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }
}

impl Default for CropCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ============================================================================
// Built-in crop table
// ============================================================================

/// Region order shared by every coefficient row below
const REGION_ORDER: [&str; 10] = [
    "PUNE", "SOLAPUR", "NASHIK", "AHMEDNAGAR", "AURANGABAD",
    "JALGAON", "SANGLI", "KOLHAPUR", "SATARA", "LATUR",
];

fn coefficients(values: [f64; 10]) -> FxHashMap<String, f64> {
    REGION_ORDER
        .iter()
        .zip(values)
        .map(|(region, c)| (region.to_string(), c))
        .collect()
}

struct CropRow {
    id: &'static str,
    common_name: &'static str,
    scientific_name: &'static str,
    growth_days: u32,
    temperature: [f64; 4],
    water_mm: f64,
    drought: DroughtTolerance,
    ph: (f64, f64),
    textures: &'static [SoilTexture],
    disallowed: &'static [SoilTexture],
    good_drainage: bool,
    coefficients: [f64; 10],
    seasons: &'static [Season],
    demand: MarketDemand,
    varieties: &'static [&'static str],
}

impl From<CropRow> for CropRecord {
    fn from(row: CropRow) -> Self {
        let [min, optimal_min, optimal_max, max] = row.temperature;
        CropRecord {
            id: row.id.to_string(),
            common_name: row.common_name.to_string(),
            scientific_name: row.scientific_name.to_string(),
            growth_days: row.growth_days,
            temperature: TemperatureRange { min, optimal_min, optimal_max, max },
            water_requirement_mm: row.water_mm,
            drought_tolerance: row.drought,
            soil: CropSoilRequirement {
                ph_min: row.ph.0,
                ph_max: row.ph.1,
                preferred_textures: row.textures.to_vec(),
                disallowed_textures: row.disallowed.to_vec(),
                requires_good_drainage: row.good_drainage,
            },
            regional_suitability: coefficients(row.coefficients),
            seasons: row.seasons.to_vec(),
            market_demand: Some(row.demand),
            varieties: row.varieties.iter().map(|v| v.to_string()).collect(),
        }
    }
}

fn builtin_crops() -> Vec<CropRecord> {
    use DroughtTolerance::{High, Low, Medium};
    use SoilTexture::{Clay, ClayLoam, Loam, Sandy};

    const KHARIF: &[Season] = &[Season::Kharif];
    const KHARIF_RABI: &[Season] = &[Season::Kharif, Season::Rabi];

    let rows = vec![
        // Millets
        CropRow {
            id: "BAJRA_01",
            common_name: "Bajra (Pearl Millet)",
            scientific_name: "Pennisetum glaucum",
            growth_days: 75,
            temperature: [20.0, 25.0, 35.0, 42.0],
            water_mm: 400.0,
            drought: High,
            ph: (6.0, 8.0),
            textures: &[Sandy, Loam],
            disallowed: &[Clay],
            good_drainage: true,
            coefficients: [0.85, 0.90, 0.80, 0.85, 0.88, 0.75, 0.82, 0.70, 0.78, 0.90],
            seasons: KHARIF,
            demand: MarketDemand::High,
            varieties: &["GHB-558", "GHB-732", "ICMH-356"],
        },
        CropRow {
            id: "JOWAR_01",
            common_name: "Jowar (Sorghum)",
            scientific_name: "Sorghum bicolor",
            growth_days: 85,
            temperature: [18.0, 25.0, 35.0, 40.0],
            water_mm: 450.0,
            drought: High,
            ph: (5.5, 8.5),
            textures: &[Clay, ClayLoam, Loam],
            disallowed: &[],
            good_drainage: true,
            coefficients: [0.88, 0.92, 0.85, 0.90, 0.90, 0.82, 0.88, 0.75, 0.85, 0.92],
            seasons: KHARIF_RABI,
            demand: MarketDemand::High,
            varieties: &["CSH-16", "CSV-15", "M-35-1"],
        },
        CropRow {
            id: "RAGI_01",
            common_name: "Ragi (Finger Millet)",
            scientific_name: "Eleusine coracana",
            growth_days: 80,
            temperature: [18.0, 22.0, 30.0, 35.0],
            water_mm: 500.0,
            drought: Medium,
            ph: (5.0, 8.2),
            textures: &[Loam, ClayLoam],
            disallowed: &[],
            good_drainage: true,
            coefficients: [0.75, 0.70, 0.80, 0.72, 0.70, 0.78, 0.75, 0.85, 0.82, 0.68],
            seasons: KHARIF,
            demand: MarketDemand::Moderate,
            varieties: &["GPU-28", "ML-365", "VL-149"],
        },
        CropRow {
            id: "FOXTAIL_01",
            common_name: "Foxtail Millet",
            scientific_name: "Setaria italica",
            growth_days: 70,
            temperature: [20.0, 25.0, 32.0, 38.0],
            water_mm: 350.0,
            drought: High,
            ph: (5.5, 7.5),
            textures: &[Sandy, Loam],
            disallowed: &[Clay],
            good_drainage: true,
            coefficients: [0.70, 0.75, 0.72, 0.73, 0.75, 0.70, 0.72, 0.68, 0.70, 0.75],
            seasons: KHARIF,
            demand: MarketDemand::Moderate,
            varieties: &["SiA-3156", "Prasad", "Lepakshi"],
        },
        // Pulses
        CropRow {
            id: "MOONG_01",
            common_name: "Green Gram (Moong)",
            scientific_name: "Vigna radiata",
            growth_days: 70,
            temperature: [20.0, 25.0, 35.0, 40.0],
            water_mm: 350.0,
            drought: Medium,
            ph: (6.0, 7.5),
            textures: &[Loam, ClayLoam],
            disallowed: &[],
            good_drainage: true,
            coefficients: [0.82, 0.85, 0.80, 0.83, 0.85, 0.82, 0.80, 0.75, 0.78, 0.85],
            seasons: KHARIF_RABI,
            demand: MarketDemand::High,
            varieties: &["Pusa-105", "SML-668", "IPM-02-3"],
        },
        CropRow {
            id: "URAD_01",
            common_name: "Black Gram (Urad)",
            scientific_name: "Vigna mungo",
            growth_days: 75,
            temperature: [20.0, 25.0, 35.0, 40.0],
            water_mm: 400.0,
            drought: Medium,
            ph: (6.5, 7.5),
            textures: &[Loam, ClayLoam],
            disallowed: &[],
            good_drainage: true,
            coefficients: [0.78, 0.80, 0.75, 0.78, 0.80, 0.77, 0.75, 0.72, 0.75, 0.80],
            seasons: KHARIF,
            demand: MarketDemand::High,
            varieties: &["TAU-1", "PU-31", "LBG-752"],
        },
        CropRow {
            id: "COWPEA_01",
            common_name: "Cowpea",
            scientific_name: "Vigna unguiculata",
            growth_days: 75,
            temperature: [20.0, 25.0, 35.0, 40.0],
            water_mm: 400.0,
            drought: High,
            ph: (5.5, 7.5),
            textures: &[Sandy, Loam, ClayLoam],
            disallowed: &[],
            good_drainage: false,
            coefficients: [0.80, 0.82, 0.78, 0.80, 0.82, 0.80, 0.78, 0.75, 0.77, 0.82],
            seasons: KHARIF,
            demand: MarketDemand::Moderate,
            varieties: &["Pusa-578", "Arka-Garima", "Kashi-Kanchan"],
        },
        CropRow {
            id: "GUAR_01",
            common_name: "Cluster Bean (Guar)",
            scientific_name: "Cyamopsis tetragonoloba",
            growth_days: 85,
            temperature: [20.0, 25.0, 35.0, 42.0],
            water_mm: 350.0,
            drought: High,
            ph: (6.0, 8.5),
            textures: &[Sandy, Loam],
            disallowed: &[Clay],
            good_drainage: true,
            coefficients: [0.75, 0.85, 0.70, 0.78, 0.82, 0.72, 0.75, 0.65, 0.70, 0.85],
            seasons: KHARIF,
            demand: MarketDemand::Moderate,
            varieties: &["RGC-1066", "HG-563", "Pusa-Navbahar"],
        },
        // Oilseeds
        CropRow {
            id: "SESAME_01",
            common_name: "Sesame (Til)",
            scientific_name: "Sesamum indicum",
            growth_days: 85,
            temperature: [20.0, 25.0, 35.0, 40.0],
            water_mm: 400.0,
            drought: Medium,
            ph: (5.5, 8.0),
            textures: &[Loam, ClayLoam],
            disallowed: &[],
            good_drainage: true,
            coefficients: [0.75, 0.78, 0.72, 0.75, 0.77, 0.73, 0.75, 0.70, 0.72, 0.78],
            seasons: KHARIF_RABI,
            demand: MarketDemand::High,
            varieties: &["Phule-Til", "N-32", "TKG-22"],
        },
        CropRow {
            id: "SUNFLOWER_01",
            common_name: "Sunflower (Short-duration)",
            scientific_name: "Helianthus annuus",
            growth_days: 85,
            temperature: [15.0, 20.0, 30.0, 35.0],
            water_mm: 500.0,
            drought: Medium,
            ph: (6.0, 7.5),
            textures: &[Loam, ClayLoam],
            disallowed: &[],
            good_drainage: true,
            coefficients: [0.80, 0.75, 0.82, 0.80, 0.75, 0.80, 0.78, 0.82, 0.80, 0.73],
            seasons: KHARIF_RABI,
            demand: MarketDemand::High,
            varieties: &["KBSH-44", "Phule-Bhaskar", "DRSH-1"],
        },
        CropRow {
            id: "SOYBEAN_01",
            common_name: "Soybean (Early variety)",
            scientific_name: "Glycine max",
            growth_days: 85,
            temperature: [20.0, 25.0, 30.0, 35.0],
            water_mm: 500.0,
            drought: Medium,
            ph: (6.0, 7.5),
            textures: &[Loam, ClayLoam],
            disallowed: &[],
            good_drainage: false,
            coefficients: [0.78, 0.72, 0.80, 0.77, 0.73, 0.82, 0.75, 0.80, 0.78, 0.70],
            seasons: KHARIF,
            demand: MarketDemand::High,
            varieties: &["JS-335", "MAUS-71", "Phule-Kalyani"],
        },
        // Vegetables
        CropRow {
            id: "TOMATO_01",
            common_name: "Tomato (Short-duration)",
            scientific_name: "Solanum lycopersicum",
            growth_days: 75,
            temperature: [15.0, 20.0, 28.0, 35.0],
            water_mm: 600.0,
            drought: Low,
            ph: (6.0, 7.0),
            textures: &[Loam, ClayLoam],
            disallowed: &[],
            good_drainage: true,
            coefficients: [0.85, 0.70, 0.88, 0.80, 0.72, 0.82, 0.78, 0.85, 0.83, 0.68],
            seasons: KHARIF_RABI,
            demand: MarketDemand::High,
            varieties: &["Abhinav", "Pusa-Ruby", "Arka-Vikas"],
        },
        CropRow {
            id: "BRINJAL_01",
            common_name: "Brinjal (Eggplant)",
            scientific_name: "Solanum melongena",
            growth_days: 80,
            temperature: [18.0, 22.0, 30.0, 38.0],
            water_mm: 550.0,
            drought: Medium,
            ph: (5.5, 7.0),
            textures: &[Loam, ClayLoam],
            disallowed: &[],
            good_drainage: true,
            coefficients: [0.82, 0.75, 0.85, 0.80, 0.75, 0.82, 0.80, 0.85, 0.82, 0.72],
            seasons: KHARIF_RABI,
            demand: MarketDemand::High,
            varieties: &["Pusa-Purple-Long", "Arka-Shirish", "Phule-Prakash"],
        },
        CropRow {
            id: "OKRA_01",
            common_name: "Okra (Bhindi)",
            scientific_name: "Abelmoschus esculentus",
            growth_days: 70,
            temperature: [20.0, 25.0, 35.0, 40.0],
            water_mm: 500.0,
            drought: Medium,
            ph: (6.0, 7.5),
            textures: &[Loam, ClayLoam],
            disallowed: &[],
            good_drainage: true,
            coefficients: [0.80, 0.78, 0.82, 0.80, 0.78, 0.82, 0.80, 0.82, 0.80, 0.75],
            seasons: KHARIF_RABI,
            demand: MarketDemand::High,
            varieties: &["Pusa-Sawani", "Arka-Anamika", "Phule-Utkarsha"],
        },
        CropRow {
            id: "BOTTLEGOURD_01",
            common_name: "Bottle Gourd (Lauki)",
            scientific_name: "Lagenaria siceraria",
            growth_days: 75,
            temperature: [18.0, 22.0, 32.0, 38.0],
            water_mm: 550.0,
            drought: Medium,
            ph: (6.0, 7.5),
            textures: &[Loam, ClayLoam],
            disallowed: &[],
            good_drainage: false,
            coefficients: [0.78, 0.72, 0.80, 0.77, 0.73, 0.80, 0.75, 0.80, 0.78, 0.70],
            seasons: KHARIF_RABI,
            demand: MarketDemand::Moderate,
            varieties: &["Pusa-Summer-Prolific-Long", "Arka-Bahar", "Samrat"],
        },
    ];

    rows.into_iter().map(CropRecord::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = CropCatalog::builtin();
        assert_eq!(catalog.len(), 15);
        for crop in catalog.all_crops() {
            crop.validate().unwrap();
            assert_eq!(crop.regional_suitability.len(), 10, "{}", crop.id);
            assert!((70..=90).contains(&crop.growth_days), "{}", crop.id);
        }
    }

    #[test]
    fn test_get_crop() {
        let catalog = CropCatalog::builtin();
        let jowar = catalog.get_crop("JOWAR_01").unwrap();
        assert_eq!(jowar.common_name, "Jowar (Sorghum)");
        assert_eq!(jowar.soil.primary_texture(), Some(SoilTexture::Clay));
        assert_eq!(jowar.regional_coefficient("PUNE"), Some(0.88));
        assert!(jowar.grown_in(Season::Rabi));
        assert!(catalog.get_crop("WHEAT_01").is_none());
    }

    #[test]
    fn test_drought_tolerance_scores() {
        assert_eq!(DroughtTolerance::Low.score(), 40.0);
        assert_eq!(DroughtTolerance::Medium.score(), 70.0);
        assert_eq!(DroughtTolerance::High.score(), 100.0);
        let parsed: DroughtTolerance = serde_json::from_str("\"Moderate\"").unwrap();
        assert_eq!(parsed, DroughtTolerance::Medium);
    }

    #[test]
    fn test_validate_rejects_bad_coefficient() {
        let mut crop = CropCatalog::builtin().get_crop("BAJRA_01").unwrap().clone();
        crop.regional_suitability.insert("PUNE".to_string(), 1.4);
        assert!(crop.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_temperature() {
        let mut crop = CropCatalog::builtin().get_crop("OKRA_01").unwrap().clone();
        crop.temperature.optimal_min = 38.0;
        assert!(crop.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let catalog = CropCatalog::builtin();
        let json = serde_json::json!({ "crops": catalog.all_crops() });
        let path = std::env::temp_dir().join("crop_catalog_roundtrip_test.json");
        std::fs::write(&path, json.to_string()).unwrap();

        let loaded = CropCatalog::from_json_file(&path).unwrap();
        assert_eq!(loaded.len(), catalog.len());
        assert_eq!(loaded.get_crop("MOONG_01"), catalog.get_crop("MOONG_01"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let moong = CropCatalog::builtin().get_crop("MOONG_01").unwrap().clone();
        let json = serde_json::json!({ "crops": [moong.clone(), moong] });
        let path = std::env::temp_dir().join("crop_catalog_duplicate_test.json");
        std::fs::write(&path, json.to_string()).unwrap();

        let err = CropCatalog::from_json_file(&path).unwrap_err();
        assert!(err.to_string().contains("duplicate id"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = CropCatalog::from_json_file("/nonexistent/crops.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read crop file"));
    }
}
