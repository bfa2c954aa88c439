//! Region Catalog
//!
//! Agricultural districts with coordinates, climate zone, default soil and
//! supported seasons. Lookup by id or by nearest haversine distance.

use anyhow::{bail, Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::season::Season;
use crate::soil::{Drainage, OrganicMatter, SoilProfile, SoilTexture};
use crate::utils::haversine_km;

/// Default radius for coordinate lookups (km)
pub const DEFAULT_NEAREST_REGION_KM: f64 = 50.0;

/// One agricultural region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,

    /// Elevation (m)
    pub elevation: f64,

    /// e.g. "Semi-Arid", "Sub-Humid"
    pub climate_zone: String,

    /// Used when the caller supplies no soil profile
    pub default_soil: SoilProfile,

    /// Non-empty; the first entry is the fallback season
    pub supported_seasons: Vec<Season>,
}

impl Region {
    pub fn supports(&self, season: Season) -> bool {
        self.supported_seasons.contains(&season)
    }

    /// Distance from a coordinate (km)
    pub fn distance_km(&self, latitude: f64, longitude: f64) -> f64 {
        haversine_km(latitude, longitude, self.latitude, self.longitude)
    }
}

#[derive(Deserialize)]
struct RegionFile {
    regions: Vec<Region>,
}

/// Immutable region table with an id index
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    regions: Vec<Region>,
    index: FxHashMap<String, usize>,
    nearest_radius_km: f64,
}

impl RegionCatalog {
    pub fn new(regions: Vec<Region>) -> Self {
        let index = regions
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        Self {
            regions,
            index,
            nearest_radius_km: DEFAULT_NEAREST_REGION_KM,
        }
    }

    /// Override the radius used by `nearest_region`
    pub fn with_nearest_radius_km(mut self, km: f64) -> Self {
        self.nearest_radius_km = km;
        self
    }

    /// Built-in table of Maharashtra districts
    pub fn builtin() -> Self {
        Self::new(builtin_regions())
    }

    /// Load a `{"regions": [...]}` JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read region file {}", path.display()))?;
        let file: RegionFile = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse region file {}", path.display()))?;

        for region in &file.regions {
            if region.supported_seasons.is_empty() {
                bail!("region {}: no supported seasons", region.id);
            }
        }

        tracing::info!(count = file.regions.len(), path = %path.display(), "Loaded region catalog");
        Ok(Self::new(file.regions))
    }

    pub fn get_region(&self, region_id: &str) -> Option<&Region> {
        self.index.get(region_id).map(|&i| &self.regions[i])
    }

    /// Closest region within the lookup radius, if any
    pub fn nearest_region(&self, latitude: f64, longitude: f64) -> Option<&Region> {
        self.nearest_region_within(latitude, longitude, self.nearest_radius_km)
    }

    pub fn nearest_region_within(
        &self,
        latitude: f64,
        longitude: f64,
        max_distance_km: f64,
    ) -> Option<&Region> {
        let (region, distance) = self
            .regions
            .iter()
            .map(|r| (r, r.distance_km(latitude, longitude)))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        if distance <= max_distance_km {
            tracing::debug!(region = %region.id, distance_km = distance, "Nearest region found");
            Some(region)
        } else {
            tracing::debug!(
                nearest = %region.id,
                distance_km = distance,
                max_distance_km,
                "No region within radius"
            );
            None
        }
    }

    pub fn all_regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn nearest_radius_km(&self) -> f64 {
        self.nearest_radius_km
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_regions() -> Vec<Region> {
    use Drainage::{Good, Moderate, Poor};
    use OrganicMatter::{High, Low, Medium};
    use SoilTexture::{Clay, ClayLoam, Loam, Sandy};

    // (id, name, lat, lon, elevation, zone, (texture, ph, organic matter, drainage))
    let rows: [(&str, &str, f64, f64, f64, &str, (SoilTexture, f64, OrganicMatter, Drainage)); 10] = [
        ("PUNE", "Pune District", 18.5204, 73.8567, 560.0, "Semi-Arid", (ClayLoam, 7.2, Medium, Moderate)),
        ("SOLAPUR", "Solapur District", 17.6599, 75.9064, 458.0, "Semi-Arid", (Clay, 7.8, Low, Poor)),
        ("NASHIK", "Nashik District", 19.9975, 73.7898, 565.0, "Sub-Humid", (Loam, 6.8, Medium, Good)),
        ("AHMEDNAGAR", "Ahmednagar District", 19.0948, 74.7480, 649.0, "Semi-Arid", (ClayLoam, 7.5, Medium, Moderate)),
        ("AURANGABAD", "Aurangabad District", 19.8762, 75.3433, 568.0, "Semi-Arid", (Clay, 7.6, Low, Moderate)),
        ("JALGAON", "Jalgaon District", 21.0077, 75.5626, 209.0, "Sub-Humid", (ClayLoam, 7.0, Medium, Good)),
        ("SANGLI", "Sangli District", 16.8524, 74.5815, 549.0, "Semi-Arid", (Sandy, 7.4, Low, Good)),
        ("KOLHAPUR", "Kolhapur District", 16.7050, 74.2433, 569.0, "Sub-Humid", (Loam, 6.5, High, Good)),
        ("SATARA", "Satara District", 17.6805, 74.0183, 625.0, "Sub-Humid", (Loam, 6.8, Medium, Good)),
        ("LATUR", "Latur District", 18.3983, 76.5604, 636.0, "Semi-Arid", (Clay, 7.9, Low, Poor)),
    ];

    rows.into_iter()
        .map(|(id, name, latitude, longitude, elevation, zone, (texture, ph, om, drainage))| Region {
            id: id.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
            elevation,
            climate_zone: zone.to_string(),
            // Literal pH values above are all within 0-14
            default_soil: SoilProfile {
                texture,
                ph,
                organic_matter: om,
                drainage,
            },
            supported_seasons: vec![Season::Kharif, Season::Rabi],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_regions() {
        let catalog = RegionCatalog::builtin();
        assert_eq!(catalog.len(), 10);
        for region in catalog.all_regions() {
            region.default_soil.validate().unwrap();
            assert_eq!(region.supported_seasons.first(), Some(&Season::Kharif));
        }
    }

    #[test]
    fn test_get_region() {
        let catalog = RegionCatalog::builtin();
        let pune = catalog.get_region("PUNE").unwrap();
        assert_eq!(pune.name, "Pune District");
        assert_eq!(pune.default_soil.drainage, Drainage::Moderate);
        assert!(pune.supports(Season::Rabi));
        assert!(!pune.supports(Season::Zaid));
        assert!(catalog.get_region("MUMBAI").is_none());
    }

    #[test]
    fn test_nearest_region_within_radius() {
        let catalog = RegionCatalog::builtin();
        // A few km from Pune city centre
        let region = catalog.nearest_region(18.55, 73.90).unwrap();
        assert_eq!(region.id, "PUNE");
    }

    #[test]
    fn test_nearest_region_outside_radius() {
        let catalog = RegionCatalog::builtin();
        // Mumbai is ~120 km from Pune
        assert!(catalog.nearest_region(19.0760, 72.8777).is_none());
        assert!(catalog.nearest_region_within(19.0760, 72.8777, 200.0).is_some());
    }

    #[test]
    fn test_custom_radius() {
        let catalog = RegionCatalog::builtin().with_nearest_radius_km(500.0);
        assert_eq!(catalog.nearest_region(19.0760, 72.8777).map(|r| r.id.as_str()), Some("PUNE"));
    }

    #[test]
    fn test_empty_catalog_has_no_nearest() {
        let catalog = RegionCatalog::new(Vec::new());
        assert!(catalog.nearest_region(18.5, 73.8).is_none());
    }
}
