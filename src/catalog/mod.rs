//! Static Catalogs
//!
//! ## Architecture
//!
//! - `crops`: CropRecord, CropCatalog (built-in table + JSON loading)
//! - `regions`: Region, RegionCatalog (id and nearest-coordinate lookup)

pub mod crops;
pub mod regions;

pub use crops::{
    CropCatalog, CropRecord, CropSoilRequirement, DroughtTolerance, MarketDemand, TemperatureRange,
};
pub use regions::{Region, RegionCatalog, DEFAULT_NEAREST_REGION_KM};
