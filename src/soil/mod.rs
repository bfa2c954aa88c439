//! Soil Profile and Compatibility
//!
//! ## Architecture
//!
//! - `profile`: closed soil enums + validated SoilProfile
//! - `compatibility`: soil score (0-100) and amendment suggestions per crop

pub mod compatibility;
pub mod profile;

pub use compatibility::{amendment_suggestions, assess_soil, soil_score, SoilCompatibility};
pub use profile::{Drainage, OrganicMatter, SoilProfile, SoilTexture};
