//! Soil Compatibility Scorer
//!
//! Scores a soil profile against a crop's soil requirement (0-100) and
//! produces advisory amendment text. Amendments never affect the score.

use serde::Serialize;

use super::profile::{Drainage, OrganicMatter, SoilProfile, SoilTexture};
use crate::catalog::CropSoilRequirement;
use crate::metrics::comparator::{compare_to_range, RangeFit};
use crate::utils::clamp_score;

/// Penalty per pH unit beyond the crop's range
const PH_PENALTY_PER_UNIT: f64 = 25.0;

const PRIMARY_TEXTURE_BONUS: f64 = 10.0;
const DISALLOWED_TEXTURE_PENALTY: f64 = 15.0;

/// pH gap that triggers a lime/sulfur suggestion
const PH_AMENDMENT_THRESHOLD: f64 = 0.5;

/// pH gap above which the heavier application rate is suggested
const PH_HEAVY_AMENDMENT_THRESHOLD: f64 = 1.0;

/// Soil score plus advisory amendments for one crop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoilCompatibility {
    /// 0-100
    pub score: f64,
    pub amendments: Vec<String>,
}

/// Compatibility score (0-100) of a soil profile for a crop
pub fn soil_score(soil: &SoilProfile, req: &CropSoilRequirement) -> f64 {
    let mut score = 100.0;

    score -= ph_penalty(soil.ph, req);
    score += texture_adjustment(soil.texture, req);
    score -= drainage_penalty(soil.drainage, req);

    clamp_score(score)
}

/// Score and amendment suggestions together
pub fn assess_soil(soil: &SoilProfile, req: &CropSoilRequirement) -> SoilCompatibility {
    SoilCompatibility {
        score: soil_score(soil, req),
        amendments: amendment_suggestions(soil, req),
    }
}

fn ph_penalty(ph: f64, req: &CropSoilRequirement) -> f64 {
    let comp = compare_to_range(ph, req.ph_min, req.ph_max);
    if comp.is_within_range() {
        return 0.0;
    }
    let excess = (ph - comp.midpoint()).abs() - comp.half_width();
    (PH_PENALTY_PER_UNIT * excess).clamp(0.0, 100.0)
}

fn texture_adjustment(texture: SoilTexture, req: &CropSoilRequirement) -> f64 {
    if req.disallows(texture) {
        -DISALLOWED_TEXTURE_PENALTY
    } else if req.primary_texture() == Some(texture) {
        PRIMARY_TEXTURE_BONUS
    } else {
        0.0
    }
}

fn drainage_penalty(drainage: Drainage, req: &CropSoilRequirement) -> f64 {
    if !req.requires_good_drainage {
        return 0.0;
    }
    match drainage {
        Drainage::Poor => 20.0,
        Drainage::Moderate => 5.0,
        Drainage::Good => 0.0,
    }
}

/// Advisory amendment text for a soil/crop pair
pub fn amendment_suggestions(soil: &SoilProfile, req: &CropSoilRequirement) -> Vec<String> {
    let mut suggestions = Vec::new();

    let comp = compare_to_range(soil.ph, req.ph_min, req.ph_max);
    match comp.fit {
        RangeFit::BelowRange if comp.distance_from_range > PH_AMENDMENT_THRESHOLD => {
            let rate = if comp.distance_from_range > PH_HEAVY_AMENDMENT_THRESHOLD {
                "2-3 tons/ha"
            } else {
                "1-2 tons/ha"
            };
            suggestions.push(format!(
                "Add lime to raise pH from {:.1} to at least {:.1} (apply {} of agricultural lime)",
                soil.ph, req.ph_min, rate
            ));
        }
        RangeFit::AboveRange if comp.distance_from_range > PH_AMENDMENT_THRESHOLD => {
            let rate = if comp.distance_from_range > PH_HEAVY_AMENDMENT_THRESHOLD {
                "200-300 kg/ha"
            } else {
                "100-150 kg/ha"
            };
            suggestions.push(format!(
                "Add sulfur to lower pH from {:.1} to {:.1} (apply {} of elemental sulfur)",
                soil.ph, req.ph_max, rate
            ));
        }
        _ => {}
    }

    if !req.prefers(soil.texture) {
        if let Some(text) = texture_advice(soil.texture) {
            suggestions.push(text.to_string());
        }
    }

    if soil.drainage == Drainage::Poor {
        suggestions.push(
            "Improve drainage with field drainage channels or raised beds".to_string(),
        );
    }

    if soil.organic_matter == OrganicMatter::Low {
        suggestions.push(
            "Increase organic matter with compost or farmyard manure (10-15 tons/ha annually)"
                .to_string(),
        );
    }

    suggestions
}

fn texture_advice(texture: SoilTexture) -> Option<&'static str> {
    match texture {
        SoilTexture::Clay => Some(
            "Add sand and organic matter to improve clay structure and drainage \
             (5-10 tons/ha of well-decomposed compost)",
        ),
        SoilTexture::Sandy => Some(
            "Add organic matter to improve water retention of sandy soil \
             (10-15 tons/ha of compost or farmyard manure)",
        ),
        SoilTexture::Silty => Some(
            "Add organic matter to stabilise silty soil and reduce crusting",
        ),
        SoilTexture::ClayLoam => Some(
            "Add organic matter to keep clay-loam friable and well aerated",
        ),
        SoilTexture::Loam => None,
    }
}
