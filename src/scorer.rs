//! Suitability Scorer - weighted composite of the per-crop sub-scores
//!
//! Weights: temperature 25%, water 25%, soil 15%, regional coefficient 15%,
//! seasonal 10%, drought tolerance 10%. Each sub-score is clamped to
//! [0, 100] before weighting and the composite is clamped again.

use serde::Serialize;

use crate::catalog::CropRecord;
use crate::metrics::temperature_score;
use crate::season::SeasonalEligibility;
use crate::utils::normalization::serialize_display_score;
use crate::utils::{clamp_score, SCORE_MAX};

/// Sub-score weights (sum to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SuitabilityWeights {
    pub temperature: f64,
    pub water: f64,
    pub soil: f64,
    pub regional: f64,
    pub seasonal: f64,
    pub drought: f64,
}

pub const WEIGHTS: SuitabilityWeights = SuitabilityWeights {
    temperature: 0.25,
    water: 0.25,
    soil: 0.15,
    regional: 0.15,
    seasonal: 0.10,
    drought: 0.10,
};

/// The six sub-scores of one crop (each 0-100)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubScores {
    #[serde(serialize_with = "serialize_display_score")]
    pub temperature: f64,
    #[serde(serialize_with = "serialize_display_score")]
    pub water: f64,
    #[serde(serialize_with = "serialize_display_score")]
    pub soil: f64,
    #[serde(serialize_with = "serialize_display_score")]
    pub regional: f64,
    #[serde(serialize_with = "serialize_display_score")]
    pub seasonal: f64,
    #[serde(serialize_with = "serialize_display_score")]
    pub drought: f64,
}

impl SubScores {
    fn clamped(self) -> Self {
        Self {
            temperature: clamp_score(self.temperature),
            water: clamp_score(self.water),
            soil: clamp_score(self.soil),
            regional: clamp_score(self.regional),
            seasonal: clamp_score(self.seasonal),
            drought: clamp_score(self.drought),
        }
    }
}

/// Per-crop inputs already computed by the other scorers
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs {
    pub expected_temp_c: f64,
    pub water_score: f64,
    pub soil_score: f64,
    pub regional_coefficient: f64,
    pub eligibility: SeasonalEligibility,
}

/// Combines sub-scores into the final suitability score
#[derive(Debug, Clone, Copy)]
pub struct SuitabilityScorer {
    weights: SuitabilityWeights,
}

impl Default for SuitabilityScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SuitabilityScorer {
    pub fn new() -> Self {
        Self { weights: WEIGHTS }
    }

    pub fn weights(&self) -> &SuitabilityWeights {
        &self.weights
    }

    /// Build the clamped sub-score set for a crop
    pub fn sub_scores(&self, crop: &CropRecord, inputs: &ScoreInputs) -> SubScores {
        SubScores {
            temperature: temperature_score(inputs.expected_temp_c, &crop.temperature),
            water: inputs.water_score,
            soil: inputs.soil_score,
            regional: inputs.regional_coefficient * SCORE_MAX,
            seasonal: inputs.eligibility.score(),
            drought: crop.drought_tolerance.score(),
        }
        .clamped()
    }

    /// Weighted composite (0-100, full precision)
    pub fn composite(&self, scores: &SubScores) -> f64 {
        let s = scores.clamped();
        let w = &self.weights;
        clamp_score(
            w.temperature * s.temperature
                + w.water * s.water
                + w.soil * s.soil
                + w.regional * s.regional
                + w.seasonal * s.seasonal
                + w.drought * s.drought,
        )
    }

    /// Sub-scores and composite in one call
    pub fn score(&self, crop: &CropRecord, inputs: &ScoreInputs) -> (SubScores, f64) {
        let sub = self.sub_scores(crop, inputs);
        let total = self.composite(&sub);
        (sub, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CropCatalog;
    use approx::assert_relative_eq;

    #[test]
    fn test_weights_sum_to_one() {
        let w = WEIGHTS;
        let sum = w.temperature + w.water + w.soil + w.regional + w.seasonal + w.drought;
        assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_perfect_scores() {
        let scorer = SuitabilityScorer::new();
        let all = SubScores {
            temperature: 100.0,
            water: 100.0,
            soil: 100.0,
            regional: 100.0,
            seasonal: 100.0,
            drought: 100.0,
        };
        assert_relative_eq!(scorer.composite(&all), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_out_of_range_sub_scores_clamped() {
        let scorer = SuitabilityScorer::new();
        let wild = SubScores {
            temperature: 250.0,
            water: -40.0,
            soil: 100.0,
            regional: 100.0,
            seasonal: 100.0,
            drought: 100.0,
        };
        // 25 + 0 + 15 + 15 + 10 + 10
        assert_relative_eq!(scorer.composite(&wild), 75.0, epsilon = 1e-9);
    }

    #[test]
    fn test_jowar_in_pune_rabi() {
        let catalog = CropCatalog::builtin();
        let jowar = catalog.get_crop("JOWAR_01").unwrap();
        let scorer = SuitabilityScorer::new();
        let (sub, total) = scorer.score(
            jowar,
            &ScoreInputs {
                expected_temp_c: 24.0,
                water_score: 67.975,
                soil_score: 100.0,
                regional_coefficient: 0.88,
                eligibility: SeasonalEligibility::InSeason,
            },
        );
        assert_relative_eq!(sub.temperature, 85.714, epsilon = 0.001);
        assert_relative_eq!(sub.regional, 88.0, epsilon = 1e-9);
        assert_eq!(sub.drought, 100.0);
        assert_relative_eq!(total, 86.62, epsilon = 0.01);
    }

    #[test]
    fn test_incoming_season_halves_seasonal_score() {
        let catalog = CropCatalog::builtin();
        let okra = catalog.get_crop("OKRA_01").unwrap();
        let sub = SuitabilityScorer::new().sub_scores(
            okra,
            &ScoreInputs {
                expected_temp_c: 28.0,
                water_score: 80.0,
                soil_score: 90.0,
                regional_coefficient: 0.8,
                eligibility: SeasonalEligibility::IncomingOnly,
            },
        );
        assert_eq!(sub.seasonal, 50.0);
    }

    #[test]
    fn test_sub_scores_serialize_rounded() {
        let sub = SubScores {
            temperature: 85.714285,
            water: 67.97,
            soil: 100.0,
            regional: 88.0,
            seasonal: 100.0,
            drought: 100.0,
        };
        let json = serde_json::to_value(sub).unwrap();
        assert_eq!(json["temperature"], 85.7);
        assert_eq!(json["water"], 68.0);
    }
}
