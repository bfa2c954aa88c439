//! Risk Assessor
//!
//! Ordered rule table, first match wins. Severity is a property of the note.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::DroughtTolerance;

/// Dry spells longer than this count as a stress factor (days)
pub const DRY_SPELL_THRESHOLD_DAYS: f64 = 7.0;

/// Deficit fraction that compounds a dry spell for low-tolerance crops
const MULTI_STRESS_DEFICIT: f64 = 0.4;

/// Degrees beyond the absolute min/max counted as temperature stress
const TEMPERATURE_STRESS_C: f64 = 3.0;

/// Deficit fraction flagged on its own
const WATER_DEFICIT: f64 = 0.25;

/// Severity tier of a risk note
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskSeverity {
    Low,
    Moderate,
    High,
}

impl RiskSeverity {
    pub fn display_text(&self) -> &'static str {
        match self {
            RiskSeverity::Low => "Low Risk",
            RiskSeverity::Moderate => "Moderate Risk",
            RiskSeverity::High => "High Risk",
        }
    }
}

/// Qualitative risk annotation for one crop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskNote {
    #[serde(rename = "High Risk: Multiple stress factors")]
    MultipleStressFactors,
    #[serde(rename = "High Risk: Temperature stress")]
    TemperatureStress,
    #[serde(rename = "Moderate Risk: Water deficit expected")]
    WaterDeficit,
    #[serde(rename = "Moderate Risk: Dry-spell possibility")]
    DrySpell,
    #[serde(rename = "Low Risk: Suitable conditions")]
    Suitable,
}

impl RiskNote {
    pub fn label(&self) -> &'static str {
        match self {
            RiskNote::MultipleStressFactors => "High Risk: Multiple stress factors",
            RiskNote::TemperatureStress => "High Risk: Temperature stress",
            RiskNote::WaterDeficit => "Moderate Risk: Water deficit expected",
            RiskNote::DrySpell => "Moderate Risk: Dry-spell possibility",
            RiskNote::Suitable => "Low Risk: Suitable conditions",
        }
    }

    pub fn severity(&self) -> RiskSeverity {
        match self {
            RiskNote::MultipleStressFactors | RiskNote::TemperatureStress => RiskSeverity::High,
            RiskNote::WaterDeficit | RiskNote::DrySpell => RiskSeverity::Moderate,
            RiskNote::Suitable => RiskSeverity::Low,
        }
    }
}

impl fmt::Display for RiskNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inputs to the rule table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskInputs {
    /// Expected longest dry spell (days)
    pub dry_spell_days: f64,
    /// Uncovered water deficit as a fraction of the requirement
    pub deficit_fraction: f64,
    /// Degrees beyond the crop's absolute min/max
    pub temperature_deviation: f64,
    pub drought_tolerance: DroughtTolerance,
}

type RiskRule = (fn(&RiskInputs) -> bool, RiskNote);

const RISK_RULES: &[RiskRule] = &[
    (
        |r: &RiskInputs| {
            r.dry_spell_days > DRY_SPELL_THRESHOLD_DAYS
                && r.deficit_fraction > MULTI_STRESS_DEFICIT
                && r.drought_tolerance == DroughtTolerance::Low
        },
        RiskNote::MultipleStressFactors,
    ),
    (
        |r: &RiskInputs| r.temperature_deviation > TEMPERATURE_STRESS_C,
        RiskNote::TemperatureStress,
    ),
    (|r: &RiskInputs| r.deficit_fraction > WATER_DEFICIT, RiskNote::WaterDeficit),
    (|r: &RiskInputs| r.dry_spell_days > DRY_SPELL_THRESHOLD_DAYS, RiskNote::DrySpell),
];

/// First matching rule, or `Suitable`
pub fn assess_risk(inputs: &RiskInputs) -> RiskNote {
    RISK_RULES
        .iter()
        .find(|(applies, _)| applies(inputs))
        .map(|(_, note)| *note)
        .unwrap_or(RiskNote::Suitable)
}
