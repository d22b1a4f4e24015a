//! Ordinal risk-tier classification of the composite score.

use serde::{Deserialize, Serialize};

/// Care-coordination tier driven by the composite score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    #[default]
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskTier {
    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Moderate => "moderate",
            RiskTier::High => "high",
            RiskTier::VeryHigh => "very_high",
        }
    }
}

/// Walk bands in descending order of floor and return the first whose floor
/// the value reaches. Shared by the tier classifier and the benchmark gap
/// classifier, which follow the same ordered-threshold shape.
pub(crate) fn classify_descending<T: Copy>(value: f64, bands: &[(f64, T)], fallback: T) -> T {
    bands
        .iter()
        .find(|(floor, _)| value >= *floor)
        .map(|(_, class)| *class)
        .unwrap_or(fallback)
}

const TIER_BANDS: [(f64, RiskTier); 3] = [
    (70.0, RiskTier::VeryHigh),
    (50.0, RiskTier::High),
    (30.0, RiskTier::Moderate),
];

/// Total, boundary-inclusive-at-top mapping from composite score to tier.
pub fn classify_risk_tier(composite: f64) -> RiskTier {
    classify_descending(composite, &TIER_BANDS, RiskTier::Low)
}
