//! Boolean per-domain risk flags used for population prevalence reporting.

use super::DomainScores;
use serde::{Deserialize, Serialize};

/// A domain is flagged once its score reaches this threshold.
pub const FLAG_THRESHOLD: f64 = 50.0;

/// The six user-facing risk flags.
///
/// Utilities and mental-health scores feed the composite only; they never
/// produce a public flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFlags {
    pub housing_risk: bool,
    pub food_risk: bool,
    pub transportation_risk: bool,
    pub employment_risk: bool,
    pub social_isolation_risk: bool,
    pub healthcare_access_risk: bool,
}

pub fn derive_flags(scores: &DomainScores) -> RiskFlags {
    RiskFlags {
        housing_risk: scores.housing >= FLAG_THRESHOLD,
        food_risk: scores.food_security >= FLAG_THRESHOLD,
        transportation_risk: scores.transportation >= FLAG_THRESHOLD,
        employment_risk: scores.employment >= FLAG_THRESHOLD,
        social_isolation_risk: scores.social_support >= FLAG_THRESHOLD,
        healthcare_access_risk: scores.healthcare_access >= FLAG_THRESHOLD,
    }
}
