//! The deterministic scoring core: per-domain risk calculators, the weighted
//! composite scorer, the risk-tier classifier, and the flag deriver.
//!
//! Everything in this module is a pure function over value types; weight
//! tables and thresholds are shared read-only constants, so the core can be
//! invoked concurrently across subjects with no coordination.

mod composite;
mod domains;
mod flags;
mod tier;

pub use composite::{composite_score, DomainWeights, DOMAIN_WEIGHTS};
pub use domains::{
    employment_risk, food_security_risk, healthcare_access_risk, housing_risk, mental_health_risk,
    social_support_risk, transportation_risk, utilities_risk, MAX_DOMAIN_SCORE,
};
pub use flags::{derive_flags, RiskFlags, FLAG_THRESHOLD};
pub use tier::{classify_risk_tier, RiskTier};

pub(crate) use tier::classify_descending;

use crate::encounters::Encounter;
use serde::{Deserialize, Serialize};

/// The eight per-domain risk scores for one subject, each in [0,100].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainScores {
    pub housing: f64,
    pub food_security: f64,
    pub transportation: f64,
    pub employment: f64,
    pub social_support: f64,
    pub healthcare_access: f64,
    pub utilities: f64,
    pub mental_health: f64,
}

impl DomainScores {
    /// Score every domain of an encounter. Absent sub-records score zero.
    pub fn for_encounter(encounter: &Encounter) -> Self {
        Self {
            housing: housing_risk(encounter.housing.as_ref()),
            food_security: food_security_risk(encounter.food_security.as_ref()),
            transportation: transportation_risk(encounter.transportation.as_ref()),
            employment: employment_risk(encounter.employment.as_ref()),
            social_support: social_support_risk(encounter.social_support.as_ref()),
            healthcare_access: healthcare_access_risk(encounter.healthcare_access.as_ref()),
            utilities: utilities_risk(encounter.utilities.as_ref()),
            mental_health: mental_health_risk(encounter.mental_health.as_ref()),
        }
    }
}

/// Round to the 1-decimal precision stored on score records.
pub(crate) fn round_score(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
