//! Weighted composite scorer.

use super::{round_score, DomainScores, MAX_DOMAIN_SCORE};
use serde::{Deserialize, Serialize};

/// Fixed per-domain weights applied when collapsing the eight domain scores
/// into the composite. Any revision must keep the weights summing to 1.00.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainWeights {
    pub housing: f64,
    pub food_security: f64,
    pub transportation: f64,
    pub employment: f64,
    pub social_support: f64,
    pub healthcare_access: f64,
    pub utilities: f64,
    pub mental_health: f64,
}

impl DomainWeights {
    pub fn sum(&self) -> f64 {
        self.housing
            + self.food_security
            + self.transportation
            + self.employment
            + self.social_support
            + self.healthcare_access
            + self.utilities
            + self.mental_health
    }
}

pub const DOMAIN_WEIGHTS: DomainWeights = DomainWeights {
    housing: 0.20,
    food_security: 0.15,
    transportation: 0.15,
    employment: 0.10,
    social_support: 0.15,
    healthcare_access: 0.15,
    utilities: 0.05,
    mental_health: 0.05,
};

/// Weighted composite of the eight domain scores, rounded to 1 decimal and
/// clamped to [0,100]. With weights summing to 1.0 over inputs already in
/// [0,100] the clamp never fires, but it remains part of the contract.
pub fn composite_score(scores: &DomainScores) -> f64 {
    let weighted = scores.housing * DOMAIN_WEIGHTS.housing
        + scores.food_security * DOMAIN_WEIGHTS.food_security
        + scores.transportation * DOMAIN_WEIGHTS.transportation
        + scores.employment * DOMAIN_WEIGHTS.employment
        + scores.social_support * DOMAIN_WEIGHTS.social_support
        + scores.healthcare_access * DOMAIN_WEIGHTS.healthcare_access
        + scores.utilities * DOMAIN_WEIGHTS.utilities
        + scores.mental_health * DOMAIN_WEIGHTS.mental_health;

    round_score(weighted).clamp(0.0, MAX_DOMAIN_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(value: f64) -> DomainScores {
        DomainScores {
            housing: value,
            food_security: value,
            transportation: value,
            employment: value,
            social_support: value,
            healthcare_access: value,
            utilities: value,
            mental_health: value,
        }
    }

    #[test]
    fn weights_sum_to_one() {
        assert!((DOMAIN_WEIGHTS.sum() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn all_zero_domains_compose_to_zero() {
        assert_eq!(composite_score(&uniform(0.0)), 0.0);
    }

    #[test]
    fn all_hundred_domains_compose_to_hundred() {
        assert_eq!(composite_score(&uniform(100.0)), 100.0);
    }

    #[test]
    fn uniform_fifty_composes_to_fifty() {
        assert_eq!(composite_score(&uniform(50.0)), 50.0);
    }

    #[test]
    fn composite_rounds_to_one_decimal() {
        let scores = DomainScores {
            housing: 75.6,
            food_security: 55.0,
            ..DomainScores::default()
        };
        // 15.12 + 8.25 = 23.37, rounded to 23.4
        assert_eq!(composite_score(&scores), 23.4);
    }
}
