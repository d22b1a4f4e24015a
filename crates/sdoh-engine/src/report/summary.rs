//! Population-level aggregation of score records.

use serde::{Deserialize, Serialize};

use crate::records::SdohScoreRecord;
use crate::scoring::{DomainScores, RiskTier};

/// Count of subjects in each risk tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub low: usize,
    pub moderate: usize,
    pub high: usize,
    pub very_high: usize,
}

impl TierCounts {
    fn record(&mut self, tier: RiskTier) {
        match tier {
            RiskTier::Low => self.low += 1,
            RiskTier::Moderate => self.moderate += 1,
            RiskTier::High => self.high += 1,
            RiskTier::VeryHigh => self.very_high += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.moderate + self.high + self.very_high
    }
}

/// Number of subjects carrying each public risk flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagPrevalence {
    pub housing_risk: usize,
    pub food_risk: usize,
    pub transportation_risk: usize,
    pub employment_risk: usize,
    pub social_isolation_risk: usize,
    pub healthcare_access_risk: usize,
}

/// Aggregate view over every stored score record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationSummary {
    pub subjects: usize,
    pub tier_counts: TierCounts,
    pub mean_domain_scores: DomainScores,
    pub mean_composite_score: f64,
    pub flag_prevalence: FlagPrevalence,
}

pub fn summarize(records: &[SdohScoreRecord]) -> PopulationSummary {
    let mut summary = PopulationSummary {
        subjects: records.len(),
        ..PopulationSummary::default()
    };
    if records.is_empty() {
        return summary;
    }

    let mut composite_total = 0.0;
    for record in records {
        summary.tier_counts.record(record.risk_tier);
        composite_total += record.composite_score;

        let scores = &record.domain_scores;
        summary.mean_domain_scores.housing += scores.housing;
        summary.mean_domain_scores.food_security += scores.food_security;
        summary.mean_domain_scores.transportation += scores.transportation;
        summary.mean_domain_scores.employment += scores.employment;
        summary.mean_domain_scores.social_support += scores.social_support;
        summary.mean_domain_scores.healthcare_access += scores.healthcare_access;
        summary.mean_domain_scores.utilities += scores.utilities;
        summary.mean_domain_scores.mental_health += scores.mental_health;

        let flags = &record.flags;
        summary.flag_prevalence.housing_risk += usize::from(flags.housing_risk);
        summary.flag_prevalence.food_risk += usize::from(flags.food_risk);
        summary.flag_prevalence.transportation_risk += usize::from(flags.transportation_risk);
        summary.flag_prevalence.employment_risk += usize::from(flags.employment_risk);
        summary.flag_prevalence.social_isolation_risk += usize::from(flags.social_isolation_risk);
        summary.flag_prevalence.healthcare_access_risk +=
            usize::from(flags.healthcare_access_risk);
    }

    let count = records.len() as f64;
    summary.mean_composite_score = composite_total / count;
    summary.mean_domain_scores.housing /= count;
    summary.mean_domain_scores.food_security /= count;
    summary.mean_domain_scores.transportation /= count;
    summary.mean_domain_scores.employment /= count;
    summary.mean_domain_scores.social_support /= count;
    summary.mean_domain_scores.healthcare_access /= count;
    summary.mean_domain_scores.utilities /= count;
    summary.mean_domain_scores.mental_health /= count;
    summary
}
