//! The persistable SDOH score record and its builder.
//!
//! A score record is a derived cache entity: the encounter history is the
//! source of truth and the record is overwritten wholesale on every
//! recalculation for its subject. External readers must treat it as
//! read-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::encounters::{Encounter, EncounterId, StoreError, SubjectId};
use crate::scoring::{
    classify_risk_tier, composite_score, derive_flags, round_score, DomainScores, RiskFlags,
    RiskTier,
};

/// One subject's scored risk profile, upserted by the batch orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdohScoreRecord {
    pub subject_id: SubjectId,
    pub domain_scores: DomainScores,
    pub composite_score: f64,
    pub risk_tier: RiskTier,
    pub flags: RiskFlags,
    pub last_assessment_at: Option<DateTime<Utc>>,
    pub source_encounter_id: Option<EncounterId>,
    pub assessment_count: u32,
    pub recalculated_at: DateTime<Utc>,
}

impl SdohScoreRecord {
    /// Score a subject from their most recent encounter.
    ///
    /// `assessment_count` is the number of encounters on record, carried onto
    /// the record for reporting; only the most recent encounter contributes
    /// to the scores.
    pub fn from_latest_encounter(
        encounter: &Encounter,
        assessment_count: u32,
        recalculated_at: DateTime<Utc>,
    ) -> Self {
        let raw = DomainScores::for_encounter(encounter);
        let domain_scores = DomainScores {
            housing: round_score(raw.housing),
            food_security: round_score(raw.food_security),
            transportation: round_score(raw.transportation),
            employment: round_score(raw.employment),
            social_support: round_score(raw.social_support),
            healthcare_access: round_score(raw.healthcare_access),
            utilities: round_score(raw.utilities),
            mental_health: round_score(raw.mental_health),
        };
        let composite = composite_score(&domain_scores);

        Self {
            subject_id: encounter.subject_id.clone(),
            domain_scores,
            composite_score: composite,
            risk_tier: classify_risk_tier(composite),
            flags: derive_flags(&domain_scores),
            last_assessment_at: Some(encounter.occurred_at),
            source_encounter_id: Some(encounter.encounter_id.clone()),
            assessment_count,
            recalculated_at,
        }
    }

    /// The record for a subject who has never been assessed: all scores zero,
    /// tier low, no flags, no source encounter. This path never errors.
    pub fn unassessed(subject_id: SubjectId, recalculated_at: DateTime<Utc>) -> Self {
        Self {
            subject_id,
            domain_scores: DomainScores::default(),
            composite_score: 0.0,
            risk_tier: RiskTier::Low,
            flags: RiskFlags::default(),
            last_assessment_at: None,
            source_encounter_id: None,
            assessment_count: 0,
            recalculated_at,
        }
    }
}

/// Write-side storage abstraction for score records.
pub trait ScoreStore: Send + Sync {
    /// Insert or overwrite the record for its subject.
    fn upsert(&self, record: SdohScoreRecord) -> Result<(), StoreError>;

    fn fetch(&self, subject: &SubjectId) -> Result<Option<SdohScoreRecord>, StoreError>;

    /// Every stored record, for population-level reporting.
    fn all(&self) -> Result<Vec<SdohScoreRecord>, StoreError>;
}
