//! Field-encounter domain model and the storage abstraction the engine reads
//! encounters through.
//!
//! An encounter carries up to eight optional domain sub-records. Absence of a
//! sub-record is distinct from presence with every indicator false: an absent
//! sub-record means the domain was not assessed at that visit and contributes
//! a risk score of exactly zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for the person an encounter belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId(pub String);

impl SubjectId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for a single field visit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncounterId(pub String);

/// One timestamped field-visit record for a subject.
///
/// Encounters for a subject are totally ordered by `occurred_at`; "most
/// recent" is well-defined whenever at least one encounter exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub encounter_id: EncounterId,
    pub subject_id: SubjectId,
    pub occurred_at: DateTime<Utc>,
    #[serde(default)]
    pub housing: Option<HousingAssessment>,
    #[serde(default)]
    pub food_security: Option<FoodSecurityAssessment>,
    #[serde(default)]
    pub transportation: Option<TransportationAssessment>,
    #[serde(default)]
    pub employment: Option<EmploymentAssessment>,
    #[serde(default)]
    pub social_support: Option<SocialSupportAssessment>,
    #[serde(default)]
    pub healthcare_access: Option<HealthcareAccessAssessment>,
    #[serde(default)]
    pub utilities: Option<UtilitiesAssessment>,
    #[serde(default)]
    pub mental_health: Option<MentalHealthAssessment>,
}

/// Living situation reported during an encounter, ordered from lowest to
/// highest risk. Missing values deserialize to the lowest-risk category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingStatus {
    #[default]
    Stable,
    Temporary,
    Unstable,
    Homeless,
}

/// Self-reported stress level, ordered from lowest to highest risk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    #[default]
    Low,
    Moderate,
    High,
    VeryHigh,
}

/// Housing domain indicators captured at a field visit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HousingAssessment {
    pub housing_status: HousingStatus,
    pub quality_concern_safety: bool,
    pub quality_concern_utilities: bool,
    pub quality_concern_pests: bool,
    pub quality_concern_mold: bool,
    pub eviction_risk: bool,
}

/// Food security domain indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodSecurityAssessment {
    pub food_insecure: bool,
    pub ran_out_of_food: bool,
    pub worried_about_food: bool,
    pub skipped_meals_last_week: u8,
    pub snap_need_unmet: bool,
}

/// Transportation domain indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportationAssessment {
    pub no_reliable_transport: bool,
    pub missed_appointment: bool,
    pub cost_barrier: bool,
    pub needs_assistance: bool,
}

/// Employment and income domain indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmploymentAssessment {
    pub unemployed: bool,
    pub underemployed: bool,
    pub insufficient_income: bool,
    pub needs_job_training: bool,
    pub other_barriers: bool,
}

/// Social support domain indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialSupportAssessment {
    pub lives_alone: bool,
    pub no_emergency_contact: bool,
    pub feels_isolated: bool,
    pub lacks_supportive_family: bool,
    pub caregiver_burden: bool,
}

/// Healthcare access domain indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthcareAccessAssessment {
    pub no_insurance: bool,
    pub no_primary_care: bool,
    pub avoided_care_due_to_cost: bool,
    pub missed_medication_due_to_cost: bool,
}

/// Utilities domain indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilitiesAssessment {
    pub shutoff_risk: bool,
    pub past_shutoff: bool,
    pub difficulty_paying: bool,
    pub no_phone_service: bool,
}

/// Mental-health stressor indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MentalHealthAssessment {
    pub stress_level: StressLevel,
    pub trauma_history: bool,
    pub domestic_violence_concern: bool,
    pub recent_grief_or_loss: bool,
}

/// Read-side storage abstraction for encounter history.
///
/// The engine never writes encounters; collection and persistence belong to
/// the surrounding system.
pub trait EncounterStore: Send + Sync {
    /// All subjects with at least one encounter on record.
    fn subjects_with_encounters(&self) -> Result<Vec<SubjectId>, StoreError>;

    /// The most recent encounter for a subject, if any exist.
    fn latest_encounter(&self, subject: &SubjectId) -> Result<Option<Encounter>, StoreError>;

    /// Number of encounters on record for a subject.
    fn encounter_count(&self, subject: &SubjectId) -> Result<u32, StoreError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
