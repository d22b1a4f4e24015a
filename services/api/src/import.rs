//! CSV import for field-team encounter exports.
//!
//! The export is one row per encounter with a column per indicator. Cells
//! are blank when a domain was not assessed at that visit, so a domain
//! sub-record is only built when at least one of its cells carries a value.
//! That keeps "not assessed" distinct from "assessed with nothing found".

use chrono::{DateTime, Utc};
use sdoh_engine::encounters::{
    EmploymentAssessment, Encounter, EncounterId, FoodSecurityAssessment,
    HealthcareAccessAssessment, HousingAssessment, HousingStatus, MentalHealthAssessment,
    SocialSupportAssessment, StressLevel, SubjectId, TransportationAssessment,
    UtilitiesAssessment,
};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Timestamp { encounter_id: String, value: String },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read encounter export: {err}"),
            ImportError::Csv(err) => write!(f, "invalid encounter CSV data: {err}"),
            ImportError::Timestamp {
                encounter_id,
                value,
            } => write!(
                f,
                "encounter '{encounter_id}' has unparseable timestamp '{value}' (expected RFC 3339)"
            ),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Timestamp { .. } => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct EncounterCsvImporter;

impl EncounterCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Encounter>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Encounter>, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut encounters = Vec::new();
        for record in csv_reader.deserialize::<EncounterRow>() {
            encounters.push(record?.into_encounter()?);
        }
        Ok(encounters)
    }
}

#[derive(Debug, Deserialize)]
struct EncounterRow {
    encounter_id: String,
    subject_id: String,
    occurred_at: String,

    housing_status: Option<String>,
    housing_safety_concern: Option<bool>,
    housing_utilities_concern: Option<bool>,
    housing_pests_concern: Option<bool>,
    housing_mold_concern: Option<bool>,
    eviction_risk: Option<bool>,

    food_insecure: Option<bool>,
    ran_out_of_food: Option<bool>,
    worried_about_food: Option<bool>,
    skipped_meals_last_week: Option<u8>,
    snap_need_unmet: Option<bool>,

    no_reliable_transport: Option<bool>,
    missed_appointment: Option<bool>,
    transport_cost_barrier: Option<bool>,
    transport_needs_assistance: Option<bool>,

    unemployed: Option<bool>,
    underemployed: Option<bool>,
    insufficient_income: Option<bool>,
    needs_job_training: Option<bool>,
    employment_other_barriers: Option<bool>,

    lives_alone: Option<bool>,
    no_emergency_contact: Option<bool>,
    feels_isolated: Option<bool>,
    lacks_supportive_family: Option<bool>,
    caregiver_burden: Option<bool>,

    no_insurance: Option<bool>,
    no_primary_care: Option<bool>,
    avoided_care_due_to_cost: Option<bool>,
    missed_medication_due_to_cost: Option<bool>,

    utility_shutoff_risk: Option<bool>,
    past_shutoff: Option<bool>,
    utility_difficulty_paying: Option<bool>,
    no_phone_service: Option<bool>,

    stress_level: Option<String>,
    trauma_history: Option<bool>,
    domestic_violence_concern: Option<bool>,
    recent_grief_or_loss: Option<bool>,
}

impl EncounterRow {
    fn into_encounter(self) -> Result<Encounter, ImportError> {
        let occurred_at = DateTime::parse_from_rfc3339(&self.occurred_at)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|_| ImportError::Timestamp {
                encounter_id: self.encounter_id.clone(),
                value: self.occurred_at.clone(),
            })?;

        Ok(Encounter {
            encounter_id: EncounterId(self.encounter_id.clone()),
            subject_id: SubjectId::new(self.subject_id.clone()),
            occurred_at,
            housing: self.housing(),
            food_security: self.food_security(),
            transportation: self.transportation(),
            employment: self.employment(),
            social_support: self.social_support(),
            healthcare_access: self.healthcare_access(),
            utilities: self.utilities(),
            mental_health: self.mental_health(),
        })
    }

    fn housing(&self) -> Option<HousingAssessment> {
        let assessed = self.housing_status.is_some()
            || self.housing_safety_concern.is_some()
            || self.housing_utilities_concern.is_some()
            || self.housing_pests_concern.is_some()
            || self.housing_mold_concern.is_some()
            || self.eviction_risk.is_some();
        assessed.then(|| HousingAssessment {
            housing_status: parse_housing_status(self.housing_status.as_deref()),
            quality_concern_safety: self.housing_safety_concern.unwrap_or(false),
            quality_concern_utilities: self.housing_utilities_concern.unwrap_or(false),
            quality_concern_pests: self.housing_pests_concern.unwrap_or(false),
            quality_concern_mold: self.housing_mold_concern.unwrap_or(false),
            eviction_risk: self.eviction_risk.unwrap_or(false),
        })
    }

    fn food_security(&self) -> Option<FoodSecurityAssessment> {
        let assessed = self.food_insecure.is_some()
            || self.ran_out_of_food.is_some()
            || self.worried_about_food.is_some()
            || self.skipped_meals_last_week.is_some()
            || self.snap_need_unmet.is_some();
        assessed.then(|| FoodSecurityAssessment {
            food_insecure: self.food_insecure.unwrap_or(false),
            ran_out_of_food: self.ran_out_of_food.unwrap_or(false),
            worried_about_food: self.worried_about_food.unwrap_or(false),
            skipped_meals_last_week: self.skipped_meals_last_week.unwrap_or(0),
            snap_need_unmet: self.snap_need_unmet.unwrap_or(false),
        })
    }

    fn transportation(&self) -> Option<TransportationAssessment> {
        let assessed = self.no_reliable_transport.is_some()
            || self.missed_appointment.is_some()
            || self.transport_cost_barrier.is_some()
            || self.transport_needs_assistance.is_some();
        assessed.then(|| TransportationAssessment {
            no_reliable_transport: self.no_reliable_transport.unwrap_or(false),
            missed_appointment: self.missed_appointment.unwrap_or(false),
            cost_barrier: self.transport_cost_barrier.unwrap_or(false),
            needs_assistance: self.transport_needs_assistance.unwrap_or(false),
        })
    }

    fn employment(&self) -> Option<EmploymentAssessment> {
        let assessed = self.unemployed.is_some()
            || self.underemployed.is_some()
            || self.insufficient_income.is_some()
            || self.needs_job_training.is_some()
            || self.employment_other_barriers.is_some();
        assessed.then(|| EmploymentAssessment {
            unemployed: self.unemployed.unwrap_or(false),
            underemployed: self.underemployed.unwrap_or(false),
            insufficient_income: self.insufficient_income.unwrap_or(false),
            needs_job_training: self.needs_job_training.unwrap_or(false),
            other_barriers: self.employment_other_barriers.unwrap_or(false),
        })
    }

    fn social_support(&self) -> Option<SocialSupportAssessment> {
        let assessed = self.lives_alone.is_some()
            || self.no_emergency_contact.is_some()
            || self.feels_isolated.is_some()
            || self.lacks_supportive_family.is_some()
            || self.caregiver_burden.is_some();
        assessed.then(|| SocialSupportAssessment {
            lives_alone: self.lives_alone.unwrap_or(false),
            no_emergency_contact: self.no_emergency_contact.unwrap_or(false),
            feels_isolated: self.feels_isolated.unwrap_or(false),
            lacks_supportive_family: self.lacks_supportive_family.unwrap_or(false),
            caregiver_burden: self.caregiver_burden.unwrap_or(false),
        })
    }

    fn healthcare_access(&self) -> Option<HealthcareAccessAssessment> {
        let assessed = self.no_insurance.is_some()
            || self.no_primary_care.is_some()
            || self.avoided_care_due_to_cost.is_some()
            || self.missed_medication_due_to_cost.is_some();
        assessed.then(|| HealthcareAccessAssessment {
            no_insurance: self.no_insurance.unwrap_or(false),
            no_primary_care: self.no_primary_care.unwrap_or(false),
            avoided_care_due_to_cost: self.avoided_care_due_to_cost.unwrap_or(false),
            missed_medication_due_to_cost: self.missed_medication_due_to_cost.unwrap_or(false),
        })
    }

    fn utilities(&self) -> Option<UtilitiesAssessment> {
        let assessed = self.utility_shutoff_risk.is_some()
            || self.past_shutoff.is_some()
            || self.utility_difficulty_paying.is_some()
            || self.no_phone_service.is_some();
        assessed.then(|| UtilitiesAssessment {
            shutoff_risk: self.utility_shutoff_risk.unwrap_or(false),
            past_shutoff: self.past_shutoff.unwrap_or(false),
            difficulty_paying: self.utility_difficulty_paying.unwrap_or(false),
            no_phone_service: self.no_phone_service.unwrap_or(false),
        })
    }

    fn mental_health(&self) -> Option<MentalHealthAssessment> {
        let assessed = self.stress_level.is_some()
            || self.trauma_history.is_some()
            || self.domestic_violence_concern.is_some()
            || self.recent_grief_or_loss.is_some();
        assessed.then(|| MentalHealthAssessment {
            stress_level: parse_stress_level(self.stress_level.as_deref()),
            trauma_history: self.trauma_history.unwrap_or(false),
            domestic_violence_concern: self.domestic_violence_concern.unwrap_or(false),
            recent_grief_or_loss: self.recent_grief_or_loss.unwrap_or(false),
        })
    }
}

// Unknown categories fall back to the lowest-risk interpretation rather than
// failing the import.
fn parse_housing_status(raw: Option<&str>) -> HousingStatus {
    match raw.map(str::trim).map(str::to_ascii_lowercase).as_deref() {
        Some("homeless") => HousingStatus::Homeless,
        Some("unstable") => HousingStatus::Unstable,
        Some("temporary") => HousingStatus::Temporary,
        _ => HousingStatus::Stable,
    }
}

fn parse_stress_level(raw: Option<&str>) -> StressLevel {
    match raw.map(str::trim).map(str::to_ascii_lowercase).as_deref() {
        Some("very_high") | Some("very high") => StressLevel::VeryHigh,
        Some("high") => StressLevel::High,
        Some("moderate") => StressLevel::Moderate,
        _ => StressLevel::Low,
    }
}
