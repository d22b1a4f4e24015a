//! Per-domain risk calculators.
//!
//! Each calculator maps one optional domain sub-record to a risk score in
//! [0,100]. An absent sub-record returns exactly 0.0: absence of data is
//! treated as absence of known risk, never as an error. The point values are
//! part of the scoring contract and must not drift, or previously scored
//! cohorts stop being comparable. Each table is written as a declarative
//! list of (indicator, points) contributions so the exact rule stays
//! auditable.

use crate::encounters::{
    EmploymentAssessment, FoodSecurityAssessment, HealthcareAccessAssessment, HousingAssessment,
    HousingStatus, MentalHealthAssessment, SocialSupportAssessment, StressLevel,
    TransportationAssessment, UtilitiesAssessment,
};

/// Upper bound of every domain score and of the composite.
pub const MAX_DOMAIN_SCORE: f64 = 100.0;

/// Points contributed per meal skipped in the last week.
const POINTS_PER_SKIPPED_MEAL: f64 = 5.0;

fn contribution_sum(contributions: &[(bool, f64)]) -> f64 {
    contributions
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, points)| points)
        .sum()
}

fn clamp_score(raw: f64) -> f64 {
    raw.clamp(0.0, MAX_DOMAIN_SCORE)
}

pub fn housing_risk(assessment: Option<&HousingAssessment>) -> f64 {
    let Some(a) = assessment else { return 0.0 };
    clamp_score(contribution_sum(&[
        (a.housing_status == HousingStatus::Homeless, 40.0),
        (a.housing_status == HousingStatus::Unstable, 25.0),
        (a.housing_status == HousingStatus::Temporary, 15.0),
        (a.quality_concern_safety, 15.0),
        (a.quality_concern_utilities, 10.0),
        (a.quality_concern_mold, 10.0),
        (a.quality_concern_pests, 5.0),
        (a.eviction_risk, 20.0),
    ]))
}

pub fn food_security_risk(assessment: Option<&FoodSecurityAssessment>) -> f64 {
    let Some(a) = assessment else { return 0.0 };
    let meal_points = f64::from(a.skipped_meals_last_week) * POINTS_PER_SKIPPED_MEAL;
    clamp_score(
        contribution_sum(&[
            (a.food_insecure, 40.0),
            (a.ran_out_of_food, 30.0),
            (a.worried_about_food, 20.0),
            (a.snap_need_unmet, 10.0),
        ]) + meal_points,
    )
}

pub fn transportation_risk(assessment: Option<&TransportationAssessment>) -> f64 {
    let Some(a) = assessment else { return 0.0 };
    clamp_score(contribution_sum(&[
        (a.no_reliable_transport, 40.0),
        (a.missed_appointment, 30.0),
        (a.cost_barrier, 20.0),
        (a.needs_assistance, 10.0),
    ]))
}

pub fn employment_risk(assessment: Option<&EmploymentAssessment>) -> f64 {
    let Some(a) = assessment else { return 0.0 };
    clamp_score(contribution_sum(&[
        (a.unemployed, 40.0),
        (a.underemployed, 20.0),
        (a.insufficient_income, 30.0),
        (a.needs_job_training, 15.0),
        (a.other_barriers, 15.0),
    ]))
}

pub fn social_support_risk(assessment: Option<&SocialSupportAssessment>) -> f64 {
    let Some(a) = assessment else { return 0.0 };
    clamp_score(contribution_sum(&[
        (a.lives_alone, 15.0),
        (a.no_emergency_contact, 20.0),
        (a.feels_isolated, 30.0),
        (a.lacks_supportive_family, 20.0),
        (a.caregiver_burden, 15.0),
    ]))
}

pub fn healthcare_access_risk(assessment: Option<&HealthcareAccessAssessment>) -> f64 {
    let Some(a) = assessment else { return 0.0 };
    clamp_score(contribution_sum(&[
        (a.no_insurance, 35.0),
        (a.no_primary_care, 25.0),
        (a.avoided_care_due_to_cost, 20.0),
        (a.missed_medication_due_to_cost, 20.0),
    ]))
}

pub fn utilities_risk(assessment: Option<&UtilitiesAssessment>) -> f64 {
    let Some(a) = assessment else { return 0.0 };
    clamp_score(contribution_sum(&[
        (a.shutoff_risk, 40.0),
        (a.past_shutoff, 25.0),
        (a.difficulty_paying, 20.0),
        (a.no_phone_service, 15.0),
    ]))
}

pub fn mental_health_risk(assessment: Option<&MentalHealthAssessment>) -> f64 {
    let Some(a) = assessment else { return 0.0 };
    clamp_score(contribution_sum(&[
        (a.stress_level >= StressLevel::High, 30.0),
        (a.trauma_history, 25.0),
        (a.domestic_violence_concern, 35.0),
        (a.recent_grief_or_loss, 10.0),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_sub_records_score_exactly_zero() {
        assert_eq!(housing_risk(None), 0.0);
        assert_eq!(food_security_risk(None), 0.0);
        assert_eq!(transportation_risk(None), 0.0);
        assert_eq!(employment_risk(None), 0.0);
        assert_eq!(social_support_risk(None), 0.0);
        assert_eq!(healthcare_access_risk(None), 0.0);
        assert_eq!(utilities_risk(None), 0.0);
        assert_eq!(mental_health_risk(None), 0.0);
    }

    #[test]
    fn all_false_sub_record_scores_zero_but_is_distinct_from_absent() {
        let assessment = HousingAssessment::default();
        assert_eq!(housing_risk(Some(&assessment)), 0.0);
    }

    #[test]
    fn homeless_with_safety_concern_and_eviction_risk_scores_75() {
        let assessment = HousingAssessment {
            housing_status: HousingStatus::Homeless,
            quality_concern_safety: true,
            eviction_risk: true,
            ..HousingAssessment::default()
        };
        assert_eq!(housing_risk(Some(&assessment)), 75.0);
    }

    #[test]
    fn food_insecure_with_three_skipped_meals_scores_55() {
        let assessment = FoodSecurityAssessment {
            food_insecure: true,
            skipped_meals_last_week: 3,
            ..FoodSecurityAssessment::default()
        };
        assert_eq!(food_security_risk(Some(&assessment)), 55.0);
    }

    #[test]
    fn housing_score_clamps_at_100_with_every_indicator_set() {
        let assessment = HousingAssessment {
            housing_status: HousingStatus::Homeless,
            quality_concern_safety: true,
            quality_concern_utilities: true,
            quality_concern_pests: true,
            quality_concern_mold: true,
            eviction_risk: true,
        };
        assert_eq!(housing_risk(Some(&assessment)), 100.0);
    }

    #[test]
    fn food_score_clamps_with_extreme_skipped_meal_counts() {
        let assessment = FoodSecurityAssessment {
            food_insecure: true,
            ran_out_of_food: true,
            worried_about_food: true,
            skipped_meals_last_week: 200,
            snap_need_unmet: true,
        };
        assert_eq!(food_security_risk(Some(&assessment)), 100.0);
    }

    #[test]
    fn stress_contributes_only_at_high_or_very_high() {
        let moderate = MentalHealthAssessment {
            stress_level: StressLevel::Moderate,
            ..MentalHealthAssessment::default()
        };
        assert_eq!(mental_health_risk(Some(&moderate)), 0.0);

        let high = MentalHealthAssessment {
            stress_level: StressLevel::High,
            ..MentalHealthAssessment::default()
        };
        assert_eq!(mental_health_risk(Some(&high)), 30.0);

        let very_high = MentalHealthAssessment {
            stress_level: StressLevel::VeryHigh,
            ..MentalHealthAssessment::default()
        };
        assert_eq!(mental_health_risk(Some(&very_high)), 30.0);
    }

    #[test]
    fn every_calculator_stays_within_bounds_with_all_indicators_set() {
        let transportation = TransportationAssessment {
            no_reliable_transport: true,
            missed_appointment: true,
            cost_barrier: true,
            needs_assistance: true,
        };
        assert_eq!(transportation_risk(Some(&transportation)), 100.0);

        let employment = EmploymentAssessment {
            unemployed: true,
            underemployed: true,
            insufficient_income: true,
            needs_job_training: true,
            other_barriers: true,
        };
        assert_eq!(employment_risk(Some(&employment)), 100.0);

        let social = SocialSupportAssessment {
            lives_alone: true,
            no_emergency_contact: true,
            feels_isolated: true,
            lacks_supportive_family: true,
            caregiver_burden: true,
        };
        assert_eq!(social_support_risk(Some(&social)), 100.0);

        let healthcare = HealthcareAccessAssessment {
            no_insurance: true,
            no_primary_care: true,
            avoided_care_due_to_cost: true,
            missed_medication_due_to_cost: true,
        };
        assert_eq!(healthcare_access_risk(Some(&healthcare)), 100.0);

        let utilities = UtilitiesAssessment {
            shutoff_risk: true,
            past_shutoff: true,
            difficulty_paying: true,
            no_phone_service: true,
        };
        assert_eq!(utilities_risk(Some(&utilities)), 100.0);

        let mental = MentalHealthAssessment {
            stress_level: StressLevel::VeryHigh,
            trauma_history: true,
            domestic_violence_concern: true,
            recent_grief_or_loss: true,
        };
        assert_eq!(mental_health_risk(Some(&mental)), 100.0);
    }
}
