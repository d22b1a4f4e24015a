use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use sdoh_engine::batch::{BatchRecalculator, RecalculationScope};
use sdoh_engine::encounters::{
    Encounter, EncounterId, EncounterStore, HousingAssessment, HousingStatus, StoreError,
    SubjectId,
};
use sdoh_engine::records::{ScoreStore, SdohScoreRecord};
use sdoh_engine::scoring::RiskTier;

// Timestamps are offsets into a window ending well before the recalculation
// stamp, so staleness comparisons never depend on the host clock.
fn at(day: i64, hour: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(30) + Duration::days(day) + Duration::hours(hour)
}

fn encounter(subject: &str, id: &str, day: i64) -> Encounter {
    Encounter {
        encounter_id: EncounterId(id.to_string()),
        subject_id: SubjectId::new(subject),
        occurred_at: at(day, 9),
        housing: Some(HousingAssessment {
            housing_status: HousingStatus::Unstable,
            eviction_risk: true,
            ..HousingAssessment::default()
        }),
        food_security: None,
        transportation: None,
        employment: None,
        social_support: None,
        healthcare_access: None,
        utilities: None,
        mental_health: None,
    }
}

#[derive(Default)]
struct MemoryEncounterStore {
    encounters: Mutex<Vec<Encounter>>,
}

impl MemoryEncounterStore {
    fn with_encounters(encounters: Vec<Encounter>) -> Self {
        Self {
            encounters: Mutex::new(encounters),
        }
    }
}

impl EncounterStore for MemoryEncounterStore {
    fn subjects_with_encounters(&self) -> Result<Vec<SubjectId>, StoreError> {
        let guard = self.encounters.lock().expect("encounter mutex poisoned");
        let mut subjects: Vec<SubjectId> = guard.iter().map(|e| e.subject_id.clone()).collect();
        subjects.sort();
        subjects.dedup();
        Ok(subjects)
    }

    fn latest_encounter(&self, subject: &SubjectId) -> Result<Option<Encounter>, StoreError> {
        let guard = self.encounters.lock().expect("encounter mutex poisoned");
        Ok(guard
            .iter()
            .filter(|e| &e.subject_id == subject)
            .max_by_key(|e| e.occurred_at)
            .cloned())
    }

    fn encounter_count(&self, subject: &SubjectId) -> Result<u32, StoreError> {
        let guard = self.encounters.lock().expect("encounter mutex poisoned");
        Ok(guard.iter().filter(|e| &e.subject_id == subject).count() as u32)
    }
}

#[derive(Default, Clone)]
struct MemoryScoreStore {
    records: Arc<Mutex<HashMap<SubjectId, SdohScoreRecord>>>,
}

impl MemoryScoreStore {
    fn fetch_record(&self, subject: &SubjectId) -> Option<SdohScoreRecord> {
        self.records
            .lock()
            .expect("score mutex poisoned")
            .get(subject)
            .cloned()
    }

    fn seed(&self, record: SdohScoreRecord) {
        self.records
            .lock()
            .expect("score mutex poisoned")
            .insert(record.subject_id.clone(), record);
    }
}

impl ScoreStore for MemoryScoreStore {
    fn upsert(&self, record: SdohScoreRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .expect("score mutex poisoned")
            .insert(record.subject_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, subject: &SubjectId) -> Result<Option<SdohScoreRecord>, StoreError> {
        Ok(self.fetch_record(subject))
    }

    fn all(&self) -> Result<Vec<SdohScoreRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .expect("score mutex poisoned")
            .values()
            .cloned()
            .collect())
    }
}

/// Score store that rejects writes for one subject while accepting the rest.
struct PartiallyFailingScoreStore {
    inner: MemoryScoreStore,
    failing_subject: SubjectId,
}

impl ScoreStore for PartiallyFailingScoreStore {
    fn upsert(&self, record: SdohScoreRecord) -> Result<(), StoreError> {
        if record.subject_id == self.failing_subject {
            return Err(StoreError::Unavailable("write rejected".to_string()));
        }
        self.inner.upsert(record)
    }

    fn fetch(&self, subject: &SubjectId) -> Result<Option<SdohScoreRecord>, StoreError> {
        self.inner.fetch(subject)
    }

    fn all(&self) -> Result<Vec<SdohScoreRecord>, StoreError> {
        self.inner.all()
    }
}

/// Encounter store whose enumeration always fails.
struct UnavailableEncounterStore;

impl EncounterStore for UnavailableEncounterStore {
    fn subjects_with_encounters(&self) -> Result<Vec<SubjectId>, StoreError> {
        Err(StoreError::Unavailable("source offline".to_string()))
    }

    fn latest_encounter(&self, _subject: &SubjectId) -> Result<Option<Encounter>, StoreError> {
        Err(StoreError::Unavailable("source offline".to_string()))
    }

    fn encounter_count(&self, _subject: &SubjectId) -> Result<u32, StoreError> {
        Err(StoreError::Unavailable("source offline".to_string()))
    }
}

#[tokio::test]
async fn recalculate_all_scores_every_subject_with_encounters() {
    let encounters = Arc::new(MemoryEncounterStore::with_encounters(vec![
        encounter("subj-a", "enc-1", 1),
        encounter("subj-a", "enc-2", 3),
        encounter("subj-b", "enc-3", 2),
    ]));
    let scores = Arc::new(MemoryScoreStore::default());
    let recalculator = BatchRecalculator::new(encounters, Arc::clone(&scores) as Arc<dyn ScoreStore>);

    let outcome = recalculator
        .run(RecalculationScope::All)
        .await
        .expect("batch runs");

    assert_eq!(outcome.considered, 2);
    assert_eq!(outcome.succeeded, 2);
    assert!(outcome.errors.is_empty());

    let record = scores
        .fetch_record(&SubjectId::new("subj-a"))
        .expect("subj-a scored");
    assert_eq!(record.assessment_count, 2);
    assert_eq!(record.source_encounter_id, Some(EncounterId("enc-2".to_string())));
    // unstable 25 + eviction risk 20
    assert_eq!(record.domain_scores.housing, 45.0);
}

#[tokio::test]
async fn single_subject_without_encounters_gets_the_default_record() {
    let encounters = Arc::new(MemoryEncounterStore::default());
    let scores = Arc::new(MemoryScoreStore::default());
    let recalculator =
        BatchRecalculator::new(encounters, Arc::clone(&scores) as Arc<dyn ScoreStore>).with_concurrency(1);

    let outcome = recalculator
        .run(RecalculationScope::Subject(SubjectId::new("subj-new")))
        .await
        .expect("batch runs");

    assert_eq!(outcome.considered, 1);
    assert_eq!(outcome.succeeded, 1);
    let record = scores
        .fetch_record(&SubjectId::new("subj-new"))
        .expect("default record upserted");
    assert_eq!(record.composite_score, 0.0);
    assert_eq!(record.risk_tier, RiskTier::Low);
    assert_eq!(record.assessment_count, 0);
    assert_eq!(record.source_encounter_id, None);
}

#[tokio::test]
async fn stale_mode_skips_subjects_with_fresh_records() {
    let encounters = Arc::new(MemoryEncounterStore::with_encounters(vec![
        encounter("subj-fresh", "enc-1", 2),
        encounter("subj-stale", "enc-2", 10),
        encounter("subj-unscored", "enc-3", 4),
    ]));
    let scores = Arc::new(MemoryScoreStore::default());

    // subj-fresh was recalculated after their latest encounter, subj-stale before.
    let mut fresh = SdohScoreRecord::unassessed(SubjectId::new("subj-fresh"), at(5, 0));
    fresh.assessment_count = 99;
    scores.seed(fresh);
    scores.seed(SdohScoreRecord::unassessed(
        SubjectId::new("subj-stale"),
        at(5, 0),
    ));

    let recalculator = BatchRecalculator::new(encounters, Arc::clone(&scores) as Arc<dyn ScoreStore>);
    let outcome = recalculator
        .run(RecalculationScope::Stale)
        .await
        .expect("batch runs");

    assert_eq!(outcome.considered, 2);
    assert_eq!(outcome.succeeded, 2);

    // The fresh subject's record is untouched.
    let untouched = scores
        .fetch_record(&SubjectId::new("subj-fresh"))
        .expect("record kept");
    assert_eq!(untouched.assessment_count, 99);

    let rescored = scores
        .fetch_record(&SubjectId::new("subj-stale"))
        .expect("record rewritten");
    assert_eq!(rescored.assessment_count, 1);
    assert!(scores.fetch_record(&SubjectId::new("subj-unscored")).is_some());
}

#[tokio::test]
async fn one_failing_subject_does_not_abort_the_batch() {
    let encounters = Arc::new(MemoryEncounterStore::with_encounters(vec![
        encounter("subj-a", "enc-1", 1),
        encounter("subj-b", "enc-2", 1),
        encounter("subj-c", "enc-3", 1),
    ]));
    let scores = Arc::new(PartiallyFailingScoreStore {
        inner: MemoryScoreStore::default(),
        failing_subject: SubjectId::new("subj-b"),
    });
    let recalculator = BatchRecalculator::new(encounters, scores);

    let outcome = recalculator
        .run(RecalculationScope::All)
        .await
        .expect("batch call itself does not fail");

    assert_eq!(outcome.considered, 3);
    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].subject_id, SubjectId::new("subj-b"));
    assert!(outcome.errors[0].message.contains("write rejected"));
}

#[tokio::test]
async fn enumeration_failure_propagates_as_a_batch_error() {
    let recalculator = BatchRecalculator::new(
        Arc::new(UnavailableEncounterStore),
        Arc::new(MemoryScoreStore::default()),
    );

    let result = recalculator.run(RecalculationScope::All).await;
    assert!(result.is_err());
}
