use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use sdoh_engine::batch::BatchRecalculator;
use sdoh_engine::encounters::{Encounter, EncounterStore, StoreError, SubjectId};
use sdoh_engine::records::{ScoreStore, SdohScoreRecord};

/// Shared handler state: readiness flag plus the engine and its stores.
#[derive(Clone)]
pub struct AppState {
    pub readiness: Arc<AtomicBool>,
    pub recalculator: Arc<BatchRecalculator>,
    pub scores: Arc<dyn ScoreStore>,
}

impl AppState {
    pub fn new(
        encounters: Arc<dyn EncounterStore>,
        scores: Arc<dyn ScoreStore>,
        concurrency: usize,
    ) -> Self {
        let recalculator = BatchRecalculator::new(encounters, Arc::clone(&scores))
            .with_concurrency(concurrency);

        Self {
            readiness: Arc::new(AtomicBool::new(false)),
            recalculator: Arc::new(recalculator),
            scores,
        }
    }
}

/// Encounter history held in memory, seeded from a CSV export.
#[derive(Default, Clone)]
pub struct InMemoryEncounterStore {
    encounters: Arc<Mutex<Vec<Encounter>>>,
}

impl InMemoryEncounterStore {
    pub fn extend(&self, encounters: Vec<Encounter>) {
        self.encounters
            .lock()
            .expect("encounter mutex poisoned")
            .extend(encounters);
    }

    pub fn len(&self) -> usize {
        self.encounters.lock().expect("encounter mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EncounterStore for InMemoryEncounterStore {
    fn subjects_with_encounters(&self) -> Result<Vec<SubjectId>, StoreError> {
        let guard = self.encounters.lock().expect("encounter mutex poisoned");
        let mut subjects: Vec<SubjectId> = guard
            .iter()
            .map(|encounter| encounter.subject_id.clone())
            .collect();
        subjects.sort();
        subjects.dedup();
        Ok(subjects)
    }

    fn latest_encounter(&self, subject: &SubjectId) -> Result<Option<Encounter>, StoreError> {
        let guard = self.encounters.lock().expect("encounter mutex poisoned");
        Ok(guard
            .iter()
            .filter(|encounter| &encounter.subject_id == subject)
            .max_by_key(|encounter| encounter.occurred_at)
            .cloned())
    }

    fn encounter_count(&self, subject: &SubjectId) -> Result<u32, StoreError> {
        let guard = self.encounters.lock().expect("encounter mutex poisoned");
        Ok(guard
            .iter()
            .filter(|encounter| &encounter.subject_id == subject)
            .count() as u32)
    }
}

/// Score records held in memory, keyed by subject.
#[derive(Default, Clone)]
pub struct InMemoryScoreStore {
    records: Arc<Mutex<HashMap<SubjectId, SdohScoreRecord>>>,
}

impl ScoreStore for InMemoryScoreStore {
    fn upsert(&self, record: SdohScoreRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .expect("score mutex poisoned")
            .insert(record.subject_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, subject: &SubjectId) -> Result<Option<SdohScoreRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .expect("score mutex poisoned")
            .get(subject)
            .cloned())
    }

    fn all(&self) -> Result<Vec<SdohScoreRecord>, StoreError> {
        let guard = self.records.lock().expect("score mutex poisoned");
        let mut records: Vec<SdohScoreRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| a.subject_id.cmp(&b.subject_id));
        Ok(records)
    }
}
