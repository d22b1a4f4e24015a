//! Batch recalculation of score records.
//!
//! Each subject is an isolated unit of work: read the latest encounter,
//! build the score record, upsert it. Units run concurrently up to a bounded
//! worker pool and a failure in one unit is recorded against its subject
//! without aborting the rest of the batch. Only a failure to enumerate the
//! subjects at all propagates as a batch-level error.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::encounters::{EncounterStore, StoreError, SubjectId};
use crate::records::{ScoreStore, SdohScoreRecord};

/// Default size of the bounded worker pool.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 8;

/// Which subjects a recalculation run covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecalculationScope {
    /// One subject, scored even if they have no encounters (yielding the
    /// default record).
    Subject(SubjectId),
    /// Every subject with at least one encounter.
    All,
    /// Subjects whose latest encounter is newer than their score record, or
    /// who have encounters but no score record yet.
    Stale,
}

/// Structured result of a batch run. Callers must not assume all-or-nothing
/// semantics: `errors` lists the subjects that failed while the rest were
/// processed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub considered: usize,
    pub succeeded: usize,
    pub errors: Vec<SubjectFailure>,
}

/// One subject's failure within an otherwise-continuing batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectFailure {
    pub subject_id: SubjectId,
    pub message: String,
}

/// Batch-level failure: nothing could be processed at all.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to enumerate subjects: {0}")]
    Enumeration(#[from] StoreError),
}

/// Recomputes and upserts score records for a set of subjects.
pub struct BatchRecalculator {
    encounters: Arc<dyn EncounterStore>,
    scores: Arc<dyn ScoreStore>,
    concurrency: usize,
}

impl BatchRecalculator {
    pub fn new(encounters: Arc<dyn EncounterStore>, scores: Arc<dyn ScoreStore>) -> Self {
        Self {
            encounters,
            scores,
            concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Run a recalculation over the selected scope.
    pub async fn run(&self, scope: RecalculationScope) -> Result<BatchOutcome, BatchError> {
        let subjects = self.subjects_for(&scope)?;
        let considered = subjects.len();
        info!(considered, ?scope, "starting score recalculation batch");

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(subjects.len());
        for subject in subjects {
            let encounters = Arc::clone(&self.encounters);
            let scores = Arc::clone(&self.scores);
            let semaphore = Arc::clone(&semaphore);
            let task_subject = subject.clone();
            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|err| err.to_string())?;
                recalculate_subject(encounters.as_ref(), scores.as_ref(), &task_subject)
            });
            handles.push((subject, handle));
        }

        let mut outcome = BatchOutcome {
            considered,
            ..BatchOutcome::default()
        };
        for (subject, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_err) => Err(format!("recalculation task failed: {join_err}")),
            };
            match result {
                Ok(()) => outcome.succeeded += 1,
                Err(message) => {
                    warn!(subject = %subject, %message, "subject recalculation failed");
                    outcome.errors.push(SubjectFailure {
                        subject_id: subject,
                        message,
                    });
                }
            }
        }

        info!(
            considered = outcome.considered,
            succeeded = outcome.succeeded,
            failed = outcome.errors.len(),
            "score recalculation batch finished"
        );
        Ok(outcome)
    }

    fn subjects_for(&self, scope: &RecalculationScope) -> Result<Vec<SubjectId>, BatchError> {
        match scope {
            RecalculationScope::Subject(subject) => Ok(vec![subject.clone()]),
            RecalculationScope::All => Ok(self.encounters.subjects_with_encounters()?),
            RecalculationScope::Stale => {
                let mut stale = Vec::new();
                for subject in self.encounters.subjects_with_encounters()? {
                    if self.is_stale(&subject)? {
                        stale.push(subject);
                    }
                }
                Ok(stale)
            }
        }
    }

    /// A subject is stale when no score record exists or the latest encounter
    /// postdates the record's last recalculation.
    fn is_stale(&self, subject: &SubjectId) -> Result<bool, BatchError> {
        let Some(record) = self.scores.fetch(subject)? else {
            return Ok(true);
        };
        let Some(latest) = self.encounters.latest_encounter(subject)? else {
            return Ok(false);
        };
        Ok(latest.occurred_at > record.recalculated_at)
    }
}

fn recalculate_subject(
    encounters: &dyn EncounterStore,
    scores: &dyn ScoreStore,
    subject: &SubjectId,
) -> Result<(), String> {
    let latest = encounters
        .latest_encounter(subject)
        .map_err(|err| format!("reading latest encounter: {err}"))?;
    let now = Utc::now();

    let record = match latest {
        Some(encounter) => {
            let count = encounters
                .encounter_count(subject)
                .map_err(|err| format!("counting encounters: {err}"))?;
            SdohScoreRecord::from_latest_encounter(&encounter, count, now)
        }
        None => SdohScoreRecord::unassessed(subject.clone(), now),
    };

    scores
        .upsert(record)
        .map_err(|err| format!("persisting score record: {err}"))
}
