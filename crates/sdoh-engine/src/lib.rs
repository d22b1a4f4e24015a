//! Composite SDOH risk scoring engine.
//!
//! Converts field-encounter data about a subject (housing, food security,
//! transportation, employment, social support, healthcare access, utilities,
//! mental health) into per-domain risk scores, one weighted composite score,
//! a discrete risk tier, and boolean domain flags used for population-level
//! reporting. Record retrieval and persistence live behind the
//! [`encounters::EncounterStore`] and [`records::ScoreStore`] abstractions so
//! the engine can be exercised against any backing storage.

pub mod batch;
pub mod encounters;
pub mod records;
pub mod report;
pub mod scoring;

pub use batch::{BatchError, BatchOutcome, BatchRecalculator, RecalculationScope};
pub use encounters::{Encounter, EncounterId, EncounterStore, StoreError, SubjectId};
pub use records::{ScoreStore, SdohScoreRecord};
pub use scoring::{DomainScores, RiskFlags, RiskTier};
