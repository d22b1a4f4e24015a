//! Consumers of stored score records: the population summary reporter and
//! the benchmark gap comparison.

mod benchmark;
mod summary;

pub use benchmark::{compare_to_benchmark, BenchmarkComparison, GapSeverity};
pub use summary::{summarize, FlagPrevalence, PopulationSummary, TierCounts};
