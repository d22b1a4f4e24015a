//! Benchmark gap comparison for demographic subgroups.
//!
//! Takes an observed composite or domain score for a subgroup and diffs it
//! against an external reference rate, classifying the shortfall with the
//! same ordered-threshold shape the risk-tier classifier uses.

use serde::{Deserialize, Serialize};

use crate::scoring::classify_descending;

/// Severity of a subgroup's shortfall against the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapSeverity {
    Acceptable,
    Warning,
    Critical,
}

impl GapSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            GapSeverity::Acceptable => "acceptable",
            GapSeverity::Warning => "warning",
            GapSeverity::Critical => "critical",
        }
    }
}

const GAP_BANDS: [(f64, GapSeverity); 2] =
    [(15.0, GapSeverity::Critical), (5.0, GapSeverity::Warning)];

/// Result of comparing one subgroup measure against its reference rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub subgroup: String,
    pub measure: String,
    pub observed: f64,
    pub benchmark: f64,
    /// Points below the benchmark; negative when the subgroup outperforms it.
    pub gap: f64,
    pub severity: GapSeverity,
}

pub fn compare_to_benchmark(
    subgroup: impl Into<String>,
    measure: impl Into<String>,
    observed: f64,
    benchmark: f64,
) -> BenchmarkComparison {
    let gap = benchmark - observed;
    BenchmarkComparison {
        subgroup: subgroup.into(),
        measure: measure.into(),
        observed,
        benchmark,
        gap,
        severity: classify_descending(gap, &GAP_BANDS, GapSeverity::Acceptable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_boundaries_match_the_policy() {
        assert_eq!(
            compare_to_benchmark("ward-7", "composite", 95.1, 100.0).severity,
            GapSeverity::Acceptable
        );
        assert_eq!(
            compare_to_benchmark("ward-7", "composite", 95.0, 100.0).severity,
            GapSeverity::Warning
        );
        assert_eq!(
            compare_to_benchmark("ward-7", "composite", 85.1, 100.0).severity,
            GapSeverity::Warning
        );
        assert_eq!(
            compare_to_benchmark("ward-7", "composite", 85.0, 100.0).severity,
            GapSeverity::Critical
        );
    }

    #[test]
    fn severities_serialize_as_snake_case_strings() {
        for severity in [
            GapSeverity::Acceptable,
            GapSeverity::Warning,
            GapSeverity::Critical,
        ] {
            let value = serde_json::to_value(severity).expect("severity serializes");
            assert_eq!(
                value,
                serde_json::Value::String(severity.label().to_string())
            );
        }
    }

    #[test]
    fn outperforming_the_benchmark_is_acceptable() {
        let behind = compare_to_benchmark("ward-2", "housing", 65.0, 72.0);
        assert_eq!(behind.gap, 7.0);
        assert_eq!(behind.severity, GapSeverity::Warning);
        // gap is negative the other way around
        let ahead = compare_to_benchmark("ward-2", "housing", 65.0, 60.0);
        assert!(ahead.gap < 0.0);
        assert_eq!(ahead.severity, GapSeverity::Acceptable);
    }
}
