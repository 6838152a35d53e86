use std::time::Duration;

use serde::Serialize;
use txwatch_core::RiskTier;

use crate::engine::SubjectReport;

/// Summary of one batch run, logged by callers and optionally emitted as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchMetrics {
    /// Distinct subjects in the batch.
    pub subjects: usize,
    /// Input records across all subjects.
    pub transactions: usize,
    /// Subjects whose history was rejected by the extractor.
    pub failed: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    /// Wall time of the run in milliseconds.
    pub elapsed_ms: u64,
    /// Throughput over the whole run.
    pub subjects_per_second: f64,
}

impl BatchMetrics {
    /// Tally a finished batch.
    pub fn from_reports(reports: &[SubjectReport], elapsed: Duration) -> Self {
        let mut metrics = Self {
            subjects: reports.len(),
            elapsed_ms: elapsed.as_millis() as u64,
            ..Self::default()
        };

        for report in reports {
            metrics.transactions += report.transaction_count;
            match report.analysis.as_ref().map(|a| a.detection.risk_level) {
                Some(RiskTier::Low) => metrics.low += 1,
                Some(RiskTier::Medium) => metrics.medium += 1,
                Some(RiskTier::High) => metrics.high += 1,
                None => metrics.failed += 1,
            }
        }

        let elapsed_secs = elapsed.as_secs_f64();
        if elapsed_secs > 0.0 {
            metrics.subjects_per_second = reports.len() as f64 / elapsed_secs;
        }
        metrics
    }
}
