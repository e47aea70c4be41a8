//! Export result and reporting

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Outcome of a successful export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    /// Path of the written file
    pub output_path: PathBuf,

    /// Data rows written, header excluded. Zero is a valid result.
    pub record_count: usize,

    /// Number of chunks committed
    pub chunks_committed: usize,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl ExportResult {
    /// Path of the written file
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Returns true when no rows matched the range
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// Get throughput in records per second
    pub fn records_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.record_count as f64 / secs
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            output = %self.output_path.display(),
            records = self.record_count,
            chunks = self.chunks_committed,
            duration_ms = self.duration.as_millis() as u64,
            throughput = format!("{:.1}/s", self.records_per_second()),
            "Export summary"
        );

        if self.is_empty() {
            tracing::info!("No chargebacks matched the range; header-only file written");
        }
    }
}
