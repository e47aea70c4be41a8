//! Export orchestrator - drives one export run
//!
//! A run owns exactly one output file and one reader. Records flow through
//! in fixed chunks: read, transform, stage, then commit. A chunk is committed
//! by flushing its rows to the file and acknowledging it on the reader. Any
//! failure rolls back the staged chunk, closes both resources and ends the
//! run; chunks committed before the failure stay in the file.

use crate::adapters::csv::DelimitedFileWriter;
use crate::adapters::database::{read_chunk, RecordSource, RecordStreamReader};
use crate::core::export::summary::ExportResult;
use crate::core::transform::RecordTransformer;
use crate::domain::{ChargebackError, Result, TimeRange};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Records per chunk
pub const CHUNK_SIZE: usize = 100;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing opened yet
    Idle,
    /// Processing the given chunk, 1-based
    Running { chunk: usize },
    /// Every chunk committed and both resources closed
    Completed,
    /// The run stopped on an error
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => write!(f, "idle"),
            RunState::Running { chunk } => write!(f, "running(chunk {})", chunk),
            RunState::Completed => write!(f, "completed"),
            RunState::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Progress {
    chunks: usize,
    records: usize,
}

/// Export orchestrator
pub struct ExportOrchestrator {
    source: Arc<dyn RecordSource>,
    transformer: Arc<dyn RecordTransformer>,
    output_dir: PathBuf,
}

impl ExportOrchestrator {
    /// Create an orchestrator writing into `output_dir`
    pub fn new(
        source: Arc<dyn RecordSource>,
        transformer: Arc<dyn RecordTransformer>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            transformer,
            output_dir: output_dir.into(),
        }
    }

    /// Export every chargeback created within `range`
    ///
    /// The output file (with its header) is created before the reader is
    /// opened, so even a run that fails to reach the store leaves a
    /// header-only file behind.
    ///
    /// # Errors
    ///
    /// Any reader, transformer or writer error is returned as
    /// [`ChargebackError::ExportFailed`] with the original error as cause.
    pub async fn run(&self, range: &TimeRange) -> Result<ExportResult> {
        let started = Instant::now();
        let mut state = RunState::Idle;
        tracing::debug!(state = %state, source = %self.source.describe(), "Export run created");

        let mut writer = match DelimitedFileWriter::create(&self.output_dir, range) {
            Ok(writer) => writer,
            Err(e) => return Err(self.fail(&mut state, e)),
        };
        crate::log_export_start!(range, writer.path().display());

        let mut reader = match self.source.open_reader(range).await {
            Ok(reader) => reader,
            Err(e) => {
                close_writer_after_failure(&mut writer);
                return Err(self.fail(&mut state, e));
            }
        };

        let progress = match self.pump(reader.as_mut(), &mut writer, &mut state).await {
            Ok(progress) => progress,
            Err(e) => {
                let discarded = writer.rollback_chunk();
                if discarded > 0 {
                    tracing::warn!(rows = discarded, "Rolled back uncommitted chunk");
                }
                close_reader_after_failure(reader.as_mut()).await;
                close_writer_after_failure(&mut writer);
                return Err(self.fail(&mut state, e));
            }
        };

        if let Err(e) = reader.close().await {
            close_writer_after_failure(&mut writer);
            return Err(self.fail(&mut state, e));
        }
        if let Err(e) = writer.close() {
            return Err(self.fail(&mut state, e));
        }

        transition(&mut state, RunState::Completed);
        let duration = started.elapsed();
        crate::log_export_complete!(progress.records, duration);

        Ok(ExportResult {
            output_path: writer.path().to_path_buf(),
            record_count: progress.records,
            chunks_committed: progress.chunks,
            duration,
        })
    }

    async fn pump(
        &self,
        reader: &mut dyn RecordStreamReader,
        writer: &mut DelimitedFileWriter,
        state: &mut RunState,
    ) -> Result<Progress> {
        let mut progress = Progress::default();

        loop {
            let chunk = read_chunk(reader, CHUNK_SIZE).await?;
            if chunk.is_empty() {
                break;
            }
            let chunk_number = progress.chunks + 1;
            let fetched = chunk.len();
            transition(state, RunState::Running { chunk: chunk_number });

            for record in chunk {
                let record = self.transformer.transform(record)?;
                writer.stage(&record)?;
            }

            let written = writer.commit_chunk()?;
            reader.acknowledge_chunk(written).await?;

            progress.chunks = chunk_number;
            progress.records += written;
            crate::log_chunk_committed!(chunk_number, written, progress.records);

            if fetched < CHUNK_SIZE {
                break;
            }
        }

        Ok(progress)
    }

    fn fail(&self, state: &mut RunState, cause: ChargebackError) -> ChargebackError {
        let failed_in = *state;
        transition(state, RunState::Failed);
        let context = format!("Export failed while {}", failed_in);
        crate::log_error_with_context!(&cause, context.as_str());
        ChargebackError::export_failed(cause)
    }
}

fn transition(state: &mut RunState, next: RunState) {
    tracing::debug!(from = %state, to = %next, "Run state changed");
    *state = next;
}

async fn close_reader_after_failure(reader: &mut dyn RecordStreamReader) {
    if let Err(e) = reader.close().await {
        tracing::warn!(error = %e, "Failed to close reader after export failure");
    }
}

fn close_writer_after_failure(writer: &mut DelimitedFileWriter) {
    if let Err(e) = writer.close() {
        tracing::warn!(
            error = %e,
            path = %writer.path().display(),
            "Failed to close output file after export failure"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySource;
    use crate::core::transform::PassThroughTransformer;
    use crate::domain::{parse_timestamp, ChargebackRecord};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn range() -> TimeRange {
        TimeRange::new(
            parse_timestamp("2024-05-01T00:00:00").unwrap(),
            parse_timestamp("2024-05-01T23:59:59").unwrap(),
        )
    }

    fn records(count: usize) -> Vec<ChargebackRecord> {
        let base = parse_timestamp("2024-05-01T00:00:00").unwrap();
        (0..count)
            .map(|i| {
                ChargebackRecord::builder()
                    .merchandise_reference(format!("ORD-{i:04}"))
                    .created_at(base + chrono::Duration::seconds(i as i64))
                    .build()
            })
            .collect()
    }

    /// Yields `fail_after` records, then a data source error
    struct FlakySource {
        fail_after: usize,
        closed: Arc<AtomicBool>,
    }

    struct FlakyReader {
        remaining: Vec<ChargebackRecord>,
        fail_after: usize,
        served: usize,
        acknowledged: usize,
        closed: Arc<AtomicBool>,
    }

    #[async_trait]
    impl RecordSource for FlakySource {
        async fn open_reader(&self, _range: &TimeRange) -> Result<Box<dyn RecordStreamReader>> {
            let mut remaining = records(self.fail_after + 10);
            remaining.reverse();
            Ok(Box::new(FlakyReader {
                remaining,
                fail_after: self.fail_after,
                served: 0,
                acknowledged: 0,
                closed: Arc::clone(&self.closed),
            }))
        }

        fn describe(&self) -> String {
            "flaky".to_string()
        }
    }

    #[async_trait]
    impl RecordStreamReader for FlakyReader {
        async fn next(&mut self) -> Result<Option<ChargebackRecord>> {
            if self.served == self.fail_after {
                return Err(ChargebackError::DataSource("connection reset".to_string()));
            }
            self.served += 1;
            Ok(self.remaining.pop())
        }

        async fn acknowledge_chunk(&mut self, rows: usize) -> Result<()> {
            self.acknowledged += rows;
            Ok(())
        }

        fn rows_read(&self) -> usize {
            self.served
        }

        fn rows_acknowledged(&self) -> usize {
            self.acknowledged
        }

        async fn close(&mut self) -> Result<()> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    /// In-memory source whose readers flag `closed` when released
    struct TrackedSource {
        inner: InMemorySource,
        closed: Arc<AtomicBool>,
    }

    struct TrackedReader {
        inner: Box<dyn RecordStreamReader>,
        closed: Arc<AtomicBool>,
    }

    impl TrackedSource {
        fn new(records: Vec<ChargebackRecord>) -> (Self, Arc<AtomicBool>) {
            let closed = Arc::new(AtomicBool::new(false));
            let source = Self {
                inner: InMemorySource::new(records),
                closed: Arc::clone(&closed),
            };
            (source, closed)
        }
    }

    #[async_trait]
    impl RecordSource for TrackedSource {
        async fn open_reader(&self, range: &TimeRange) -> Result<Box<dyn RecordStreamReader>> {
            Ok(Box::new(TrackedReader {
                inner: self.inner.open_reader(range).await?,
                closed: Arc::clone(&self.closed),
            }))
        }

        fn describe(&self) -> String {
            "tracked".to_string()
        }
    }

    #[async_trait]
    impl RecordStreamReader for TrackedReader {
        async fn next(&mut self) -> Result<Option<ChargebackRecord>> {
            self.inner.next().await
        }

        async fn acknowledge_chunk(&mut self, rows: usize) -> Result<()> {
            self.inner.acknowledge_chunk(rows).await
        }

        fn rows_read(&self) -> usize {
            self.inner.rows_read()
        }

        fn rows_acknowledged(&self) -> usize {
            self.inner.rows_acknowledged()
        }

        async fn close(&mut self) -> Result<()> {
            self.closed.store(true, Ordering::SeqCst);
            self.inner.close().await
        }
    }

    /// Fails on the n-th record it sees
    struct RejectNth {
        n: usize,
        seen: AtomicUsize,
    }

    impl RecordTransformer for RejectNth {
        fn transform(&self, record: ChargebackRecord) -> Result<ChargebackRecord> {
            let seen = self.seen.fetch_add(1, Ordering::SeqCst) + 1;
            if seen == self.n {
                return Err(ChargebackError::Transform(format!("record {seen} rejected")));
            }
            Ok(record)
        }
    }

    fn line_count(path: &Path) -> usize {
        std::fs::read_to_string(path).unwrap().lines().count()
    }

    #[tokio::test]
    async fn test_run_counts_chunks() {
        let temp_dir = TempDir::new().unwrap();
        let (source, closed) = TrackedSource::new(records(250));
        let orchestrator = ExportOrchestrator::new(
            Arc::new(source),
            Arc::new(PassThroughTransformer),
            temp_dir.path(),
        );

        let result = orchestrator.run(&range()).await.unwrap();

        assert_eq!(result.record_count, 250);
        assert_eq!(result.chunks_committed, 3);
        assert_eq!(line_count(&result.output_path), 251);
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_exact_multiple_of_chunk_size() {
        let temp_dir = TempDir::new().unwrap();
        let orchestrator = ExportOrchestrator::new(
            Arc::new(InMemorySource::new(records(200))),
            Arc::new(PassThroughTransformer),
            temp_dir.path(),
        );

        let result = orchestrator.run(&range()).await.unwrap();

        assert_eq!(result.record_count, 200);
        assert_eq!(result.chunks_committed, 2);
    }

    #[tokio::test]
    async fn test_empty_range_is_success() {
        let temp_dir = TempDir::new().unwrap();
        let orchestrator = ExportOrchestrator::new(
            Arc::new(InMemorySource::new(Vec::new())),
            Arc::new(PassThroughTransformer),
            temp_dir.path(),
        );

        let result = orchestrator.run(&range()).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(result.chunks_committed, 0);
        assert_eq!(line_count(&result.output_path), 1);
    }

    #[tokio::test]
    async fn test_reader_failure_keeps_committed_chunks_and_closes_reader() {
        let temp_dir = TempDir::new().unwrap();
        let closed = Arc::new(AtomicBool::new(false));
        let orchestrator = ExportOrchestrator::new(
            Arc::new(FlakySource {
                fail_after: 150,
                closed: Arc::clone(&closed),
            }),
            Arc::new(PassThroughTransformer),
            temp_dir.path(),
        );

        let err = orchestrator.run(&range()).await.unwrap_err();

        assert!(matches!(err, ChargebackError::ExportFailed { .. }));
        assert!(matches!(err.root_cause(), ChargebackError::DataSource(_)));
        assert!(closed.load(Ordering::SeqCst));

        let path = temp_dir.path().join(crate::adapters::csv::derive_file_name(&range()));
        assert_eq!(line_count(&path), 101);
    }

    #[tokio::test]
    async fn test_transform_failure_rejects_whole_chunk() {
        let temp_dir = TempDir::new().unwrap();
        let (source, closed) = TrackedSource::new(records(250));
        let orchestrator = ExportOrchestrator::new(
            Arc::new(source),
            Arc::new(RejectNth {
                n: 150,
                seen: AtomicUsize::new(0),
            }),
            temp_dir.path(),
        );

        let err = orchestrator.run(&range()).await.unwrap_err();
        assert!(matches!(err.root_cause(), ChargebackError::Transform(_)));
        assert!(closed.load(Ordering::SeqCst));

        let path = temp_dir.path().join(crate::adapters::csv::derive_file_name(&range()));
        let content = std::fs::read_to_string(path).unwrap();
        let rows: Vec<&str> = content.lines().skip(1).collect();
        assert_eq!(rows.len(), 100);
        assert!(rows[99].contains("ORD-0099"));
    }

    #[tokio::test]
    async fn test_unwritable_output_dir_fails_before_reading() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let closed = Arc::new(AtomicBool::new(false));

        let orchestrator = ExportOrchestrator::new(
            Arc::new(FlakySource {
                fail_after: 0,
                closed: Arc::clone(&closed),
            }),
            Arc::new(PassThroughTransformer),
            &blocker,
        );

        let err = orchestrator.run(&range()).await.unwrap_err();
        assert!(matches!(err.root_cause(), ChargebackError::WriteFailure(_)));
        // The reader was never opened
        assert!(!closed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_run_state_display() {
        assert_eq!(RunState::Idle.to_string(), "idle");
        assert_eq!(RunState::Running { chunk: 2 }.to_string(), "running(chunk 2)");
        assert_eq!(RunState::Completed.to_string(), "completed");
        assert_eq!(RunState::Failed.to_string(), "failed");
    }
}
