//! End-to-end export tests against the in-memory record source

use async_trait::async_trait;
use chargeback_export::adapters::csv::{derive_file_name, HEADER};
use chargeback_export::adapters::database::{RecordSource, RecordStreamReader};
use chargeback_export::adapters::memory::InMemorySource;
use chargeback_export::core::export::{ExportOrchestrator, CHUNK_SIZE};
use chargeback_export::core::transform::{PassThroughTransformer, RecordTransformer};
use chargeback_export::domain::{
    parse_timestamp, ChargebackError, ChargebackRecord, Result, TimeRange,
};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap()
}

fn at_start_of_day(ts: NaiveDateTime) -> NaiveDateTime {
    ts.date().and_time(NaiveTime::MIN)
}

fn at_end_of_day(ts: NaiveDateTime) -> NaiveDateTime {
    ts.date().and_hms_opt(23, 59, 59).unwrap()
}

fn record(reference: &str, created_at: NaiveDateTime) -> ChargebackRecord {
    ChargebackRecord::builder()
        .disputed_date(created_at.date())
        .disputed_amount("25.00".parse().unwrap())
        .disputed_currency("USD")
        .merchandise_reference(reference)
        .dispute_reason("Fraudulent transaction")
        .created_at(created_at)
        .build()
}

fn orchestrator(source: impl RecordSource + 'static, dir: &Path) -> ExportOrchestrator {
    ExportOrchestrator::new(Arc::new(source), Arc::new(PassThroughTransformer), dir)
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

#[tokio::test]
async fn test_empty_range_writes_header_only() {
    let temp_dir = TempDir::new().unwrap();
    let future = now() + Duration::days(365);
    let range = TimeRange::new(future, future);
    let source = InMemorySource::new(vec![record("ORD-1", now())]);

    let result = orchestrator(source, temp_dir.path()).run(&range).await.unwrap();

    assert_eq!(result.record_count, 0);
    let lines = read_lines(&result.output_path);
    assert_eq!(lines, vec![HEADER.join(",")]);
}

#[tokio::test]
async fn test_basic_export_filters_and_orders() {
    let temp_dir = TempDir::new().unwrap();
    let t = now();
    let range = TimeRange::new(
        at_start_of_day(t - Duration::days(2)),
        at_end_of_day(t - Duration::days(1)),
    );
    // Inserted out of order on purpose
    let source = InMemorySource::new(vec![
        record("ORD-T", t),
        record("ORD-T-1", t - Duration::days(1)),
        record("ORD-T+3", t + Duration::days(3)),
        record("ORD-T-2", t - Duration::days(2)),
    ]);

    let result = orchestrator(source, temp_dir.path()).run(&range).await.unwrap();

    assert_eq!(result.record_count, 2);
    let lines = read_lines(&result.output_path);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], HEADER.join(","));
    assert!(lines[1].contains(",ORD-T-2,"));
    assert!(lines[2].contains(",ORD-T-1,"));
    assert!(lines.iter().all(|l| !l.contains(",ORD-T,") && !l.contains("ORD-T+3")));
}

#[tokio::test]
async fn test_row_format() {
    let temp_dir = TempDir::new().unwrap();
    let created = parse_timestamp("2024-03-10T14:05:09").unwrap();
    let range = TimeRange::for_day(created.date());
    let source = InMemorySource::new(vec![ChargebackRecord::builder()
        .disputed_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        .disputed_amount("100.50".parse().unwrap())
        .disputed_currency("EUR")
        .merchandise_reference("ORD-42")
        .dispute_reason("Item not received")
        .created_at(created)
        .build()]);

    let result = orchestrator(source, temp_dir.path()).run(&range).await.unwrap();

    let lines = read_lines(&result.output_path);
    assert_eq!(
        lines[1],
        "2024-03-01,100.50,EUR,ORD-42,Item not received,2024-03-10T14:05:09"
    );
}

#[tokio::test]
async fn test_chunk_boundaries_with_250_records() {
    let temp_dir = TempDir::new().unwrap();
    let base = parse_timestamp("2024-04-01T00:00:00").unwrap();
    let records: Vec<_> = (0..250)
        .map(|i| record(&format!("ORD-{i:03}"), base + Duration::seconds(i)))
        .collect();
    let range = TimeRange::for_day(base.date());

    let result = orchestrator(InMemorySource::new(records), temp_dir.path())
        .run(&range)
        .await
        .unwrap();

    assert_eq!(result.record_count, 250);
    assert_eq!(result.chunks_committed, 3);
    assert_eq!(CHUNK_SIZE, 100);

    let lines = read_lines(&result.output_path);
    assert_eq!(lines.len(), 251);
    for (i, line) in lines.iter().skip(1).enumerate() {
        let reference = line.split(',').nth(3).unwrap();
        assert_eq!(reference, format!("ORD-{i:03}"), "gap or duplicate at row {i}");
    }
}

/// A record without `createdAt` never matches; one with only `createdAt` set
/// writes five empty fields
#[tokio::test]
async fn test_null_fields_serialize_as_empty() {
    let temp_dir = TempDir::new().unwrap();
    let created = parse_timestamp("2024-02-02T10:00:00").unwrap();
    let range = TimeRange::for_day(created.date());
    let source = InMemorySource::new(vec![
        ChargebackRecord::default(),
        ChargebackRecord::builder().created_at(created).build(),
    ]);

    let result = orchestrator(source, temp_dir.path()).run(&range).await.unwrap();

    assert_eq!(result.record_count, 1);
    let lines = read_lines(&result.output_path);
    assert_eq!(lines[1], ",,,,,2024-02-02T10:00:00");
    assert_eq!(lines[1].split(',').count(), 6);
}

/// Source whose every reader yields one fully null record
struct NullRecordSource;

struct NullRecordReader {
    done: bool,
    read: usize,
    acknowledged: usize,
}

#[async_trait]
impl RecordSource for NullRecordSource {
    async fn open_reader(&self, _range: &TimeRange) -> Result<Box<dyn RecordStreamReader>> {
        Ok(Box::new(NullRecordReader {
            done: false,
            read: 0,
            acknowledged: 0,
        }))
    }

    fn describe(&self) -> String {
        "nulls".to_string()
    }
}

#[async_trait]
impl RecordStreamReader for NullRecordReader {
    async fn next(&mut self) -> Result<Option<ChargebackRecord>> {
        if self.done {
            return Ok(None);
        }
        self.done = true;
        self.read += 1;
        Ok(Some(ChargebackRecord::default()))
    }

    async fn acknowledge_chunk(&mut self, rows: usize) -> Result<()> {
        self.acknowledged += rows;
        Ok(())
    }

    fn rows_read(&self) -> usize {
        self.read
    }

    fn rows_acknowledged(&self) -> usize {
        self.acknowledged
    }

    async fn close(&mut self) -> Result<()> {
        self.done = true;
        Ok(())
    }
}

/// Counts how many records it sees
#[derive(Default)]
struct CountingTransformer {
    seen: AtomicUsize,
}

impl RecordTransformer for CountingTransformer {
    fn transform(&self, record: ChargebackRecord) -> Result<ChargebackRecord> {
        self.seen.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }
}

#[tokio::test]
async fn test_all_null_record_is_transformed_and_written() {
    let temp_dir = TempDir::new().unwrap();
    let transformer = Arc::new(CountingTransformer::default());
    let orchestrator = ExportOrchestrator::new(
        Arc::new(NullRecordSource),
        transformer.clone(),
        temp_dir.path(),
    );
    let range = TimeRange::for_day(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

    let result = orchestrator.run(&range).await.unwrap();

    assert_eq!(transformer.seen.load(Ordering::SeqCst), 1);
    let lines = read_lines(&result.output_path);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], ",,,,,");
}

/// Rejects every record whose reference ends with the marker
struct RejectMarked(&'static str);

impl RecordTransformer for RejectMarked {
    fn transform(&self, record: ChargebackRecord) -> Result<ChargebackRecord> {
        if record
            .merchandise_reference()
            .is_some_and(|r| r.ends_with(self.0))
        {
            return Err(ChargebackError::Transform("marked record".to_string()));
        }
        Ok(record)
    }
}

#[tokio::test]
async fn test_failed_run_keeps_header_and_committed_chunks() {
    let temp_dir = TempDir::new().unwrap();
    let base = parse_timestamp("2024-04-02T00:00:00").unwrap();
    let mut records: Vec<_> = (0..180)
        .map(|i| record(&format!("ORD-{i:03}"), base + Duration::seconds(i)))
        .collect();
    records.push(record("ORD-BAD", base + Duration::seconds(180)));
    let range = TimeRange::for_day(base.date());

    let orchestrator = ExportOrchestrator::new(
        Arc::new(InMemorySource::new(records)),
        Arc::new(RejectMarked("BAD")),
        temp_dir.path(),
    );
    let err = orchestrator.run(&range).await.unwrap_err();

    assert!(matches!(err, ChargebackError::ExportFailed { .. }));
    assert!(err.to_string().starts_with("Export failed: Transform error"));

    let path = temp_dir.path().join(derive_file_name(&range));
    let lines = read_lines(&path);
    assert_eq!(lines.len(), 1 + CHUNK_SIZE);
    assert_eq!(lines[0], HEADER.join(","));
}

#[tokio::test]
async fn test_output_file_name_and_directory_creation() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("exports").join("daily");
    let range = TimeRange::new(
        parse_timestamp("2024-01-15T00:00:00").unwrap(),
        parse_timestamp("2024-01-15T23:59:59").unwrap(),
    );

    let result = orchestrator(InMemorySource::default(), &output_dir)
        .run(&range)
        .await
        .unwrap();

    assert_eq!(
        result.output_path,
        output_dir.join("chargebacks_20240115_000000_to_20240115_235959.csv")
    );
    assert!(result.output_path.exists());
}

#[tokio::test]
async fn test_rerun_overwrites_previous_output() {
    let temp_dir = TempDir::new().unwrap();
    let created = parse_timestamp("2024-05-05T05:05:05").unwrap();
    let range = TimeRange::for_day(created.date());

    let first = orchestrator(
        InMemorySource::new(vec![record("A", created), record("B", created)]),
        temp_dir.path(),
    )
    .run(&range)
    .await
    .unwrap();
    let second = orchestrator(InMemorySource::new(vec![record("C", created)]), temp_dir.path())
        .run(&range)
        .await
        .unwrap();

    assert_eq!(first.output_path, second.output_path);
    assert_eq!(read_lines(&second.output_path).len(), 2);
}
