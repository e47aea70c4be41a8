//! Delimited file writer for chargeback exports
//!
//! Rows are staged per chunk and only reach the file when the chunk is
//! committed, so a failed chunk never leaves partial rows behind. Committed
//! chunks and the header stay on disk whatever happens later in the run.

use crate::domain::{
    ChargebackError, ChargebackRecord, Result, TimeRange, DATE_FORMAT, FILE_STAMP_FORMAT,
    TIMESTAMP_FORMAT,
};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Fixed header line of every export file
pub const HEADER: [&str; 6] = [
    "disputed_dt",
    "disputed_amt",
    "disputed_curr",
    "merchandise_ref",
    "reason_for_dispute",
    "created_time",
];

/// Derives the output file name for a range
///
/// # Examples
///
/// ```
/// use chargeback_export::adapters::csv::derive_file_name;
/// use chargeback_export::domain::{parse_timestamp, TimeRange};
///
/// let range = TimeRange::new(
///     parse_timestamp("2024-03-01T00:00:00").unwrap(),
///     parse_timestamp("2024-03-01T23:59:59").unwrap(),
/// );
/// assert_eq!(
///     derive_file_name(&range),
///     "chargebacks_20240301_000000_to_20240301_235959.csv"
/// );
/// ```
pub fn derive_file_name(range: &TimeRange) -> String {
    format!(
        "chargebacks_{}_to_{}.csv",
        range.start().format(FILE_STAMP_FORMAT),
        range.end().format(FILE_STAMP_FORMAT)
    )
}

/// Serializes a record to its six output fields
///
/// Nulls become empty strings. Values are emitted verbatim: embedded commas
/// are not escaped.
pub fn format_fields(record: &ChargebackRecord) -> [String; 6] {
    [
        record
            .disputed_date()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        record
            .disputed_amount()
            .map(|a| a.to_string())
            .unwrap_or_default(),
        record.disputed_currency().unwrap_or_default().to_string(),
        record.merchandise_reference().unwrap_or_default().to_string(),
        record.dispute_reason().unwrap_or_default().to_string(),
        record
            .created_at()
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default(),
    ]
}

/// CSV writer bound to the file derived from one time range
pub struct DelimitedFileWriter {
    path: PathBuf,
    inner: Option<csv::Writer<File>>,
    staged: Vec<[String; 6]>,
    rows_committed: usize,
}

impl DelimitedFileWriter {
    /// Creates the output file for `range` under `output_dir` and writes the header
    ///
    /// The directory tree is created first if absent. An existing file with
    /// the same name is truncated.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailure` if the directory or file cannot be created or
    /// the header cannot be flushed.
    pub fn create(output_dir: impl AsRef<Path>, range: &TimeRange) -> Result<Self> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir).map_err(|e| {
            ChargebackError::WriteFailure(format!(
                "Failed to create output directory {}: {}",
                output_dir.display(),
                e
            ))
        })?;

        let path = output_dir.join(derive_file_name(range));
        let file = File::create(&path).map_err(|e| {
            ChargebackError::WriteFailure(format!(
                "Failed to create output file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut writer = Self {
            path,
            inner: Some(
                WriterBuilder::new()
                    .has_headers(false)
                    .quote_style(QuoteStyle::Never)
                    .terminator(Terminator::Any(b'\n'))
                    .from_writer(file),
            ),
            staged: Vec::new(),
            rows_committed: 0,
        };
        writer.write_header()?;

        tracing::debug!(path = %writer.path.display(), "Opened output file");
        Ok(writer)
    }

    fn write_header(&mut self) -> Result<()> {
        let inner = self.open_writer()?;
        inner.write_record(HEADER)?;
        inner.flush()?;
        Ok(())
    }

    fn open_writer(&mut self) -> Result<&mut csv::Writer<File>> {
        let path = &self.path;
        self.inner.as_mut().ok_or_else(|| {
            ChargebackError::WriteFailure(format!("Output file {} is already closed", path.display()))
        })
    }

    /// Path of the output file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stages one record for the current chunk
    ///
    /// Nothing reaches the file until [`commit_chunk`](Self::commit_chunk).
    ///
    /// # Errors
    ///
    /// Returns `WriteFailure` if the writer is already closed.
    pub fn stage(&mut self, record: &ChargebackRecord) -> Result<()> {
        if self.inner.is_none() {
            return Err(ChargebackError::WriteFailure(format!(
                "Output file {} is already closed",
                self.path.display()
            )));
        }
        self.staged.push(format_fields(record));
        Ok(())
    }

    /// Number of rows staged and not yet committed
    pub fn staged_rows(&self) -> usize {
        self.staged.len()
    }

    /// Number of data rows committed to the file
    pub fn rows_committed(&self) -> usize {
        self.rows_committed
    }

    /// Writes every staged row and flushes the file
    ///
    /// Returns the number of rows committed by this call.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailure` on any I/O error. The staged rows are dropped
    /// in that case; the file may then hold part of the failed chunk.
    pub fn commit_chunk(&mut self) -> Result<usize> {
        let staged = std::mem::take(&mut self.staged);
        let inner = self.open_writer()?;
        for fields in &staged {
            inner.write_record(fields)?;
        }
        inner.flush()?;

        self.rows_committed += staged.len();
        Ok(staged.len())
    }

    /// Discards staged rows without touching the file
    ///
    /// Returns the number of rows discarded.
    pub fn rollback_chunk(&mut self) -> usize {
        let discarded = self.staged.len();
        self.staged.clear();
        discarded
    }

    /// Flushes committed rows and releases the file handle
    ///
    /// Staged rows are discarded. Idempotent: later calls are no-ops. The
    /// handle is released even when the final flush fails.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailure` if the final flush fails.
    pub fn close(&mut self) -> Result<()> {
        self.staged.clear();
        let Some(mut inner) = self.inner.take() else {
            return Ok(());
        };

        let flushed = inner.flush();
        drop(inner);

        tracing::debug!(
            path = %self.path.display(),
            rows = self.rows_committed,
            "Closed output file"
        );

        flushed.map_err(|e| {
            ChargebackError::WriteFailure(format!(
                "Failed to flush output file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl Drop for DelimitedFileWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(error = %e, "Output file was not closed cleanly");
        }
    }
}
