//! Record source abstraction traits
//!
//! This module defines the traits that record stores implement to feed the
//! export pipeline.

use crate::domain::{ChargebackRecord, Result, TimeRange};
use async_trait::async_trait;

/// A store that can stream chargebacks for a time range
///
/// Implementations hand out readers that are already bound to their range,
/// so a reader can never be opened without one.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Opens a reader over every record whose `createdAt` lies in `range`
    ///
    /// Records are yielded in ascending `createdAt` order. The whole result
    /// set is never materialized.
    ///
    /// # Errors
    ///
    /// Returns `DataSource` if the store cannot be reached or the query fails.
    async fn open_reader(&self, range: &TimeRange) -> Result<Box<dyn RecordStreamReader>>;

    /// Human-readable description of the store, safe to log
    fn describe(&self) -> String;
}

/// A forward-only cursor over one range query
#[async_trait]
pub trait RecordStreamReader: Send {
    /// Returns the next record, or `None` once the cursor is exhausted
    ///
    /// After `None` or after `close()`, every further call returns `None`.
    ///
    /// # Errors
    ///
    /// Returns `DataSource` on fetch or row-mapping failures.
    async fn next(&mut self) -> Result<Option<ChargebackRecord>>;

    /// Records that the last `rows` records were durably written
    ///
    /// Only moves the reader's commit watermark; no work is done on the
    /// server.
    ///
    /// # Errors
    ///
    /// Returns `DataSource` if more rows are acknowledged than were read.
    async fn acknowledge_chunk(&mut self, rows: usize) -> Result<()>;

    /// Number of records handed out so far
    fn rows_read(&self) -> usize;

    /// Number of records covered by acknowledged chunks
    fn rows_acknowledged(&self) -> usize;

    /// Releases the cursor and its connection
    ///
    /// Idempotent: calling it again is a no-op.
    async fn close(&mut self) -> Result<()>;
}

/// Pulls up to `max` records from `reader`
///
/// Returns fewer than `max` only when the reader is exhausted.
pub async fn read_chunk(
    reader: &mut dyn RecordStreamReader,
    max: usize,
) -> Result<Vec<ChargebackRecord>> {
    let mut chunk = Vec::with_capacity(max);
    while chunk.len() < max {
        match reader.next().await? {
            Some(record) => chunk.push(record),
            None => break,
        }
    }
    Ok(chunk)
}

/// Shared acknowledgement bookkeeping for reader implementations
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct CursorPosition {
    read: usize,
    acknowledged: usize,
}

impl CursorPosition {
    pub(crate) fn advance(&mut self) {
        self.read += 1;
    }

    pub(crate) fn acknowledge(&mut self, rows: usize) -> Result<()> {
        let pending = self.read - self.acknowledged;
        if rows > pending {
            return Err(crate::domain::ChargebackError::DataSource(format!(
                "Cannot acknowledge {rows} rows: only {pending} read since the last commit"
            )));
        }
        self.acknowledged += rows;
        Ok(())
    }

    pub(crate) fn read(&self) -> usize {
        self.read
    }

    pub(crate) fn acknowledged(&self) -> usize {
        self.acknowledged
    }
}
