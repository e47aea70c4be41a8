//! In-process record source
//!
//! Serves a fixed set of records with the same filtering and ordering
//! contract as the database source. Useful for embedding the pipeline and
//! for exercising it without a running database.

use crate::adapters::database::traits::{CursorPosition, RecordSource, RecordStreamReader};
use crate::domain::{ChargebackRecord, Result, TimeRange};
use async_trait::async_trait;
use std::sync::Arc;

/// Record source backed by a shared vector
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Arc<Vec<ChargebackRecord>>,
}

impl InMemorySource {
    /// Create a source over `records`, in any order
    pub fn new(records: Vec<ChargebackRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn open_reader(&self, range: &TimeRange) -> Result<Box<dyn RecordStreamReader>> {
        // Only indices are collected; records are cloned one at a time as read
        let mut matching: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.created_at().is_some_and(|ts| range.contains(ts)))
            .map(|(i, _)| i)
            .collect();
        // Stable sort keeps insertion order for equal timestamps
        matching.sort_by_key(|&i| self.records[i].created_at());

        Ok(Box::new(InMemoryReader {
            records: Arc::clone(&self.records),
            matching,
            next_index: 0,
            closed: false,
            position: CursorPosition::default(),
        }))
    }

    fn describe(&self) -> String {
        format!("in-memory ({} records)", self.records.len())
    }
}

/// Cursor over an [`InMemorySource`] range
#[derive(Debug)]
pub struct InMemoryReader {
    records: Arc<Vec<ChargebackRecord>>,
    matching: Vec<usize>,
    next_index: usize,
    closed: bool,
    position: CursorPosition,
}

#[async_trait]
impl RecordStreamReader for InMemoryReader {
    async fn next(&mut self) -> Result<Option<ChargebackRecord>> {
        if self.closed {
            return Ok(None);
        }
        let Some(&index) = self.matching.get(self.next_index) else {
            return Ok(None);
        };
        self.next_index += 1;
        self.position.advance();
        Ok(Some(self.records[index].clone()))
    }

    async fn acknowledge_chunk(&mut self, rows: usize) -> Result<()> {
        self.position.acknowledge(rows)
    }

    fn rows_read(&self) -> usize {
        self.position.read()
    }

    fn rows_acknowledged(&self) -> usize {
        self.position.acknowledged()
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
