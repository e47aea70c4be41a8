//! Record transformation
//!
//! The pipeline runs every record through a [`RecordTransformer`] between
//! reading and writing. The default transformer returns records unchanged;
//! enrichment such as currency normalization plugs in here without touching
//! the reader or the writer.

use crate::domain::{ChargebackRecord, Result};

/// Per-record transformation step
///
/// Implementations must be pure: no I/O and no shared mutable state. A
/// returned error fails the chunk the record belongs to.
pub trait RecordTransformer: Send + Sync {
    /// Transform one record
    fn transform(&self, record: ChargebackRecord) -> Result<ChargebackRecord>;
}

/// Identity transformer
///
/// # Examples
///
/// ```
/// use chargeback_export::core::transform::{PassThroughTransformer, RecordTransformer};
/// use chargeback_export::domain::ChargebackRecord;
///
/// let record = ChargebackRecord::builder().disputed_currency("EUR").build();
/// let out = PassThroughTransformer.transform(record.clone()).unwrap();
/// assert_eq!(out, record);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughTransformer;

impl RecordTransformer for PassThroughTransformer {
    fn transform(&self, record: ChargebackRecord) -> Result<ChargebackRecord> {
        Ok(record)
    }
}
