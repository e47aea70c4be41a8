//! Domain models and types for the chargeback exporter.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Records** ([`ChargebackRecord`]) as read from the store, with amounts
//!   held exactly as [`DecimalAmount`]
//! - **Range filter** ([`TimeRange`]) with the timestamp patterns used on the
//!   command line and in the output file
//! - **Error types** ([`ChargebackError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ChargebackError>`]:
//!
//! ```rust
//! use chargeback_export::domain::{parse_timestamp, Result};
//!
//! fn example() -> Result<()> {
//!     let start = parse_timestamp("2024-01-01T00:00:00")?;
//!     assert_eq!(start.to_string(), "2024-01-01 00:00:00");
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod amount;
pub mod chargeback;
pub mod errors;
pub mod result;
pub mod time_range;

// Re-export commonly used types for convenience
pub use amount::DecimalAmount;
pub use chargeback::{ChargebackRecord, ChargebackRecordBuilder};
pub use errors::ChargebackError;
pub use result::Result;
pub use time_range::{parse_timestamp, TimeRange, DATE_FORMAT, FILE_STAMP_FORMAT, TIMESTAMP_FORMAT};
