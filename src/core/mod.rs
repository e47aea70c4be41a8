//! Core pipeline logic.
//!
//! - [`transform`] - Per-record transformation step
//! - [`export`] - Chunked export orchestration and reporting
//!
//! # Example
//!
//! ```rust,no_run
//! use chargeback_export::adapters::memory::InMemorySource;
//! use chargeback_export::core::export::ExportOrchestrator;
//! use chargeback_export::core::transform::PassThroughTransformer;
//! use chargeback_export::domain::TimeRange;
//! use chrono::NaiveDate;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = ExportOrchestrator::new(
//!     Arc::new(InMemorySource::new(Vec::new())),
//!     Arc::new(PassThroughTransformer),
//!     "./output",
//! );
//!
//! let range = TimeRange::for_day(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
//! let result = orchestrator.run(&range).await?;
//! println!("{} rows in {}", result.record_count, result.output_path.display());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod transform;
