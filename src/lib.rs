// Chargeback Export - PostgreSQL to CSV batch export
// Copyright (c) 2025 Chargeback Export Contributors
// Licensed under the MIT License

//! # Chargeback Export
//!
//! Exports chargeback dispute records created within a time range from
//! PostgreSQL into a single CSV file.
//!
//! ## Overview
//!
//! One run:
//! - **Creates** the output file `chargebacks_<start>_to_<end>.csv` and writes its header
//! - **Streams** matching records in ascending creation order
//! - **Transforms** each record (identity by default)
//! - **Commits** records in chunks of 100; a failed chunk leaves no rows behind
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export orchestration and record transformation
//! - [`adapters`] - Record sources (PostgreSQL, in-memory) and the CSV writer
//! - [`domain`] - Records, time ranges and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chargeback_export::adapters::database::create_record_source;
//! use chargeback_export::config::load_config;
//! use chargeback_export::core::export::ExportOrchestrator;
//! use chargeback_export::core::transform::PassThroughTransformer;
//! use chargeback_export::domain::{parse_timestamp, TimeRange};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config(Some("chargeback.toml"))?;
//!     let source = create_record_source(&config).await?;
//!
//!     let orchestrator = ExportOrchestrator::new(
//!         source,
//!         Arc::new(PassThroughTransformer),
//!         config.output.directory.clone(),
//!     );
//!
//!     let range = TimeRange::new(
//!         parse_timestamp("2024-01-01T00:00:00")?,
//!         parse_timestamp("2024-01-31T23:59:59")?,
//!     );
//!     let result = orchestrator.run(&range).await?;
//!
//!     println!("Exported {} records to {}", result.record_count, result.output_path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`domain::ChargebackError`]. A failed run is
//! reported as [`domain::ChargebackError::ExportFailed`] with the first error
//! as its cause; the output file keeps the header and every chunk committed
//! before the failure.
//!
//! ## Output Format
//!
//! Values are joined with commas and never quoted. A value that contains a
//! comma shifts the columns of its row.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
