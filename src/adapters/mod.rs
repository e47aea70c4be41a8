//! External system integrations for the exporter.
//!
//! - [`database`] - Record source abstraction (trait-based)
//! - [`postgresql`] - PostgreSQL record source
//! - [`memory`] - In-process record source
//! - [`csv`] - Delimited file writer
//!
//! Sources sit behind the [`database::RecordSource`] trait so the export
//! pipeline can run against any backend:
//!
//! ```rust,no_run
//! use chargeback_export::adapters::database::create_record_source;
//! use chargeback_export::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(Some("chargeback.toml"))?;
//! let source = create_record_source(&config).await?;
//! println!("Reading from {}", source.describe());
//! # Ok(())
//! # }
//! ```

pub mod csv;
pub mod database;
pub mod memory;
pub mod postgresql;
