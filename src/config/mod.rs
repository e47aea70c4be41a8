//! Configuration management for the chargeback exporter.
//!
//! # Overview
//!
//! Configuration comes from an optional TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CHARGEBACK_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation once, at load time
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`OutputConfig`] - Output directory for the CSV file
//! - [`PostgreSQLConfig`] - Source database connection and table
//! - [`LoggingConfig`] - Optional JSON file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [output]
//! directory = "./output"
//!
//! [postgresql]
//! connection_string = "${CHARGEBACK_DB_URL}"
//! table = "chargebacks"
//! ssl_mode = "prefer"
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chargeback_export::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(Some("chargeback.toml"))?;
//! println!("Output directory: {}", config.output.directory.display());
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{ApplicationConfig, ExporterConfig, LoggingConfig, OutputConfig, PostgreSQLConfig};
pub use secret::{redact_connection_string, secret_string, SecretString, SecretValue};
