//! Domain error types
//!
//! This module defines the error hierarchy for the exporter. Errors carry
//! messages only, so third-party driver and I/O types never leak out of the
//! library API.

use thiserror::Error;

/// Main error type
///
/// Every fallible library operation returns this type. Failures inside a run
/// are wrapped in [`ChargebackError::ExportFailed`] by the orchestrator so the
/// caller receives a single failure signal with the cause attached.
#[derive(Debug, Error)]
pub enum ChargebackError {
    /// A timestamp argument did not match `yyyy-MM-ddTHH:mm:ss`
    #[error("Invalid timestamp format: {0}")]
    InvalidTimestampFormat(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connectivity or query failure from the record store
    #[error("Data source error: {0}")]
    DataSource(String),

    /// Filesystem failure while producing the output file
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// A transformer rejected a record
    #[error("Transform error: {0}")]
    Transform(String),

    /// An export run failed; `cause` is the first error hit by the run
    #[error("Export failed: {cause}")]
    ExportFailed {
        #[source]
        cause: Box<ChargebackError>,
    },
}

impl ChargebackError {
    /// Wraps an error as the cause of a failed export run
    ///
    /// An error that is already `ExportFailed` is returned unchanged so the
    /// cause chain never nests.
    pub fn export_failed(cause: ChargebackError) -> Self {
        match cause {
            already @ ChargebackError::ExportFailed { .. } => already,
            other => ChargebackError::ExportFailed {
                cause: Box::new(other),
            },
        }
    }

    /// Returns the underlying cause of an `ExportFailed`, or `self` otherwise
    pub fn root_cause(&self) -> &ChargebackError {
        match self {
            ChargebackError::ExportFailed { cause } => cause.root_cause(),
            other => other,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ChargebackError {
    fn from(err: std::io::Error) -> Self {
        ChargebackError::WriteFailure(err.to_string())
    }
}

// Conversion from csv writer errors
impl From<csv::Error> for ChargebackError {
    fn from(err: csv::Error) -> Self {
        ChargebackError::WriteFailure(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ChargebackError {
    fn from(err: toml::de::Error) -> Self {
        ChargebackError::Configuration(format!("TOML parse error: {err}"))
    }
}
