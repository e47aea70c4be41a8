//! Logging and observability
//!
//! Structured logging through `tracing`, with an optional JSON file layer
//! and a few macros that keep export events uniform.
//!
//! # Example
//!
//! ```no_run
//! use chargeback_export::logging::init_logging;
//! use chargeback_export::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an export run
///
/// # Example
///
/// ```no_run
/// use chargeback_export::log_export_start;
/// use chargeback_export::domain::TimeRange;
/// use chrono::NaiveDate;
///
/// let range = TimeRange::for_day(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
/// log_export_start!(&range, "./output/chargebacks.csv");
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($range:expr, $path:expr) => {
        tracing::info!(
            range = %$range,
            output = %$path,
            "Starting export"
        );
    };
}

/// Log a committed chunk
///
/// # Example
///
/// ```no_run
/// use chargeback_export::log_chunk_committed;
///
/// log_chunk_committed!(3, 100, 300);
/// ```
#[macro_export]
macro_rules! log_chunk_committed {
    ($chunk:expr, $rows:expr, $total:expr) => {
        tracing::debug!(
            chunk = $chunk,
            rows = $rows,
            total_rows = $total,
            "Chunk committed"
        );
    };
}

/// Log the completion of an export run
///
/// # Example
///
/// ```no_run
/// use chargeback_export::log_export_complete;
/// use std::time::Duration;
///
/// log_export_complete!(42, Duration::from_secs(10));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Export completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use chargeback_export::log_error_with_context;
/// use chargeback_export::domain::ChargebackError;
///
/// let error = ChargebackError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
