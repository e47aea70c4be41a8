//! Export command implementation
//!
//! Resolves the time range, wires the PostgreSQL source into the pipeline
//! and reports the result.

use crate::adapters::database::create_record_source;
use crate::config::load_config;
use crate::core::export::ExportOrchestrator;
use crate::core::transform::PassThroughTransformer;
use crate::domain::{parse_timestamp, Result, TimeRange};
use crate::logging::init_logging;
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Configuration file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "chargeback.toml";

/// Arguments for the export command
#[derive(Args, Debug, Default, Clone)]
pub struct ExportArgs {
    /// Inclusive lower bound (yyyy-MM-ddTHH:mm:ss); defaults to today 00:00:00
    #[arg(long = "startTimestamp", value_name = "TIMESTAMP")]
    pub start_timestamp: Option<String>,

    /// Inclusive upper bound (yyyy-MM-ddTHH:mm:ss); defaults to today 23:59:59
    #[arg(long = "endTimestamp", value_name = "TIMESTAMP")]
    pub end_timestamp: Option<String>,
}

impl ExportArgs {
    /// Resolve the export range relative to `today`
    ///
    /// An absent or empty bound falls back to the start or end of `today`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTimestampFormat` for a bound that does not parse.
    pub fn resolve_range(&self, today: NaiveDate) -> Result<TimeRange> {
        let day = TimeRange::for_day(today);
        let start = resolve_bound(self.start_timestamp.as_deref(), day.start())?;
        let end = resolve_bound(self.end_timestamp.as_deref(), day.end())?;
        Ok(TimeRange::new(start, end))
    }

    /// Execute the export command
    ///
    /// Returns the process exit code: 0 on success, 1 when the range does
    /// not parse or the run fails.
    pub async fn execute(
        &self,
        config_path: Option<&Path>,
        log_level: Option<&str>,
    ) -> anyhow::Result<i32> {
        // Range problems abort before any configuration or I/O
        let range = match self.resolve_range(Local::now().date_naive()) {
            Ok(range) => range,
            Err(e) => {
                eprintln!("{e}");
                return Ok(1);
            }
        };

        let config_path = resolve_config_path(config_path);
        let config = load_config(config_path.as_deref())?;

        let level = log_level.unwrap_or(config.application.log_level.as_str());
        let _guard = init_logging(level, &config.logging)?;

        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            config = ?config_path,
            range = %range,
            "Chargeback export starting"
        );
        if range.is_inverted() {
            tracing::warn!(range = %range, "Start is after end; no records can match");
        }

        let source = create_record_source(&config).await?;
        let orchestrator = ExportOrchestrator::new(
            source,
            Arc::new(PassThroughTransformer),
            config.output.directory.clone(),
        );

        match orchestrator.run(&range).await {
            Ok(result) => {
                result.log_summary();
                println!("Output: {}", result.output_path.display());
                println!("Records exported: {}", result.record_count);
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("{e}");
                eprintln!("The output file may be incomplete");
                Ok(1)
            }
        }
    }
}

fn resolve_bound(value: Option<&str>, default: NaiveDateTime) -> Result<NaiveDateTime> {
    match value {
        None | Some("") => Ok(default),
        Some(value) => parse_timestamp(value),
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            fallback.exists().then(|| fallback.to_path_buf())
        }
    }
}
