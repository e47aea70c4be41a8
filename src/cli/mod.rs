//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use clap::Parser;
use std::path::PathBuf;

/// Chargeback Export - chargeback records to CSV
#[derive(Parser, Debug)]
#[command(name = "chargeback-export")]
#[command(version, about, long_about = None)]
#[command(author = "Chargeback Export Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults to ./chargeback.toml when present)
    #[arg(short, long, env = "CHARGEBACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, env = "CHARGEBACK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Export range
    #[command(flatten)]
    pub export: commands::export::ExportArgs,
}

impl Cli {
    /// Run the export described by the arguments
    pub async fn execute(&self) -> anyhow::Result<i32> {
        self.export
            .execute(self.config.as_deref(), self.log_level.as_deref())
            .await
    }
}
