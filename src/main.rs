// Chargeback Export - PostgreSQL to CSV batch export
// Copyright (c) 2025 Chargeback Export Contributors
// Licensed under the MIT License

use chargeback_export::cli::Cli;
use clap::Parser;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let exit_code = match cli.execute().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e:#}");
            1
        }
    };

    process::exit(exit_code);
}
