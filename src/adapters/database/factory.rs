//! Record source factory
//!
//! This module builds the configured record source so the orchestrator only
//! ever sees the [`RecordSource`] trait.

use crate::adapters::database::traits::RecordSource;
use crate::adapters::postgresql::{PostgreSQLClient, PostgreSQLSource};
use crate::config::ExporterConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create the record source described by the configuration
///
/// The connection pool is created here; the first connection is only
/// established when a reader is opened.
///
/// # Errors
///
/// Returns an error if the connection settings are invalid or the pool
/// cannot be built.
pub async fn create_record_source(
    config: &ExporterConfig,
) -> Result<Arc<dyn RecordSource + Send + Sync>> {
    tracing::info!(table = %config.postgresql.table, "Creating PostgreSQL record source");

    let client = PostgreSQLClient::new(config.postgresql.clone()).await?;
    let source = PostgreSQLSource::new(client);

    Ok(Arc::new(source) as Arc<dyn RecordSource + Send + Sync>)
}
