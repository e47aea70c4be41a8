//! Streaming range reader over the chargeback table
//!
//! The query runs through the driver's row stream. The connection task
//! stops reading the socket while the stream is not polled, so rows are
//! pulled from the server as the pipeline consumes them rather than being
//! collected up front.

use crate::adapters::database::traits::{CursorPosition, RecordSource, RecordStreamReader};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{range_query, record_from_row};
use crate::domain::{ChargebackError, ChargebackRecord, Result, TimeRange};
use async_trait::async_trait;
use deadpool_postgres::Object;
use futures::StreamExt;
use std::pin::Pin;
use tokio_postgres::types::ToSql;
use tokio_postgres::RowStream;

/// PostgreSQL implementation of [`RecordSource`]
pub struct PostgreSQLSource {
    client: PostgreSQLClient,
    query: String,
}

impl PostgreSQLSource {
    /// Create a source reading from the client's configured table
    pub fn new(client: PostgreSQLClient) -> Self {
        let query = range_query(client.table());
        Self { client, query }
    }
}

#[async_trait]
impl RecordSource for PostgreSQLSource {
    async fn open_reader(&self, range: &TimeRange) -> Result<Box<dyn RecordStreamReader>> {
        let connection = self.client.get_connection().await?;

        let start = range.start();
        let end = range.end();
        let params: [&(dyn ToSql + Sync); 2] = [&start, &end];

        let rows = connection
            .query_raw(self.query.as_str(), params)
            .await
            .map_err(|e| {
                ChargebackError::DataSource(format!("Failed to open chargeback cursor: {}", e))
            })?;

        tracing::debug!(
            table = %self.client.table(),
            range = %range,
            "Opened chargeback cursor"
        );

        Ok(Box::new(PostgreSQLRangeReader {
            range: *range,
            connection: Some(connection),
            rows: Some(Box::pin(rows)),
            position: CursorPosition::default(),
        }))
    }

    fn describe(&self) -> String {
        format!(
            "{} (table {})",
            self.client.connection_string_safe(),
            self.client.table()
        )
    }
}

/// Cursor over one range query
///
/// Holds its pooled connection until closed or dropped.
pub struct PostgreSQLRangeReader {
    range: TimeRange,
    connection: Option<Object>,
    rows: Option<Pin<Box<RowStream>>>,
    position: CursorPosition,
}

#[async_trait]
impl RecordStreamReader for PostgreSQLRangeReader {
    async fn next(&mut self) -> Result<Option<ChargebackRecord>> {
        let Some(rows) = self.rows.as_mut() else {
            return Ok(None);
        };

        match rows.next().await {
            Some(Ok(row)) => {
                let record = record_from_row(&row)?;
                self.position.advance();
                Ok(Some(record))
            }
            Some(Err(e)) => Err(ChargebackError::DataSource(format!(
                "Failed to fetch chargeback row {}: {}",
                self.position.read() + 1,
                e
            ))),
            None => {
                // Exhausted; the connection is kept until close()
                self.rows = None;
                Ok(None)
            }
        }
    }

    async fn acknowledge_chunk(&mut self, rows: usize) -> Result<()> {
        self.position.acknowledge(rows)
    }

    fn rows_read(&self) -> usize {
        self.position.read()
    }

    fn rows_acknowledged(&self) -> usize {
        self.position.acknowledged()
    }

    async fn close(&mut self) -> Result<()> {
        let had_rows = self.rows.take().is_some();
        if self.connection.take().is_some() {
            tracing::debug!(
                range = %self.range,
                rows_read = self.position.read(),
                rows_acknowledged = self.position.acknowledged(),
                exhausted = !had_rows,
                "Closed chargeback cursor"
            );
        }
        Ok(())
    }
}
