//! PostgreSQL record source
//!
//! This module reads chargebacks from a PostgreSQL table through a pooled
//! connection.

pub mod client;
pub mod models;
pub mod reader;

pub use client::PostgreSQLClient;
pub use models::{range_query, record_from_row, CHARGEBACK_COLUMNS};
pub use reader::{PostgreSQLRangeReader, PostgreSQLSource};
