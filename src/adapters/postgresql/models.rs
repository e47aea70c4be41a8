//! Row mapping between the chargeback table and the domain model

use crate::domain::{
    ChargebackError, ChargebackRecord, ChargebackRecordBuilder, DecimalAmount, Result,
};
use chrono::{NaiveDate, NaiveDateTime};
use tokio_postgres::types::FromSql;
use tokio_postgres::Row;

/// Columns selected by the range query, in output order
pub const CHARGEBACK_COLUMNS: [&str; 6] = [
    "disputed_dt",
    "disputed_amt",
    "disputed_curr",
    "merchandise_ref",
    "reason_for_dispute",
    "created_time",
];

/// Builds the fixed range query against `table`
///
/// `table` must already be validated as an identifier; the two bounds are
/// always bound as parameters. The amount is selected as text so NUMERIC
/// values keep every digit and their scale.
pub fn range_query(table: &str) -> String {
    let select_list: Vec<String> = CHARGEBACK_COLUMNS
        .iter()
        .map(|&column| match column {
            "disputed_amt" => "disputed_amt::text AS disputed_amt".to_string(),
            other => other.to_string(),
        })
        .collect();

    format!(
        "SELECT {} FROM {} WHERE created_time >= $1 AND created_time <= $2 ORDER BY created_time",
        select_list.join(", "),
        table
    )
}

/// Maps one result row to a [`ChargebackRecord`]
///
/// SQL NULL in any column becomes an absent field.
///
/// # Errors
///
/// Returns `DataSource` naming the column whose value has an unexpected type,
/// or for an amount that is not a finite decimal.
pub fn record_from_row(row: &Row) -> Result<ChargebackRecord> {
    Ok(ChargebackRecordBuilder::from_columns(
        column::<NaiveDate>(row, "disputed_dt")?,
        parse_amount(column::<String>(row, "disputed_amt")?)?,
        column::<String>(row, "disputed_curr")?,
        column::<String>(row, "merchandise_ref")?,
        column::<String>(row, "reason_for_dispute")?,
        column::<NaiveDateTime>(row, "created_time")?,
    )
    .build())
}

/// Parses the text form of a NUMERIC column
fn parse_amount(text: Option<String>) -> Result<Option<DecimalAmount>> {
    text.map(|value| {
        value.parse::<DecimalAmount>().map_err(|e| {
            ChargebackError::DataSource(format!("Failed to read column disputed_amt: {}", e))
        })
    })
    .transpose()
}

fn column<'a, T>(row: &'a Row, name: &str) -> Result<Option<T>>
where
    T: FromSql<'a>,
{
    row.try_get::<_, Option<T>>(name).map_err(|e| {
        ChargebackError::DataSource(format!("Failed to read column {}: {}", name, e))
    })
}
