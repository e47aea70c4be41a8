//! Chargeback domain model
//!
//! This module defines the record exported for each disputed transaction.

use super::amount::DecimalAmount;
use chrono::{NaiveDate, NaiveDateTime};

/// A single chargeback (financial dispute) row
///
/// Every field is nullable in the store, so every field is optional here.
/// The value is immutable once built: fields are only reachable through
/// accessors.
///
/// # Examples
///
/// ```
/// use chargeback_export::domain::ChargebackRecord;
/// use chrono::NaiveDate;
///
/// let record = ChargebackRecord::builder()
///     .disputed_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
///     .disputed_amount("100.50".parse().unwrap())
///     .disputed_currency("USD")
///     .merchandise_reference("ORD-1001")
///     .dispute_reason("Item not received")
///     .created_at(
///         NaiveDate::from_ymd_opt(2024, 5, 2)
///             .unwrap()
///             .and_hms_opt(10, 0, 0)
///             .unwrap(),
///     )
///     .build();
///
/// assert_eq!(record.disputed_currency(), Some("USD"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChargebackRecord {
    disputed_date: Option<NaiveDate>,
    disputed_amount: Option<DecimalAmount>,
    disputed_currency: Option<String>,
    merchandise_reference: Option<String>,
    dispute_reason: Option<String>,
    created_at: Option<NaiveDateTime>,
}

impl ChargebackRecord {
    /// Creates a new builder for constructing a record
    pub fn builder() -> ChargebackRecordBuilder {
        ChargebackRecordBuilder::default()
    }

    /// Date the dispute was raised
    pub fn disputed_date(&self) -> Option<NaiveDate> {
        self.disputed_date
    }

    /// Disputed amount, with the scale it was stored with
    pub fn disputed_amount(&self) -> Option<&DecimalAmount> {
        self.disputed_amount.as_ref()
    }

    /// Currency code, usually ISO 4217
    pub fn disputed_currency(&self) -> Option<&str> {
        self.disputed_currency.as_deref()
    }

    /// Merchant-side reference for the disputed purchase
    pub fn merchandise_reference(&self) -> Option<&str> {
        self.merchandise_reference.as_deref()
    }

    /// Free-text reason given for the dispute
    pub fn dispute_reason(&self) -> Option<&str> {
        self.dispute_reason.as_deref()
    }

    /// Creation timestamp; the column the export range filters on
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.created_at
    }

    /// Returns a builder seeded with this record's values
    ///
    /// Transformers use this to derive an adjusted copy without mutating
    /// the original.
    pub fn to_builder(&self) -> ChargebackRecordBuilder {
        ChargebackRecordBuilder {
            record: self.clone(),
        }
    }
}

/// Builder for constructing [`ChargebackRecord`] instances
///
/// Unset fields stay null.
#[derive(Debug, Default)]
pub struct ChargebackRecordBuilder {
    record: ChargebackRecord,
}

impl ChargebackRecordBuilder {
    /// Creates an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the dispute date
    pub fn disputed_date(mut self, date: NaiveDate) -> Self {
        self.record.disputed_date = Some(date);
        self
    }

    /// Sets the disputed amount
    pub fn disputed_amount(mut self, amount: DecimalAmount) -> Self {
        self.record.disputed_amount = Some(amount);
        self
    }

    /// Sets the currency code
    pub fn disputed_currency(mut self, currency: impl Into<String>) -> Self {
        self.record.disputed_currency = Some(currency.into());
        self
    }

    /// Sets the merchandise reference
    pub fn merchandise_reference(mut self, reference: impl Into<String>) -> Self {
        self.record.merchandise_reference = Some(reference.into());
        self
    }

    /// Sets the dispute reason
    pub fn dispute_reason(mut self, reason: impl Into<String>) -> Self {
        self.record.dispute_reason = Some(reason.into());
        self
    }

    /// Sets the creation timestamp
    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.record.created_at = Some(created_at);
        self
    }

    /// Sets every field at once from nullable column values
    ///
    /// Used by row mappers where each column may be SQL NULL.
    #[allow(clippy::too_many_arguments)]
    pub fn from_columns(
        disputed_date: Option<NaiveDate>,
        disputed_amount: Option<DecimalAmount>,
        disputed_currency: Option<String>,
        merchandise_reference: Option<String>,
        dispute_reason: Option<String>,
        created_at: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            record: ChargebackRecord {
                disputed_date,
                disputed_amount,
                disputed_currency,
                merchandise_reference,
                dispute_reason,
                created_at,
            },
        }
    }

    /// Builds the record
    pub fn build(self) -> ChargebackRecord {
        self.record
    }
}
