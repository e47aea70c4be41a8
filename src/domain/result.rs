//! Result type alias
//!
//! This module provides a convenient Result type alias that uses
//! `ChargebackError` as the error type.

use super::errors::ChargebackError;

/// Result type alias for exporter operations
///
/// # Examples
///
/// ```
/// use chargeback_export::domain::result::Result;
/// use chargeback_export::domain::errors::ChargebackError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ChargebackError::Configuration("missing connection string".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChargebackError>;
