//! Exact decimal amounts
//!
//! Amounts are kept as their canonical decimal text, so every digit and the
//! stored scale survive from the store to the output file regardless of
//! precision.

use super::errors::ChargebackError;
use super::result::Result;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Arbitrary-precision decimal in plain notation
///
/// Accepts an optional leading minus, at least one integer digit and an
/// optional fraction. Exponents, `NaN` and infinities are rejected.
///
/// # Examples
///
/// ```
/// use chargeback_export::domain::DecimalAmount;
///
/// let amount: DecimalAmount = "0.12345678901234567890123456789012".parse().unwrap();
/// assert_eq!(amount.to_string(), "0.12345678901234567890123456789012");
/// assert_eq!(amount.scale(), 32);
///
/// assert!("1.5e3".parse::<DecimalAmount>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecimalAmount(String);

impl DecimalAmount {
    /// Digits after the decimal point, as stored
    pub fn scale(&self) -> usize {
        self.0.split_once('.').map_or(0, |(_, fraction)| fraction.len())
    }

    /// The canonical text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn plain_decimal() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").ok())
        .as_ref()
}

impl FromStr for DecimalAmount {
    type Err = ChargebackError;

    fn from_str(s: &str) -> Result<Self> {
        match plain_decimal() {
            Some(re) if re.is_match(s) => Ok(Self(s.to_string())),
            _ => Err(ChargebackError::DataSource(format!(
                "'{s}' is not a finite decimal amount"
            ))),
        }
    }
}

impl fmt::Display for DecimalAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
