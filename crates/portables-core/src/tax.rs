//! # Tax Module
//!
//! The ZIP-derived sales tax rule.
//!
//! ## Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ZIP "90210"                                                            │
//! │     │                                                                   │
//! │     ├── trim, exactly 5 ASCII digits?  no ──► None (tax not computable) │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  first digit d = 9                                                     │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  rate = (d + 1)% = 10% = 1000 bps                                      │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  tax   = subtotal × rate, rounded half-up to cents                     │
//! │  total = subtotal + tax                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rates therefore range from 1% (ZIP 0xxxx) to 10% (ZIP 9xxxx).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::TaxRate;

/// Length every ZIP code must have.
pub const ZIP_CODE_LEN: usize = 5;

/// Returns the trimmed ZIP when it is exactly five ASCII digits.
pub fn parse_zip_code(zip: &str) -> Option<&str> {
    let zip = zip.trim();
    if zip.len() == ZIP_CODE_LEN && zip.bytes().all(|b| b.is_ascii_digit()) {
        Some(zip)
    } else {
        None
    }
}

/// Derives the tax rate for a ZIP code.
///
/// ## Example
/// ```rust
/// use portables_core::tax::tax_rate_for_zip;
///
/// assert_eq!(tax_rate_for_zip("90210").unwrap().bps(), 1000);
/// assert_eq!(tax_rate_for_zip("02134").unwrap().bps(), 100);
/// assert!(tax_rate_for_zip("9021").is_none());
/// assert!(tax_rate_for_zip("9021A").is_none());
/// ```
pub fn tax_rate_for_zip(zip: &str) -> Option<TaxRate> {
    let zip = parse_zip_code(zip)?;
    let first_digit = u32::from(zip.as_bytes()[0] - b'0');
    Some(TaxRate::from_bps((first_digit + 1) * 100))
}

/// Tax and total for one subtotal at one rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxQuote {
    pub rate: TaxRate,
    pub tax: Money,
    pub total: Money,
}

impl TaxQuote {
    /// Applies `rate` to `subtotal`. This is the only place tax is rounded.
    pub fn at_rate(subtotal: Money, rate: TaxRate) -> Self {
        let tax = subtotal.calculate_tax(rate);
        TaxQuote {
            rate,
            tax,
            total: subtotal + tax,
        }
    }
}

/// Quotes tax for a subtotal shipped to `zip`. `None` while the ZIP is
/// incomplete or malformed.
pub fn quote(subtotal: Money, zip: &str) -> Option<TaxQuote> {
    tax_rate_for_zip(zip).map(|rate| TaxQuote::at_rate(subtotal, rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_follows_first_digit() {
        for digit in 0..=9u32 {
            let zip = format!("{digit}1234");
            let rate = tax_rate_for_zip(&zip).unwrap();
            assert_eq!(rate.bps(), (digit + 1) * 100, "zip {zip}");
        }
    }

    #[test]
    fn test_zip_is_trimmed() {
        assert_eq!(tax_rate_for_zip("  30301 ").unwrap().bps(), 400);
    }

    #[test]
    fn test_malformed_zip_has_no_rate() {
        for zip in ["", "1234", "123456", "12a45", "-1234", "１２３４５"] {
            assert!(tax_rate_for_zip(zip).is_none(), "zip {zip:?}");
        }
    }

    #[test]
    fn test_quote_beverly_hills() {
        let quote = quote(Money::from_cents(99999), "90210").unwrap();
        assert_eq!(quote.rate.bps(), 1000);
        assert_eq!(quote.tax.cents(), 10000);
        assert_eq!(quote.total.cents(), 109999);
    }

    #[test]
    fn test_quote_rounds_half_up() {
        // $0.50 at 1% = $0.005 → $0.01
        let quote = quote(Money::from_cents(50), "01234").unwrap();
        assert_eq!(quote.tax.cents(), 1);
        assert_eq!(quote.total.cents(), 51);
    }

    #[test]
    fn test_quote_without_zip() {
        assert!(quote(Money::from_cents(1000), "902").is_none());
    }
}
