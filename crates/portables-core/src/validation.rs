//! # Validation Module
//!
//! Input validation utilities for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront client                                            │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (Rust)                                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Order builder                                                │
//! │  └── Refuses to build an Order from anything that failed here          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use portables_core::validation::{validate_zip_code, validate_quantity};
//!
//! assert!(validate_zip_code("90210").is_ok());
//! assert!(validate_quantity(5).is_ok());
//! ```

use crate::error::{ValidationError, ValidationErrors};
use crate::tax::parse_zip_code;
use crate::types::CustomerInfo;
use crate::{MAX_LINE_QUANTITY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest name or email accepted at checkout.
pub const MAX_FIELD_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required text field and returns it trimmed.
///
/// ## Example
/// ```rust
/// use portables_core::validation::validate_required;
///
/// assert_eq!(validate_required("name", "  Ada ").unwrap(), "Ada");
/// assert!(validate_required("name", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_FIELD_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_FIELD_LEN,
        });
    }

    Ok(value.to_string())
}

/// Validates a ZIP code and returns it trimmed.
///
/// ## Rules
/// - Exactly 5 ASCII digits after trimming
pub fn validate_zip_code(zip: &str) -> ValidationResult<String> {
    if zip.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "zipCode".to_string(),
        });
    }

    parse_zip_code(zip)
        .map(str::to_string)
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "zipCode".to_string(),
            reason: "must be exactly 5 digits".to_string(),
        })
}

/// Normalizes an optional phone number. Never fails.
///
/// ## Rules
/// - blank or missing → `None`
/// - exactly 10 digits once punctuation is stripped → `(AAA) BBB-CCCC`
/// - anything else is kept as typed, trimmed
///
/// ## Example
/// ```rust
/// use portables_core::validation::normalize_phone;
///
/// assert_eq!(normalize_phone(Some("555.123.4567")).as_deref(), Some("(555) 123-4567"));
/// assert_eq!(normalize_phone(Some("+44 20 7946 0958")).as_deref(), Some("+44 20 7946 0958"));
/// assert_eq!(normalize_phone(Some("  ")), None);
/// ```
pub fn normalize_phone(phone: Option<&str>) -> Option<String> {
    let phone = phone?.trim();
    if phone.is_empty() {
        return None;
    }

    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let only_punctuation = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '.' | '(' | ')'));

    if digits.len() == 10 && only_punctuation {
        Some(format!(
            "({}) {}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..10]
        ))
    } else {
        Some(phone.to_string())
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Order: submit explicit items                                           │
/// │                                                                         │
/// │  Client sends quantity: 5                                              │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → Proceed                                                 │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
/// - At most [`MAX_PRICE_CENTS`]
///
/// ## Example
/// ```rust
/// use portables_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(4999).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(i64::MAX).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

// =============================================================================
// Customer
// =============================================================================

/// Validates checkout details, reporting every failing field at once.
///
/// ## Returns
/// The customer with trimmed fields and a normalized phone.
///
/// ## Example
/// ```rust
/// use portables_core::types::CustomerInfo;
/// use portables_core::validation::validate_customer;
///
/// let bad = CustomerInfo {
///     name: " ".into(),
///     email: "".into(),
///     phone: None,
///     zip_code: "9021".into(),
/// };
/// let errors = validate_customer(&bad).unwrap_err();
/// assert_eq!(errors.fields(), vec!["name", "email", "zipCode"]);
/// ```
pub fn validate_customer(customer: &CustomerInfo) -> Result<CustomerInfo, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = errors.check(validate_required("name", &customer.name));
    let email = errors.check(validate_required("email", &customer.email));
    let zip_code = errors.check(validate_zip_code(&customer.zip_code));

    match (name, email, zip_code) {
        (Some(name), Some(email), Some(zip_code)) => Ok(CustomerInfo {
            name,
            email,
            phone: normalize_phone(customer.phone.as_deref()),
            zip_code,
        }),
        _ => Err(errors),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> CustomerInfo {
        CustomerInfo {
            name: "  Ada Lovelace ".to_string(),
            email: "ada@example.com ".to_string(),
            phone: Some("555-123-4567".to_string()),
            zip_code: " 90210".to_string(),
        }
    }

    #[test]
    fn test_validate_required() {
        assert_eq!(validate_required("name", "Ada").unwrap(), "Ada");
        assert!(validate_required("name", "").is_err());
        assert!(validate_required("name", "\t \n").is_err());
        assert!(validate_required("name", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_zip_code() {
        assert_eq!(validate_zip_code(" 02134 ").unwrap(), "02134");

        assert!(matches!(
            validate_zip_code(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_zip_code("9021"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(validate_zip_code("902101").is_err());
        assert!(validate_zip_code("9O210").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());

        assert!(validate_price_cents(-1).is_err());
        assert!(matches!(
            validate_price_cents(MAX_PRICE_CENTS + 1),
            Err(ValidationError::OutOfRange { max, .. }) if max == MAX_PRICE_CENTS
        ));
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(
            normalize_phone(Some("5551234567")).as_deref(),
            Some("(555) 123-4567")
        );
        assert_eq!(
            normalize_phone(Some("(555) 123 4567")).as_deref(),
            Some("(555) 123-4567")
        );
        assert_eq!(normalize_phone(Some(" ext 12 ")).as_deref(), Some("ext 12"));
        assert_eq!(normalize_phone(Some("")), None);
        assert_eq!(normalize_phone(None), None);
    }

    #[test]
    fn test_validate_customer_trims() {
        let valid = validate_customer(&customer()).unwrap();
        assert_eq!(valid.name, "Ada Lovelace");
        assert_eq!(valid.email, "ada@example.com");
        assert_eq!(valid.zip_code, "90210");
        assert_eq!(valid.phone.as_deref(), Some("(555) 123-4567"));
    }

    #[test]
    fn test_validate_customer_reports_all_fields() {
        let mut bad = customer();
        bad.name = "   ".to_string();
        bad.zip_code = "abcde".to_string();

        let errors = validate_customer(&bad).unwrap_err();
        assert_eq!(errors.fields(), vec!["name", "zipCode"]);
    }

    #[test]
    fn test_phone_never_blocks_checkout() {
        let mut odd = customer();
        odd.phone = Some("call me maybe".to_string());
        assert!(validate_customer(&odd).is_ok());
    }
}
