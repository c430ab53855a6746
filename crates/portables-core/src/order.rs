//! # Order Building
//!
//! Turns a ledger snapshot and checkout details into an immutable [`Order`].
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Building an Order                                  │
//! │                                                                         │
//! │  CartLedger + CustomerInfo                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_customer + "ledger not empty"                                │
//! │       │                                                                 │
//! │       ├── any failure ──► CoreError::Validation(all failing fields)    │
//! │       │                   (nothing is created)                          │
//! │       ▼                                                                 │
//! │  freeze lines ──► subtotal ──► ZIP tax quote ──► Order                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Clock and id generation are passed in so this module stays pure.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use crate::error::{CoreResult, ValidationError, ValidationErrors};
use crate::ledger::CartLedger;
use crate::money::Money;
use crate::tax::{tax_rate_for_zip, TaxQuote};
use crate::types::{CustomerInfo, Order, OrderCustomer, OrderLine};
use crate::validation::validate_customer;

/// Builds an order from the current ledger contents.
///
/// ## Preconditions
/// - ledger is non-empty (`items`)
/// - name and email non-empty after trimming
/// - ZIP code exactly 5 digits
///
/// Every violation is reported together.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use portables_core::ledger::CartLedger;
/// use portables_core::order::build_order;
/// use portables_core::types::{CustomerInfo, Product};
///
/// let iphone = Product {
///     id: 1001,
///     name: "iPhone 15 Pro".into(),
///     price_cents: 99999,
///     specs: None,
///     image: None,
/// };
/// let mut ledger = CartLedger::new();
/// ledger.add(&iphone, 1).unwrap();
///
/// let customer = CustomerInfo {
///     name: "Ada".into(),
///     email: "ada@example.com".into(),
///     phone: None,
///     zip_code: "90210".into(),
/// };
///
/// let order = build_order(&ledger, &customer, None, "ORD-1".into(), Utc::now()).unwrap();
/// assert_eq!(order.tax_cents, 10000);
/// assert_eq!(order.total_cents, 109999);
/// ```
pub fn build_order(
    ledger: &CartLedger,
    customer: &CustomerInfo,
    user_id: Option<String>,
    order_id: String,
    created_at: DateTime<Utc>,
) -> CoreResult<Order> {
    let mut errors = ValidationErrors::new();

    if ledger.is_empty() {
        errors.push(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    let customer = match validate_customer(customer) {
        Ok(customer) => Some(customer),
        Err(customer_errors) => {
            for err in customer_errors.errors() {
                errors.push(err.clone());
            }
            None
        }
    };

    errors.into_result()?;
    let customer = customer.ok_or_else(missing_zip)?;
    let rate = tax_rate_for_zip(&customer.zip_code).ok_or_else(missing_zip)?;

    let items: Vec<OrderLine> = ledger.lines().iter().map(OrderLine::from).collect();
    let subtotal: Money = ledger.subtotal();
    let quote = TaxQuote::at_rate(subtotal, rate);

    Ok(Order {
        order_id,
        customer: OrderCustomer::new(customer, user_id),
        items,
        subtotal_cents: subtotal.cents(),
        tax_cents: quote.tax.cents(),
        total_cents: quote.total.cents(),
        tax_rate_bps: rate.bps(),
        created_at,
    })
}

fn missing_zip() -> ValidationError {
    ValidationError::InvalidFormat {
        field: "zipCode".to_string(),
        reason: "must be exactly 5 digits".to_string(),
    }
}

// =============================================================================
// Order Numbers
// =============================================================================

/// Hands out order ids of the form `ORD-YYMMDD-HHMMSS-NNNNNN`.
///
/// The suffix comes from a monotonically increasing counter, so two orders
/// placed within the same second still get distinct ids. It is zero-padded
/// to six digits and widens past 999999 instead of wrapping.
#[derive(Debug, Default)]
pub struct OrderNumberer {
    sequence: AtomicU64,
}

impl OrderNumberer {
    pub fn new() -> Self {
        OrderNumberer {
            sequence: AtomicU64::new(0),
        }
    }

    /// Starts counting after `last`, e.g. when ids must not restart at 1.
    pub fn starting_after(last: u64) -> Self {
        OrderNumberer {
            sequence: AtomicU64::new(last),
        }
    }

    /// Next order id for an order created at `now`.
    pub fn next_id(&self, now: DateTime<Utc>) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("ORD-{}-{:06}", now.format("%y%m%d-%H%M%S"), seq)
    }
}
