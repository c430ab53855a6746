//! # portables-core: Pure Business Logic for SmartPortables
//!
//! This crate is the **heart** of the storefront. It contains the shopping
//! and checkout rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    SmartPortables Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront client                            │   │
//! │  │    Categories ──► Product ──► Cart ──► Checkout ──► Confirmed   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    storefront-api (axum)                        │   │
//! │  │    sessions, routes, order submission, config, logging         │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────────┐  ┌────────▼──────────────────┐    │
//! │  │  ★ portables-core (THIS CRATE) ★│  │   portables-catalog       │    │
//! │  │                                 │  │   read-only catalog store │    │
//! │  │  money  ledger  tax  validation │  └───────────────────────────┘    │
//! │  │  order  checkout  types         │                                    │
//! │  │                                 │                                    │
//! │  │  NO I/O • NO CLOCK • NO NETWORK │                                    │
//! │  └─────────────────────────────────┘                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, LineItem, Order, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ledger`] - The cart ledger
//! - [`tax`] - ZIP-derived sales tax
//! - [`validation`] - Checkout field rules
//! - [`order`] - Building orders and order numbers
//! - [`checkout`] - Checkout phases
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use portables_core::{CartLedger, Product};
//!
//! let pixel = Product {
//!     id: 1003,
//!     name: "Google Pixel 8".into(),
//!     price_cents: 79999,
//!     specs: None,
//!     image: None,
//! };
//!
//! let mut ledger = CartLedger::new();
//! ledger.add(&pixel, 2).unwrap();
//!
//! // ZIP 10001 → 2% tax
//! assert_eq!(ledger.subtotal().cents(), 159998);
//! assert_eq!(ledger.tax("10001").unwrap().cents(), 3200);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod ledger;
pub mod money;
pub mod order;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::{Checkout, CheckoutPhase, LedgerDisposition};
pub use error::{CoreError, CoreResult, FieldError, ValidationError, ValidationErrors};
pub use ledger::{CartLedger, LedgerTotals};
pub use money::Money;
pub use order::{build_order, OrderNumberer};
pub use tax::{tax_rate_for_zip, TaxQuote};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct products in a single ledger.
///
/// ## Business Reason
/// Keeps carts and order payloads to a reasonable size.
pub const MAX_LEDGER_LINES: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Catches slips like typing 1000 instead of 10.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Highest accepted unit price in cents.
///
/// A full ledger at this price, plus the highest tax rate, still fits in
/// an `i64` of cents, so ledger arithmetic cannot overflow.
pub const MAX_PRICE_CENTS: i64 = i64::MAX / (MAX_LINE_QUANTITY * MAX_LEDGER_LINES as i64) / 2;
