//! # Cart Ledger
//!
//! The shopper's in-progress selection: an ordered list of line items,
//! unique by product id.
//!
//! ## Ledger Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Operations                                    │
//! │                                                                         │
//! │  Shopper Action           Operation              Ledger Change          │
//! │  ──────────────           ─────────              ─────────────          │
//! │                                                                         │
//! │  Add to Cart ────────────► add(p, +n) ─────────► push or qty += n      │
//! │                                                                         │
//! │  "−" button ─────────────► add(p, -1) ─────────► qty -= 1 (0 removes)  │
//! │                                                                         │
//! │  Type quantity ──────────► set_quantity(id, n) ► replace line (<1 rm)  │
//! │                                                                         │
//! │  Click Remove ───────────► remove(id) ─────────► line gone (idempotent)│
//! │                                                                         │
//! │  View Cart ──────────────► totals(zip) ────────► (read only)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - at most one line per product id
//! - every line has quantity >= 1
//! - lines keep first-added order; updates never move a line
//! - a failed operation leaves the ledger unchanged
//!
//! The subtotal is an exact integer sum of cents. It is never stored, so
//! no sequence of operations can accumulate rounding error.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::tax::{self, TaxQuote};
use crate::types::{LineItem, Product};
use crate::{MAX_LEDGER_LINES, MAX_LINE_QUANTITY};

/// Ordered collection of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLedger {
    lines: Vec<LineItem>,
}

impl CartLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        CartLedger { lines: Vec::new() }
    }

    /// Adds `quantity_delta` units of a product.
    ///
    /// ## Behavior
    /// - product already present: its quantity changes by the delta; a
    ///   negative delta that drops it below 1 removes the line
    /// - product absent: the delta must be at least 1, the line is appended
    ///
    /// ## Errors
    /// - `InvalidQuantity` for a first add of fewer than one unit
    /// - `QuantityTooLarge` when the line would exceed 999 units
    /// - `LedgerFull` when a new line would exceed 100 lines
    pub fn add(&mut self, product: &Product, quantity_delta: i64) -> CoreResult<()> {
        if let Some(index) = self.position(product.id) {
            let current = &self.lines[index];
            let new_qty = current.quantity.saturating_add(quantity_delta);

            if new_qty < 1 {
                self.lines.remove(index);
                return Ok(());
            }
            if new_qty > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_LINE_QUANTITY,
                });
            }

            self.lines[index] = current.with_quantity(new_qty);
            return Ok(());
        }

        if quantity_delta < 1 {
            return Err(CoreError::InvalidQuantity {
                product_id: product.id,
                quantity: quantity_delta,
            });
        }
        if quantity_delta > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity_delta,
                max: MAX_LINE_QUANTITY,
            });
        }
        if self.lines.len() >= MAX_LEDGER_LINES {
            return Err(CoreError::LedgerFull {
                max: MAX_LEDGER_LINES,
            });
        }

        self.lines.push(LineItem::from_product(product, quantity_delta));
        Ok(())
    }

    /// Sets the quantity of a line.
    ///
    /// ## Behavior
    /// - `new_quantity < 1`: removes the line
    /// - otherwise the line is replaced in place
    /// - a product that is not in the ledger is left out; nothing changes
    ///
    /// ## Errors
    /// - `QuantityTooLarge` above 999
    pub fn set_quantity(&mut self, product_id: i64, new_quantity: i64) -> CoreResult<()> {
        if new_quantity < 1 {
            self.remove(product_id);
            return Ok(());
        }

        if new_quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: new_quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        if let Some(index) = self.position(product_id) {
            self.lines[index] = self.lines[index].with_quantity(new_quantity);
        }
        Ok(())
    }

    /// Removes a line. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: i64) -> bool {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != initial_len
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `unit_price × quantity` over every line.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(LineItem::line_total).sum()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Number of distinct products.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Tax on the subtotal for `zip`, `None` while the ZIP is not usable.
    pub fn tax(&self, zip: &str) -> Option<Money> {
        tax::quote(self.subtotal(), zip).map(|q| q.tax)
    }

    /// Subtotal + tax for `zip`, `None` while the ZIP is not usable.
    pub fn total(&self, zip: &str) -> Option<Money> {
        tax::quote(self.subtotal(), zip).map(|q| q.total)
    }

    /// Display summary; tax fields stay empty without a usable ZIP.
    pub fn totals(&self, zip: Option<&str>) -> LedgerTotals {
        let subtotal = self.subtotal();
        let quote: Option<TaxQuote> = zip.and_then(|z| tax::quote(subtotal, z));

        LedgerTotals {
            line_count: self.line_count(),
            item_count: self.item_count(),
            subtotal_cents: subtotal.cents(),
            tax_rate_bps: quote.map(|q| q.rate.bps()),
            tax_cents: quote.map(|q| q.tax.cents()),
            total_cents: quote.map(|q| q.total.cents()),
        }
    }

    /// Owned copy of the lines, used when an order is built.
    pub fn snapshot(&self) -> Vec<LineItem> {
        self.lines.clone()
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn get(&self, product_id: i64) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, product_id: i64) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id == product_id)
    }
}

/// Ledger totals summary for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTotals {
    pub line_count: usize,
    pub item_count: i64,
    pub subtotal_cents: i64,
    pub tax_rate_bps: Option<u32>,
    pub tax_cents: Option<i64>,
    pub total_cents: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn product(id: i64, price_cents: i64) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            price_cents,
            specs: None,
            image: None,
        }
    }

    #[test]
    fn test_add_item() {
        let mut ledger = CartLedger::new();
        ledger.add(&product(1001, 99999), 2).unwrap();

        assert_eq!(ledger.line_count(), 1);
        assert_eq!(ledger.item_count(), 2);
        assert_eq!(ledger.subtotal().cents(), 199998);
    }

    #[test]
    fn test_add_same_product_increases_quantity() {
        let mut ledger = CartLedger::new();
        let echo = product(3001, 4999);

        ledger.add(&echo, 2).unwrap();
        ledger.add(&echo, 3).unwrap();

        assert_eq!(ledger.line_count(), 1);
        assert_eq!(ledger.get(3001).unwrap().quantity, 5);
    }

    #[test]
    fn test_first_add_must_be_positive() {
        let mut ledger = CartLedger::new();
        let err = ledger.add(&product(1001, 100), 0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuantity { quantity: 0, .. }));

        let err = ledger.add(&product(1001, 100), -2).unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuantity { quantity: -2, .. }));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_negative_delta_decrements_then_removes() {
        let mut ledger = CartLedger::new();
        let nest = product(3002, 3999);

        ledger.add(&nest, 3).unwrap();
        ledger.add(&nest, -1).unwrap();
        assert_eq!(ledger.get(3002).unwrap().quantity, 2);

        ledger.add(&nest, -5).unwrap();
        assert!(ledger.get(3002).is_none());
    }

    #[test]
    fn test_add_respects_quantity_limit() {
        let mut ledger = CartLedger::new();
        let p = product(1, 100);

        ledger.add(&p, 998).unwrap();
        let err = ledger.add(&p, 2).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { requested: 1000, .. }));
        assert_eq!(ledger.get(1).unwrap().quantity, 998);

        assert!(ledger.add(&product(2, 100), 1000).is_err());
    }

    #[test]
    fn test_ledger_full() {
        let mut ledger = CartLedger::new();
        for id in 0..MAX_LEDGER_LINES as i64 {
            ledger.add(&product(id, 100), 1).unwrap();
        }

        let err = ledger.add(&product(9999, 100), 1).unwrap_err();
        assert!(matches!(err, CoreError::LedgerFull { .. }));

        // Existing lines can still grow
        ledger.add(&product(0, 100), 1).unwrap();
        assert_eq!(ledger.get(0).unwrap().quantity, 2);
    }

    #[test]
    fn test_full_ledger_at_price_cap_fits() {
        let mut ledger = CartLedger::new();
        for id in 0..MAX_LEDGER_LINES as i64 {
            ledger
                .add(&product(id, crate::MAX_PRICE_CENTS), MAX_LINE_QUANTITY)
                .unwrap();
        }

        // ZIP starting with 9 is the highest rate (10%)
        let totals = ledger.totals(Some("90210"));
        let subtotal = totals.subtotal_cents;
        assert_eq!(
            subtotal,
            crate::MAX_PRICE_CENTS * MAX_LINE_QUANTITY * MAX_LEDGER_LINES as i64
        );
        assert!(totals.total_cents.unwrap() > subtotal);
    }

    #[test]
    fn test_set_quantity_in_place() {
        let mut ledger = CartLedger::new();
        ledger.add(&product(1, 100), 1).unwrap();
        ledger.add(&product(2, 200), 1).unwrap();
        ledger.add(&product(3, 300), 1).unwrap();

        ledger.set_quantity(2, 7).unwrap();

        let ids: Vec<i64> = ledger.lines().iter().map(|l| l.product_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(ledger.get(2).unwrap().quantity, 7);
    }

    #[test]
    fn test_set_quantity_below_one_removes() {
        let mut ledger = CartLedger::new();
        ledger.add(&product(1, 100), 4).unwrap();

        ledger.set_quantity(1, 0).unwrap();
        assert!(ledger.is_empty());

        // Absent id with a non-positive target is a no-op
        ledger.set_quantity(42, -3).unwrap();
        ledger.set_quantity(42, 0).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_set_quantity_errors() {
        let mut ledger = CartLedger::new();
        ledger.add(&product(1, 100), 1).unwrap();

        assert!(matches!(
            ledger.set_quantity(1, 1000),
            Err(CoreError::QuantityTooLarge { .. })
        ));
        assert_eq!(ledger.get(1).unwrap().quantity, 1);
    }

    #[test]
    fn test_set_quantity_on_absent_line_is_noop() {
        let mut ledger = CartLedger::new();
        ledger.set_quantity(42, 3).unwrap();
        assert!(ledger.is_empty());

        ledger.add(&product(1, 100), 2).unwrap();
        let before = ledger.clone();
        ledger.set_quantity(42, 5).unwrap();
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut ledger = CartLedger::new();
        ledger.add(&product(1, 100), 1).unwrap();

        assert!(ledger.remove(1));
        assert!(!ledger.remove(1));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_subtotal_is_exact() {
        let mut ledger = CartLedger::new();
        ledger.add(&product(1001, 99999), 1).unwrap();
        ledger.add(&product(3001, 4999), 1).unwrap();
        ledger.add(&product(3002, 3999), 1).unwrap();

        // 999.99 + 49.99 + 39.99
        assert_eq!(ledger.subtotal().cents(), 108997);
    }

    #[test]
    fn test_tax_and_total() {
        let mut ledger = CartLedger::new();
        ledger.add(&product(1001, 99999), 1).unwrap();

        assert_eq!(ledger.tax("90210").unwrap().cents(), 10000);
        assert_eq!(ledger.total("90210").unwrap().cents(), 109999);
        assert!(ledger.tax("902").is_none());
        assert!(ledger.total("").is_none());
    }

    #[test]
    fn test_totals_without_zip() {
        let mut ledger = CartLedger::new();
        ledger.add(&product(1, 1000), 3).unwrap();

        let totals = ledger.totals(None);
        assert_eq!(totals.line_count, 1);
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.subtotal_cents, 3000);
        assert_eq!(totals.tax_cents, None);
        assert_eq!(totals.total_cents, None);

        let totals = ledger.totals(Some("40404"));
        assert_eq!(totals.tax_rate_bps, Some(500));
        assert_eq!(totals.tax_cents, Some(150));
        assert_eq!(totals.total_cents, Some(3150));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut ledger = CartLedger::new();
        ledger.add(&product(1, 100), 1).unwrap();

        let snapshot = ledger.snapshot();
        ledger.clear();

        assert_eq!(snapshot.len(), 1);
        assert!(ledger.is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(i64, i64),
        Set(i64, i64),
        Remove(i64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..5i64, -3..5i64).prop_map(|(id, d)| Op::Add(id, d)),
            (0..5i64, -1..10i64).prop_map(|(id, q)| Op::Set(id, q)),
            (0..5i64).prop_map(Op::Remove),
        ]
    }

    fn price_of(id: i64) -> i64 {
        [99999, 4999, 3999, 249999, 15999][id as usize]
    }

    proptest! {
        /// Whatever path the shopper takes, the subtotal only depends on the
        /// final quantities.
        #[test]
        fn prop_subtotal_matches_final_quantities(ops in prop::collection::vec(op(), 0..60)) {
            let mut ledger = CartLedger::new();
            for op in ops {
                let _ = match op {
                    Op::Add(id, d) => ledger.add(&product(id, price_of(id)), d),
                    Op::Set(id, q) => ledger.set_quantity(id, q),
                    Op::Remove(id) => {
                        ledger.remove(id);
                        Ok(())
                    }
                };
            }

            let mut rebuilt = CartLedger::new();
            for line in ledger.lines() {
                rebuilt
                    .add(&product(line.product_id, price_of(line.product_id)), line.quantity)
                    .unwrap();
            }

            prop_assert_eq!(ledger.subtotal(), rebuilt.subtotal());
            prop_assert!(ledger.lines().iter().all(|l| l.quantity >= 1));
        }
    }
}
