//! # Checkout State Machine
//!
//! Tracks where a shopper's checkout is and guards the ledger while an
//! order is in flight.
//!
//! ## Phases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │             begin_submission                  complete(order_id)        │
//! │  ┌─────────┐ ─────────────► ┌────────────┐ ─────────────► ┌──────────┐ │
//! │  │ Editing │                │ Submitting │                │Completed │ │
//! │  └─────────┘ ◄───────────── └────────────┘                └────┬─────┘ │
//! │       ▲          abort            │  ▲                          │       │
//! │       │   (validation failure,    │  │ begin_submission         │       │
//! │       │    client went away)      │  └──────────────────────────┘       │
//! │       │                           │                                     │
//! │       │                     second begin ──► SubmissionInProgress       │
//! │       │                     ledger edit  ──► SubmissionInProgress       │
//! └───────┴─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A completed checkout starts over with an empty ledger, so it may be
//! submitted again once the shopper has added new items.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::ledger::CartLedger;
use crate::types::Order;

/// Where a checkout currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CheckoutPhase {
    /// The shopper is editing the ledger.
    #[default]
    Editing,
    /// An order is being submitted; the ledger is frozen.
    Submitting,
    /// The last submission produced `order_id`.
    Completed {
        #[serde(rename = "orderId")]
        order_id: String,
    },
}

impl CheckoutPhase {
    pub fn is_submitting(&self) -> bool {
        matches!(self, CheckoutPhase::Submitting)
    }

    /// Enters `Submitting`. Fails if a submission is already running.
    pub fn begin_submission(&mut self) -> CoreResult<()> {
        if self.is_submitting() {
            return Err(CoreError::SubmissionInProgress);
        }
        *self = CheckoutPhase::Submitting;
        Ok(())
    }

    /// Returns to `Editing` after a failed or abandoned submission.
    /// Outside `Submitting` this does nothing.
    pub fn abort(&mut self) {
        if self.is_submitting() {
            *self = CheckoutPhase::Editing;
        }
    }

    /// Records a successful submission.
    pub fn complete(&mut self, order_id: String) -> CoreResult<()> {
        if !self.is_submitting() {
            return Err(CoreError::InvalidTransition {
                action: "complete an order".to_string(),
                phase: self.name().to_string(),
            });
        }
        *self = CheckoutPhase::Completed { order_id };
        Ok(())
    }

    /// Fails while the ledger is frozen.
    pub fn ensure_editable(&self) -> CoreResult<()> {
        if self.is_submitting() {
            Err(CoreError::SubmissionInProgress)
        } else {
            Ok(())
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CheckoutPhase::Editing => "editing",
            CheckoutPhase::Submitting => "submitting",
            CheckoutPhase::Completed { .. } => "completed",
        }
    }
}

/// What happens to the checkout's own ledger once an order completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerDisposition {
    /// The order was built from this ledger; start a fresh one.
    Clear,
    /// The order came from a snapshot supplied by the client.
    Keep,
}

/// A shopper's ledger together with its checkout phase and last order.
///
/// ## Usage
/// ```rust
/// use portables_core::checkout::{Checkout, LedgerDisposition};
/// use portables_core::types::Product;
///
/// let echo = Product { id: 3001, name: "Amazon Echo Dot".into(), price_cents: 4999, specs: None, image: None };
///
/// let mut checkout = Checkout::new();
/// checkout.ledger_mut().unwrap().add(&echo, 1).unwrap();
///
/// let snapshot = checkout.begin_submission().unwrap();
/// assert_eq!(snapshot.line_count(), 1);
/// assert!(checkout.ledger_mut().is_err()); // frozen while submitting
///
/// checkout.abort_submission();
/// assert!(checkout.ledger_mut().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    ledger: CartLedger,
    phase: CheckoutPhase,
    last_order: Option<Order>,
}

impl Checkout {
    pub fn new() -> Self {
        Checkout::default()
    }

    pub fn ledger(&self) -> &CartLedger {
        &self.ledger
    }

    /// Mutable ledger access, refused with `SubmissionInProgress` while
    /// an order is being submitted.
    pub fn ledger_mut(&mut self) -> CoreResult<&mut CartLedger> {
        self.phase.ensure_editable()?;
        Ok(&mut self.ledger)
    }

    pub fn phase(&self) -> &CheckoutPhase {
        &self.phase
    }

    pub fn last_order(&self) -> Option<&Order> {
        self.last_order.as_ref()
    }

    /// Freezes the ledger and returns a copy to build the order from.
    pub fn begin_submission(&mut self) -> CoreResult<CartLedger> {
        self.phase.begin_submission()?;
        Ok(self.ledger.clone())
    }

    /// Unfreezes the ledger; nothing was committed.
    pub fn abort_submission(&mut self) {
        self.phase.abort();
    }

    /// Commits a submitted order.
    pub fn complete_submission(
        &mut self,
        order: Order,
        disposition: LedgerDisposition,
    ) -> CoreResult<()> {
        self.phase.complete(order.order_id.clone())?;
        if disposition == LedgerDisposition::Clear {
            self.ledger.clear();
        }
        self.last_order = Some(order);
        Ok(())
    }
}
