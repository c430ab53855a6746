//! # Order Submission
//!
//! Submits a session's checkout asynchronously.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     OrderSubmitter::submit                              │
//! │                                                                         │
//! │  1. lock session ─► begin_submission ─► copy ledger ─► unlock          │
//! │          │                                                              │
//! │          │ already Submitting? ──► 409 SubmissionInProgress            │
//! │          ▼                                                              │
//! │  2. build_order (validation first)                                      │
//! │          │                                                              │
//! │          │ invalid? ──► abort (back to Editing) ──► 400 + fields        │
//! │          ▼                                                              │
//! │  3. sleep(submission latency)      ◄── client may disconnect here      │
//! │          │                             guard drops ─► abort            │
//! │          ▼                                                              │
//! │  4. lock session ─► complete ─► last_order = order ─► clear ledger     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries: a failed submission leaves the ledger exactly as it was.

use std::time::Duration;

use chrono::Utc;
use portables_core::{build_order, CartLedger, CustomerInfo, LedgerDisposition, Order, OrderNumberer};
use tracing::{info, warn};

use crate::error::ApiResult;
use crate::state::SessionHandle;

/// What the shopper submitted.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub customer: CustomerInfo,

    /// Overrides the session's signed-in user when present.
    pub user_id: Option<String>,

    /// Ledger supplied by the client instead of the session's own.
    pub items: Option<CartLedger>,
}

/// Places orders against sessions.
#[derive(Debug)]
pub struct OrderSubmitter {
    numberer: OrderNumberer,
    latency: Duration,
}

impl OrderSubmitter {
    pub fn new(latency: Duration) -> Self {
        OrderSubmitter {
            numberer: OrderNumberer::new(),
            latency,
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Runs one submission to completion.
    ///
    /// Dropping the returned future before it resolves rolls the session
    /// back to `Editing` with its ledger untouched.
    pub async fn submit(
        &self,
        session: &SessionHandle,
        request: SubmissionRequest,
    ) -> ApiResult<Order> {
        let (session_ledger, session_user) = session.with_session_mut(|s| {
            s.checkout
                .begin_submission()
                .map(|ledger| (ledger, s.user_id.clone()))
        })?;
        let mut guard = SubmissionGuard::new(session);

        let (ledger, disposition) = match request.items {
            Some(items) => (items, LedgerDisposition::Keep),
            None => (session_ledger, LedgerDisposition::Clear),
        };
        let user_id = request.user_id.or(session_user);

        let now = Utc::now();
        let order = build_order(
            &ledger,
            &request.customer,
            user_id,
            self.numberer.next_id(now),
            now,
        )
        .map_err(|err| {
            warn!(error = %err, "Order submission rejected");
            err
        })?;

        tokio::time::sleep(self.latency).await;

        session.with_session_mut(|s| s.checkout.complete_submission(order.clone(), disposition))?;
        guard.disarm();

        info!(
            order_id = %order.order_id,
            items = order.item_count(),
            total = %order.total(),
            "Order submitted"
        );
        Ok(order)
    }
}

/// Returns the session to `Editing` unless the submission completed.
struct SubmissionGuard<'a> {
    session: &'a SessionHandle,
    armed: bool,
}

impl<'a> SubmissionGuard<'a> {
    fn new(session: &'a SessionHandle) -> Self {
        SubmissionGuard {
            session,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.session
                .with_session_mut(|s| s.checkout.abort_submission());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use portables_core::{CheckoutPhase, Product};

    fn iphone() -> Product {
        Product {
            id: 1001,
            name: "iPhone 15 Pro".to_string(),
            price_cents: 99999,
            specs: None,
            image: None,
        }
    }

    fn customer() -> CustomerInfo {
        CustomerInfo {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            zip_code: "90210".to_string(),
        }
    }

    fn request() -> SubmissionRequest {
        SubmissionRequest {
            customer: customer(),
            user_id: None,
            items: None,
        }
    }

    fn session_with_iphone() -> SessionHandle {
        let session = SessionHandle::default();
        session
            .with_session_mut(|s| s.checkout.ledger_mut().map(|l| l.add(&iphone(), 1)))
            .unwrap()
            .unwrap();
        session
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_completes_and_clears_ledger() {
        let submitter = OrderSubmitter::new(Duration::from_millis(500));
        let session = session_with_iphone();
        session.with_session_mut(|s| s.user_id = Some("user-1".to_string()));

        let started = tokio::time::Instant::now();
        let order = submitter.submit(&session, request()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(500));
        assert_eq!(order.total_cents, 109999);
        assert_eq!(order.customer.user_id.as_deref(), Some("user-1"));
        session.with_session(|s| {
            assert!(s.checkout.ledger().is_empty());
            assert_eq!(
                s.checkout.phase(),
                &CheckoutPhase::Completed {
                    order_id: order.order_id.clone()
                }
            );
            assert_eq!(s.checkout.last_order(), Some(&order));
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_submission_returns_to_editing() {
        let submitter = OrderSubmitter::new(Duration::from_millis(500));
        let session = session_with_iphone();

        let mut bad = request();
        bad.customer.zip_code = "123".to_string();

        let err = submitter.submit(&session, bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field_errors[0].field, "zipCode");

        session.with_session(|s| {
            assert_eq!(s.checkout.phase(), &CheckoutPhase::Editing);
            assert_eq!(s.checkout.ledger().item_count(), 1);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_ledger_is_rejected() {
        let submitter = OrderSubmitter::new(Duration::ZERO);
        let err = submitter
            .submit(&SessionHandle::default(), request())
            .await
            .unwrap_err();
        assert_eq!(err.field_errors[0].field, "items");
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submission_conflicts() {
        let submitter = OrderSubmitter::new(Duration::from_millis(500));
        let session = session_with_iphone();

        let (first, second) = tokio::join!(
            submitter.submit(&session, request()),
            async {
                // Let the first submission reach its latency sleep
                tokio::task::yield_now().await;
                submitter.submit(&session, request()).await
            }
        );

        assert!(first.is_ok());
        assert_eq!(second.unwrap_err().code, ErrorCode::SubmissionInProgress);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_submission_rolls_back() {
        let submitter = OrderSubmitter::new(Duration::from_secs(5));
        let session = session_with_iphone();

        let outcome = tokio::time::timeout(
            Duration::from_millis(10),
            submitter.submit(&session, request()),
        )
        .await;
        assert!(outcome.is_err());

        session.with_session(|s| {
            assert_eq!(s.checkout.phase(), &CheckoutPhase::Editing);
            assert_eq!(s.checkout.ledger().item_count(), 1);
            assert!(s.checkout.last_order().is_none());
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_items_leave_session_ledger() {
        let submitter = OrderSubmitter::new(Duration::ZERO);
        let session = session_with_iphone();

        let mut explicit = CartLedger::new();
        explicit
            .add(
                &Product {
                    id: 3002,
                    name: "Google Nest Mini".to_string(),
                    price_cents: 3999,
                    specs: None,
                    image: None,
                },
                2,
            )
            .unwrap();

        let order = submitter
            .submit(
                &session,
                SubmissionRequest {
                    customer: customer(),
                    user_id: Some("guest-42".to_string()),
                    items: Some(explicit),
                },
            )
            .await
            .unwrap();

        assert_eq!(order.subtotal_cents, 7998);
        assert_eq!(order.customer.user_id.as_deref(), Some("guest-42"));
        session.with_session(|s| assert_eq!(s.checkout.ledger().get(1001).unwrap().quantity, 1));
    }
}
