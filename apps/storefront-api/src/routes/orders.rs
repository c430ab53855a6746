//! # Order Routes
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout                                             │
//! │                                                                         │
//! │  Fill in form ───► POST /api/orders ───► OrderSubmitter::submit         │
//! │                          │                    │                         │
//! │                          │                    ├── 400 field errors      │
//! │                          │                    ├── 409 already running   │
//! │                          │                    └── 201 Order             │
//! │                          ▼                                              │
//! │  Confirmation page ───► GET /api/orders/last                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use portables_catalog::CatalogStore;
use portables_core::validation::validate_quantity;
use portables_core::{CartLedger, CoreError, CustomerInfo, Order};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::services::SubmissionRequest;
use crate::state::{AppState, SessionId};

/// Body of `POST /api/orders`.
///
/// ## Example Request
/// ```json
/// {
///   "customer": { "name": "Ada", "email": "ada@example.com", "zipCode": "90210" },
///   "userId": "user-1",
///   "items": [{ "productId": 1001, "quantity": 1 }]
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderRequest {
    #[serde(default)]
    pub customer: CustomerInfo,

    #[serde(default)]
    pub user_id: Option<String>,

    /// Submit these lines instead of the session's cart.
    #[serde(default)]
    pub items: Option<Vec<OrderItemRequest>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: i64,
    pub quantity: i64,
}

/// Rebuilds a ledger from client-supplied lines using catalog names and
/// prices. Repeated product ids accumulate.
fn ledger_from_items(
    catalog: &dyn CatalogStore,
    items: &[OrderItemRequest],
) -> ApiResult<CartLedger> {
    let mut ledger = CartLedger::new();
    for item in items {
        validate_quantity(item.quantity).map_err(CoreError::from)?;
        let product = catalog.get_product(item.product_id)?;
        ledger.add(&product, item.quantity)?;
    }
    Ok(ledger)
}

/// Submits the checkout.
///
/// Responds once the order is placed. If the client goes away first the
/// session is rolled back and nothing is recorded.
pub async fn submit_order(
    State(state): State<Arc<AppState>>,
    Extension(session_id): Extension<SessionId>,
    payload: Result<Json<SubmitOrderRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<Order>> {
    let Json(request) = payload?;
    debug!(
        session_id = %session_id,
        explicit_items = request.items.is_some(),
        "submit_order"
    );

    let items = request
        .items
        .as_deref()
        .map(|items| ledger_from_items(state.catalog.as_ref(), items))
        .transpose()?;

    let session = state.session(session_id);
    let order = state
        .submitter
        .submit(
            &session,
            SubmissionRequest {
                customer: request.customer,
                user_id: request.user_id,
                items,
            },
        )
        .await?;

    Ok(ApiResponse::created(order).with_message("Order placed"))
}

pub async fn last_order(
    State(state): State<Arc<AppState>>,
    Extension(session_id): Extension<SessionId>,
) -> ApiResult<ApiResponse<Order>> {
    debug!(session_id = %session_id, "last_order");
    state
        .read_session(session_id, |s| s.checkout.last_order().cloned())
        .map(ApiResponse::ok)
        .ok_or_else(|| ApiError::not_found("No order has been placed in this session"))
}
