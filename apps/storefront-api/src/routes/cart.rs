//! # Cart Routes
//!
//! Endpoints that manipulate the session's ledger.
//!
//! ## Cart Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Endpoints                                       │
//! │                                                                         │
//! │  Shopper Action           Endpoint                    Ledger Op         │
//! │  ──────────────           ────────                    ─────────         │
//! │                                                                         │
//! │  Click product ──────────► POST /api/cart ──────────► add              │
//! │                                                                         │
//! │  Change quantity ────────► PUT /api/cart/{id} ──────► set_quantity     │
//! │                                                                         │
//! │  Click "Remove" ─────────► DELETE /api/cart/{id} ───► remove           │
//! │                                                                         │
//! │  Empty cart ─────────────► DELETE /api/cart ────────► clear            │
//! │                                                                         │
//! │  Enter ZIP ──────────────► GET /api/cart?zip= ──────► totals (read)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every endpoint answers with the updated [`CartView`]. Mutations are
//! rejected with 409 while an order is being submitted.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use portables_core::CoreResult;
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::{AppState, CartView, SessionId};

#[derive(Debug, Default, Deserialize)]
pub struct CartQuery {
    pub zip: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: i64,

    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// Gets the current cart.
///
/// Tax and total are `null` until a usable ZIP code is supplied.
pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    Extension(session_id): Extension<SessionId>,
    query: Result<Query<CartQuery>, QueryRejection>,
) -> ApiResult<ApiResponse<CartView>> {
    let Query(query) = query?;
    debug!(session_id = %session_id, zip = ?query.zip, "get_cart");

    let view = state.read_session(session_id, |s| s.cart_view(query.zip.as_deref()));
    Ok(ApiResponse::ok(view))
}

/// Adds a product to the cart.
///
/// ## Example Request
/// ```json
/// { "productId": 1001, "quantity": 2 }
/// ```
pub async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    Extension(session_id): Extension<SessionId>,
    payload: Result<Json<AddToCartRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<CartView>> {
    let Json(request) = payload?;
    debug!(
        session_id = %session_id,
        product_id = request.product_id,
        quantity = request.quantity,
        "add_to_cart"
    );

    let product = state.catalog.get_product(request.product_id)?;
    let view = state
        .session(session_id)
        .with_session_mut(|s| -> CoreResult<CartView> {
            s.checkout.ledger_mut()?.add(&product, request.quantity)?;
            Ok(s.cart_view(None))
        })?;

    Ok(ApiResponse::ok(view).with_message("Product added to cart"))
}

/// Sets the quantity of a cart line. Zero or less removes it.
pub async fn update_cart_item(
    State(state): State<Arc<AppState>>,
    Extension(session_id): Extension<SessionId>,
    product_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateQuantityRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<CartView>> {
    let Path(product_id) = product_id?;
    let Json(request) = payload?;
    debug!(
        session_id = %session_id,
        product_id,
        quantity = request.quantity,
        "update_cart_item"
    );

    let view = state
        .session(session_id)
        .with_session_mut(|s| -> CoreResult<CartView> {
            s.checkout
                .ledger_mut()?
                .set_quantity(product_id, request.quantity)?;
            Ok(s.cart_view(None))
        })?;

    Ok(ApiResponse::ok(view).with_message("Cart updated"))
}

/// Removes a line. Removing an absent line succeeds.
pub async fn remove_cart_item(
    State(state): State<Arc<AppState>>,
    Extension(session_id): Extension<SessionId>,
    product_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<ApiResponse<CartView>> {
    let Path(product_id) = product_id?;
    debug!(session_id = %session_id, product_id, "remove_cart_item");

    let view = state
        .session(session_id)
        .with_session_mut(|s| -> CoreResult<CartView> {
            s.checkout.ledger_mut()?.remove(product_id);
            Ok(s.cart_view(None))
        })?;

    Ok(ApiResponse::ok(view).with_message("Item removed from cart"))
}

pub async fn clear_cart(
    State(state): State<Arc<AppState>>,
    Extension(session_id): Extension<SessionId>,
) -> ApiResult<ApiResponse<CartView>> {
    debug!(session_id = %session_id, "clear_cart");

    let view = state
        .session(session_id)
        .with_session_mut(|s| -> CoreResult<CartView> {
            s.checkout.ledger_mut()?.clear();
            Ok(s.cart_view(None))
        })?;

    Ok(ApiResponse::ok(view).with_message("Cart cleared"))
}
