//! # HTTP Routes
//!
//! All endpoints exposed to the storefront client.
//!
//! ## Route Organization
//! ```text
//! routes/
//! ├── mod.rs      ◄─── You are here (router assembly)
//! ├── catalog.rs  ◄─── /, /health, categories, products
//! ├── cart.rs     ◄─── /api/cart (ledger manipulation)
//! ├── session.rs  ◄─── /api/session (view, teardown, mock sign-in)
//! └── orders.rs   ◄─── /api/orders (submission, last order)
//! ```
//!
//! ## How Handlers Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Request Flow                                         │
//! │                                                                         │
//! │  POST /api/cart  { "productId": 1001, "quantity": 2 }                  │
//! │  x-session-id: 7d0c…                                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  session_id_middleware ──► Extension<SessionId>                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn add_to_cart(                                                 │
//! │      State(state): State<Arc<AppState>>,  ◄── catalog, sessions        │
//! │      Extension(id): Extension<SessionId>, ◄── from middleware          │
//! │      payload: Result<Json<AddToCartRequest>, JsonRejection>,           │
//! │  ) -> ApiResult<ApiResponse<CartView>>                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  { "success": true, "message": "Product added to cart", "data": … }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod catalog;
pub mod orders;
pub mod session;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;

use crate::error::ApiError;
use crate::state::AppState;

/// All application routes, without middleware.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(catalog::api_info))
        .route("/health", get(catalog::health))
        .route("/api/categories", get(catalog::list_categories))
        .route("/api/categories/{id}", get(catalog::get_category))
        .route("/api/products/{id}", get(catalog::get_product))
        .route(
            "/api/cart",
            get(cart::get_cart)
                .post(cart::add_to_cart)
                .delete(cart::clear_cart),
        )
        .route(
            "/api/cart/{product_id}",
            put(cart::update_cart_item).delete(cart::remove_cart_item),
        )
        .route(
            "/api/session",
            get(session::get_session).delete(session::clear_session),
        )
        .route(
            "/api/session/user",
            put(session::sign_in).delete(session::sign_out),
        )
        .route("/api/orders", post(orders::submit_order))
        .route("/api/orders/last", get(orders::last_order))
        .fallback(not_found)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Endpoint not found")
}
