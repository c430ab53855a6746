//! Read-only catalog endpoints plus server info and health.

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use portables_core::{Category, CategorySummary, Product};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

pub async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "SmartPortables API Server",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            "GET /api/categories",
            "GET /api/categories/{id}",
            "GET /api/products/{id}",
            "GET /api/cart",
            "POST /api/cart",
            "PUT /api/cart/{productId}",
            "DELETE /api/cart/{productId}",
            "DELETE /api/cart",
            "GET /api/session",
            "DELETE /api/session",
            "PUT /api/session/user",
            "DELETE /api/session/user",
            "POST /api/orders",
            "GET /api/orders/last",
        ],
    })
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> ApiResponse<Vec<CategorySummary>> {
    debug!("list_categories");
    ApiResponse::list(state.catalog.list_categories())
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<ApiResponse<Category>> {
    let Path(id) = id?;
    debug!(category_id = id, "get_category");
    Ok(ApiResponse::ok(state.catalog.get_category(id)?))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<ApiResponse<Product>> {
    let Path(id) = id?;
    debug!(product_id = id, "get_product");
    Ok(ApiResponse::ok(state.catalog.get_product(id)?))
}
