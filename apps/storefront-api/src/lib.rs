//! # SmartPortables Storefront API
//!
//! HTTP server for the storefront: catalog browsing, a per-session cart and
//! asynchronous order submission.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Storefront API                                      │
//! │                                                                         │
//! │  Client ──► TraceLayer ──► CORS ──► session id ──► routes               │
//! │                                                      │                  │
//! │                         ┌────────────────────────────┼──────────┐      │
//! │                         ▼                            ▼          ▼      │
//! │                   CatalogStore               SessionStore  OrderSubmitter
//! │                  (portables-catalog)        (in memory)    (latency)   │
//! │                                                      │                  │
//! │                                                      ▼                  │
//! │                                               portables-core            │
//! │                                         ledger, tax, validation, order  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Layered configuration (defaults, TOML, environment)
//! - [`error`] - `ApiError` and its HTTP mapping
//! - [`response`] - Success envelope
//! - [`routes`] - HTTP handlers
//! - [`services`] - Order submission
//! - [`state`] - Shared state and sessions

pub mod config;
pub mod error;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::middleware;
use axum::Router;
use portables_catalog::{CatalogResult, CatalogStore, StaticCatalog};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ApiConfig;
use crate::state::{session_id_middleware, AppState};

/// Builds the complete application with middleware applied.
pub fn build_router(state: Arc<AppState>, config: &ApiConfig) -> Router {
    let router = routes::routes()
        .layer(middleware::from_fn(session_id_middleware))
        .with_state(state);

    let router = if config.server.cors_enabled {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}

/// Loads the configured catalog, or the built-in one when no path is set.
pub fn load_catalog(config: &ApiConfig) -> CatalogResult<Arc<dyn CatalogStore>> {
    let catalog = match &config.catalog.path {
        Some(path) => StaticCatalog::from_json_file(path)?,
        None => {
            let catalog = StaticCatalog::builtin();
            info!(
                categories = catalog.category_count(),
                products = catalog.product_count(),
                "Using built-in catalog"
            );
            catalog
        }
    };
    Ok(Arc::new(catalog))
}
