//! # Application State
//!
//! Shared state handed to every handler as `State<Arc<AppState>>`.
//!
//! ## State Types
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Shared State                                    │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐      │
//! │  │ Arc<dyn Catalog  │  │  SessionStore    │  │  OrderSubmitter  │      │
//! │  │      Store>      │  │  ──────────────  │  │  ──────────────  │      │
//! │  │  read-only       │  │  id → Session    │  │  order numbers   │      │
//! │  │  no locking      │  │  Mutex per entry │  │  latency         │      │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod session;

use std::sync::Arc;

use portables_catalog::CatalogStore;

use crate::config::ApiConfig;
use crate::services::checkout::OrderSubmitter;

pub use session::{
    session_id_middleware, CartView, Session, SessionHandle, SessionId, SessionStore, SessionView,
    SESSION_ID_HEADER,
};

/// State shared by all handlers.
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub sessions: SessionStore,
    pub submitter: OrderSubmitter,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogStore>, config: &ApiConfig) -> Self {
        AppState {
            catalog,
            sessions: SessionStore::with_idle_timeout(config.sessions.idle_timeout()),
            submitter: OrderSubmitter::new(config.checkout.submission_latency()),
        }
    }

    /// Session for the current request, created empty if unknown.
    pub fn session(&self, id: SessionId) -> SessionHandle {
        self.sessions.load_or_empty(id)
    }

    /// Reads a session without storing anything for an unknown id.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let view = state.read_session(id, |s| s.cart_view(None));
    /// ```
    pub fn read_session<F, R>(&self, id: SessionId, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        match self.sessions.get(id) {
            Some(handle) => handle.with_session(f),
            None => f(&Session::default()),
        }
    }
}
