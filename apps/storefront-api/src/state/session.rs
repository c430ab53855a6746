//! # Session State
//!
//! Per-shopper state: the checkout (ledger, phase, last order) and the
//! mock signed-in user.
//!
//! ## Thread Safety
//! Each session is wrapped in `Arc<Mutex<T>>` because:
//! 1. Concurrent requests may carry the same session id
//! 2. Only one request should modify a session at a time
//! 3. An order submission holds a handle across an `.await`
//!
//! Locks are never held across an `.await`.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Operations                                   │
//! │                                                                         │
//! │  Request                         SessionStore                           │
//! │  ───────                         ────────────                           │
//! │                                                                         │
//! │  no / bad x-session-id ────────► new id issued, echoed in response     │
//! │                                                                         │
//! │  GET cart/session/last order ──► get(id)                               │
//! │                                  (unknown id → empty view, not stored) │
//! │                                                                         │
//! │  cart edits, orders, sign-in ──► load_or_empty(id)                     │
//! │                                  (unknown id → fresh empty session)    │
//! │                                                                         │
//! │  DELETE /api/session ──────────► clear(id)                             │
//! │                                                                         │
//! │  idle past timeout ────────────► evicted on the next new session       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use portables_core::{Checkout, CheckoutPhase, LedgerTotals, LineItem, Order};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

/// The HTTP header carrying the session id.
pub const SESSION_ID_HEADER: &str = "x-session-id";

// =============================================================================
// Session Id
// =============================================================================

/// Identifies one shopper's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }

    /// Parses a header value; anything but a UUID is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim()).ok().map(SessionId)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Middleware that ensures every request has a session id.
///
/// If the request carries a valid `x-session-id` header, that value is used.
/// Otherwise a new id is generated. The id is:
/// 1. Stored in request extensions for handlers (`Extension<SessionId>`)
/// 2. Returned in the response headers so the client can keep using it
pub async fn session_id_middleware(mut request: Request, next: Next) -> Response {
    let session_id = request
        .headers()
        .get(SESSION_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(SessionId::parse)
        .unwrap_or_else(|| {
            let id = SessionId::new();
            debug!(session_id = %id, "Issuing new session id");
            id
        });

    request.extensions_mut().insert(session_id);

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&session_id.to_string()) {
        response.headers_mut().insert(SESSION_ID_HEADER, value);
    }

    response
}

// =============================================================================
// Session
// =============================================================================

/// Everything the server remembers about one shopper.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub checkout: Checkout,

    /// Mock sign-in: attached as-is, never verified.
    pub user_id: Option<String>,
}

/// Ledger contents and totals as returned by cart endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<LineItem>,
    pub totals: LedgerTotals,
    pub phase: CheckoutPhase,
}

/// The whole session as returned by `GET /api/session`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: SessionId,
    pub user_id: Option<String>,
    pub cart: CartView,
    pub last_order: Option<Order>,
}

impl Session {
    /// Cart view; tax fields are filled when `zip` is usable.
    pub fn cart_view(&self, zip: Option<&str>) -> CartView {
        let ledger = self.checkout.ledger();
        CartView {
            items: ledger.snapshot(),
            totals: ledger.totals(zip),
            phase: self.checkout.phase().clone(),
        }
    }

    pub fn view(&self, session_id: SessionId) -> SessionView {
        SessionView {
            session_id,
            user_id: self.user_id.clone(),
            cart: self.cart_view(None),
            last_order: self.checkout.last_order().cloned(),
        }
    }
}

// =============================================================================
// Session Handle
// =============================================================================

/// Shared handle to one session.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<Session>>,
}

impl SessionHandle {
    fn lock(&self) -> MutexGuard<'_, Session> {
        // A panic mid-update leaves a Session that is still structurally valid
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let view = handle.with_session(|s| s.cart_view(None));
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let session = self.lock();
        f(&session)
    }

    /// Executes a function with write access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// handle.with_session_mut(|s| s.checkout.ledger_mut()?.add(&product, 1))?;
    /// ```
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut session = self.lock();
        f(&mut session)
    }
}

// =============================================================================
// Session Store
// =============================================================================

/// Default for [`SessionStore::new`].
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Debug)]
struct SessionEntry {
    handle: SessionHandle,
    last_seen: Instant,
}

impl SessionEntry {
    /// Sessions mid-submission are kept regardless of age.
    fn is_expired(&self, now: Instant, idle_timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) >= idle_timeout
            && !self
                .handle
                .with_session(|s| s.checkout.phase().is_submitting())
    }
}

/// In-memory session storage. Nothing survives a restart.
///
/// Sessions idle for longer than the timeout are evicted whenever a new
/// session is created, so the map only grows with active shoppers.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, SessionEntry>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        SessionStore::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        SessionStore {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    fn map(&self) -> MutexGuard<'_, HashMap<SessionId, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the session for `id`, creating an empty one if unknown.
    pub fn load_or_empty(&self, id: SessionId) -> SessionHandle {
        self.load_or_empty_at(id, Instant::now())
    }

    fn load_or_empty_at(&self, id: SessionId, now: Instant) -> SessionHandle {
        let mut map = self.map();

        if let Some(entry) = map.get_mut(&id) {
            entry.last_seen = now;
            return entry.handle.clone();
        }

        let before = map.len();
        map.retain(|_, entry| !entry.is_expired(now, self.idle_timeout));
        let evicted = before - map.len();
        if evicted > 0 {
            info!(evicted, remaining = map.len(), "Evicted idle sessions");
        }

        debug!(session_id = %id, "Creating session");
        let handle = SessionHandle::default();
        map.insert(
            id,
            SessionEntry {
                handle: handle.clone(),
                last_seen: now,
            },
        );
        handle
    }

    /// Returns the session for `id` without creating one.
    pub fn get(&self, id: SessionId) -> Option<SessionHandle> {
        self.get_at(id, Instant::now())
    }

    fn get_at(&self, id: SessionId, now: Instant) -> Option<SessionHandle> {
        self.map().get_mut(&id).map(|entry| {
            entry.last_seen = now;
            entry.handle.clone()
        })
    }

    /// Forgets a session. Returns whether it existed.
    pub fn clear(&self, id: SessionId) -> bool {
        let removed = self.map().remove(&id).is_some();
        if removed {
            info!(session_id = %id, "Session cleared");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portables_core::Product;

    fn echo() -> Product {
        Product {
            id: 3001,
            name: "Amazon Echo Dot".to_string(),
            price_cents: 4999,
            specs: None,
            image: None,
        }
    }

    #[test]
    fn test_session_id_parse() {
        let id = SessionId::new();
        assert_eq!(SessionId::parse(&id.to_string()), Some(id));
        assert_eq!(SessionId::parse("not-a-uuid"), None);
        assert_eq!(SessionId::parse(""), None);
    }

    #[test]
    fn test_load_or_empty_returns_same_session() {
        let store = SessionStore::new();
        let id = SessionId::new();

        store
            .load_or_empty(id)
            .with_session_mut(|s| s.checkout.ledger_mut().map(|l| l.add(&echo(), 2)))
            .unwrap()
            .unwrap();

        let count = store
            .load_or_empty(id)
            .with_session(|s| s.checkout.ledger().item_count());
        assert_eq!(count, 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_session_is_empty() {
        let store = SessionStore::new();
        let view = store
            .load_or_empty(SessionId::new())
            .with_session(|s| s.cart_view(Some("90210")));

        assert!(view.items.is_empty());
        assert_eq!(view.totals.subtotal_cents, 0);
        assert_eq!(view.totals.tax_cents, Some(0));
    }

    #[test]
    fn test_clear() {
        let store = SessionStore::new();
        let id = SessionId::new();
        store.load_or_empty(id);

        assert!(store.clear(id));
        assert!(!store.clear(id));
        assert!(store.get(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let a = SessionId::new();
        let b = SessionId::new();

        store
            .load_or_empty(a)
            .with_session_mut(|s| s.user_id = Some("alice".to_string()));

        assert!(store.load_or_empty(b).with_session(|s| s.user_id.is_none()));
    }

    #[test]
    fn test_get_does_not_create() {
        let store = SessionStore::new();
        for _ in 0..100 {
            assert!(store.get(SessionId::new()).is_none());
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_idle_sessions_are_evicted() {
        let store = SessionStore::with_idle_timeout(Duration::from_secs(60));
        let start = Instant::now();
        let stale = SessionId::new();
        let active = SessionId::new();

        store.load_or_empty_at(stale, start);
        store.load_or_empty_at(active, start);
        store.get_at(active, start + Duration::from_secs(50));

        store.load_or_empty_at(SessionId::new(), start + Duration::from_secs(70));

        assert_eq!(store.len(), 2);
        assert!(store.get(stale).is_none());
        assert!(store.get(active).is_some());
    }

    #[test]
    fn test_submitting_session_is_not_evicted() {
        let store = SessionStore::with_idle_timeout(Duration::from_secs(60));
        let start = Instant::now();
        let id = SessionId::new();

        store
            .load_or_empty_at(id, start)
            .with_session_mut(|s| -> portables_core::CoreResult<()> {
                s.checkout.ledger_mut()?.add(&echo(), 1)?;
                s.checkout.begin_submission()?;
                Ok(())
            })
            .unwrap();

        store.load_or_empty_at(SessionId::new(), start + Duration::from_secs(600));
        assert!(store.get(id).is_some());
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let id = SessionId::new();
        let view = Session::default().view(id);
        let json = serde_json::to_value(view).unwrap();

        assert_eq!(json["sessionId"], id.to_string());
        assert_eq!(json["cart"]["phase"]["status"], "editing");
        assert!(json["lastOrder"].is_null());
    }
}
