//! Session endpoints: inspection, teardown and the mock sign-in.
//!
//! Sign-in attaches whatever `userId` the client sends. Nothing is verified.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use portables_core::validation::validate_required;
use portables_core::CoreError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::{AppState, SessionId, SessionView};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    #[serde(default)]
    pub user_id: String,
}

/// Result of `DELETE /api/session`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearedSession {
    pub session_id: SessionId,
    pub existed: bool,
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Extension(session_id): Extension<SessionId>,
) -> ApiResponse<SessionView> {
    debug!(session_id = %session_id, "get_session");
    let view = state.read_session(session_id, |s| s.view(session_id));
    ApiResponse::ok(view)
}

/// Forgets the session entirely. A later request with the same id starts
/// from an empty session.
pub async fn clear_session(
    State(state): State<Arc<AppState>>,
    Extension(session_id): Extension<SessionId>,
) -> ApiResponse<ClearedSession> {
    debug!(session_id = %session_id, "clear_session");
    let existed = state.sessions.clear(session_id);
    ApiResponse::ok(ClearedSession {
        session_id,
        existed,
    })
    .with_message("Session cleared")
}

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Extension(session_id): Extension<SessionId>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<SessionView>> {
    let Json(request) = payload?;
    let user_id = validate_required("userId", &request.user_id).map_err(CoreError::from)?;

    info!(session_id = %session_id, user_id = %user_id, "Mock sign-in");
    let view = state.session(session_id).with_session_mut(|s| {
        s.user_id = Some(user_id);
        s.view(session_id)
    });
    Ok(ApiResponse::ok(view).with_message("Signed in"))
}

pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    Extension(session_id): Extension<SessionId>,
) -> ApiResponse<SessionView> {
    debug!(session_id = %session_id, "sign_out");
    let view = state.session(session_id).with_session_mut(|s| {
        s.user_id = None;
        s.view(session_id)
    });
    ApiResponse::ok(view).with_message("Signed out")
}
