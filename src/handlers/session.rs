use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::errors::AppError;
use crate::services::session::{fetch_profile, RetryPolicy};
use crate::state::AppState;

// POST /api/session/:principal
//
// Sign in as a known principal. The profile row decides the admin bit; a
// missing row yields a signed-in non-admin session, since the identity is
// valid even when the profile has not landed yet.
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Path(principal): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let profile = fetch_profile(&state.db, &principal, &RetryPolicy::default()).await?;
    let is_admin = profile.as_ref().map(|p| p.is_admin).unwrap_or(false);

    state.session.lock().unwrap().sign_in(&principal, is_admin);

    tracing::info!(%principal, is_admin, "session signed in");
    Ok(Json(serde_json::json!({
        "principal": principal,
        "is_admin": is_admin,
    })))
}

// GET /api/session
pub async fn current_session(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let session = state.session.lock().unwrap();
    Json(serde_json::json!({
        "principal": session.principal(),
        "is_admin": session.is_admin(),
    }))
}

// DELETE /api/session
pub async fn sign_out(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    state.session.lock().unwrap().sign_out();
    Json(serde_json::json!({"ok": true}))
}
