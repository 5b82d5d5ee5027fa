use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::errors::AppError;
use crate::models::{Booking, BookingInsert, ChangeEvent};
use crate::services::{booking, lifecycle};
use crate::state::AppState;

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BookingInsert>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let created = {
        let db = state.db.lock().unwrap();
        booking::create_booking(&db, &body)?
    };

    state.registry.lock().unwrap().track(created.clone());
    // no subscribers is fine; the feed is best-effort
    let _ = state.changes_tx.send(ChangeEvent::inserted(created.clone()));

    tracing::info!(id = created.id, date = %created.date, slot = %created.time_slot, "booking created");
    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/my-bookings
pub async fn my_bookings(State(state): State<Arc<AppState>>) -> Json<Vec<Booking>> {
    Json(state.registry.lock().unwrap().bookings().to_vec())
}

// DELETE /api/bookings/:id
//
// Self-cancel for a booking this device created. Anything not in the
// registry is not ours to cancel.
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.registry.lock().unwrap().contains(id) {
        return Err(AppError::NotFound(format!("booking {id}")));
    }

    {
        let db = state.db.lock().unwrap();
        lifecycle::delete_booking(&db, id)?;
    }

    state.registry.lock().unwrap().untrack(id);
    let _ = state.changes_tx.send(ChangeEvent::deleted(id));

    tracing::info!(id, "booking cancelled by client");
    Ok(Json(serde_json::json!({"ok": true})))
}
