use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{BlockedPeriod, BlockedPeriodInsert, Booking, ChangeEvent};
use crate::services::lifecycle;
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Authorization);
    }
    Ok(())
}

// GET /api/bookings?date=YYYY-MM-DD
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub date: Option<String>,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let date = match query.date.as_deref() {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::BadRequest(format!("invalid date: {raw}")))?,
        ),
        None => None,
    };

    let bookings = {
        let db = state.db.lock().unwrap();
        queries::get_active_bookings(&db, date)?
    };

    Ok(Json(bookings))
}

// POST /api/admin/bookings/:id/complete
pub async fn complete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Booking>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let updated = {
        let db = state.db.lock().unwrap();
        lifecycle::mark_completed(&db, id)?;
        queries::get_booking(&db, id)?
    };

    let updated = updated.ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;
    let _ = state.changes_tx.send(ChangeEvent::updated(updated.clone()));

    tracing::info!(id, "booking marked completed");
    Ok(Json(updated))
}

// DELETE /api/admin/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    {
        let db = state.db.lock().unwrap();
        lifecycle::delete_booking(&db, id)?;
    }

    let _ = state.changes_tx.send(ChangeEvent::deleted(id));

    tracing::info!(id, "booking deleted by admin");
    Ok(Json(serde_json::json!({"ok": true})))
}

// POST /api/admin/block
pub async fn block_period(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<BlockedPeriodInsert>,
) -> Result<(StatusCode, Json<BlockedPeriod>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let period = {
        let db = state.db.lock().unwrap();
        lifecycle::block_period(&db, &body)?
    };

    tracing::info!(start = %period.start_date, end = %period.end_date, "period blocked");
    Ok((StatusCode::CREATED, Json(period)))
}
