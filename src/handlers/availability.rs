use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::DayAvailability;
use crate::services::availability;
use crate::state::AppState;

// GET /api/availability?date=YYYY-MM-DD
#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
}

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<DayAvailability>, AppError> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("invalid date: {}", query.date)))?;

    let now = chrono::Local::now().naive_local();
    let day = {
        let db = state.db.lock().unwrap();
        availability::resolve_day(&db, date, now)?
    };

    Ok(Json(day))
}
