use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::response::sse::{Event, Sse};
use chrono::NaiveDate;
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::errors::AppError;
use crate::state::AppState;

// GET /api/events — SSE stream of booking changes
//
// Optionally narrowed to one date; deletes always pass the filter because
// the deleted row's date is unknowable. Lagged receivers drop the missed
// events and pick up with the next one.
#[derive(Deserialize)]
pub struct EventsQuery {
    pub date: Option<String>,
}

pub async fn events_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventsQuery>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, AppError> {
    let date = match query.date.as_deref() {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::BadRequest(format!("invalid date: {raw}")))?,
        ),
        None => None,
    };

    let rx = state.changes_tx.subscribe();

    let live_stream = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(event) => {
            if let Some(d) = date {
                if !event.matches_date(d) {
                    return None;
                }
            }
            let data = serde_json::to_string(&event).unwrap_or_default();
            Some(Ok::<_, Infallible>(Event::default().data(data).event("change")))
        }
        Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(_)) => None,
    });

    let keepalive_stream = tokio_stream::StreamExt::map(
        tokio_stream::wrappers::IntervalStream::new(tokio::time::interval(Duration::from_secs(30))),
        |_| Ok(Event::default().comment("keepalive")),
    );

    Ok(Sse::new(StreamExt::merge(live_stream, keepalive_stream)))
}
