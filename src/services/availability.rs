use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::slots::generate_time_slots;
use crate::models::{DayAvailability, DayStatus, SlotState, SlotStatus};

/// The shop is closed every Sunday; this is a rule of the business, not a
/// configurable setting.
pub const CLOSED_WEEKDAY: Weekday = Weekday::Sun;

/// Shown when an admin blocked a period without giving a reason.
pub const DEFAULT_BLOCKED_MESSAGE: &str = "Nuk ka termine për këtë datë.";

/// Classify `date` as seen at wall-clock `now`.
///
/// Check order: the weekly closure needs no store round-trip at all; a
/// blocked period is reported even for dates already in the past; only an
/// open day pays for the booked-slot query. The result is a snapshot;
/// callers re-resolve on date change, after their own writes, and on
/// matching change-feed events.
pub fn resolve_day(
    conn: &Connection,
    date: NaiveDate,
    now: NaiveDateTime,
) -> Result<DayAvailability, AppError> {
    let times = generate_time_slots();

    if date.weekday() == CLOSED_WEEKDAY {
        let slots = times
            .into_iter()
            .map(|time| SlotState { time, status: SlotStatus::Booked })
            .collect();
        return Ok(DayAvailability { date, status: DayStatus::WeeklyClosed, slots });
    }

    if let Some(period) = queries::get_blocked_period(conn, date)? {
        let reason = period
            .reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BLOCKED_MESSAGE.to_string());
        return Ok(DayAvailability {
            date,
            status: DayStatus::AdminBlocked { reason },
            slots: Vec::new(),
        });
    }

    if date < now.date() {
        return Ok(DayAvailability { date, status: DayStatus::Past, slots: Vec::new() });
    }

    let booked: HashSet<String> = queries::get_booked_slots(conn, date)?.into_iter().collect();
    let today = date == now.date();

    let slots = times
        .into_iter()
        .map(|time| {
            // booked wins over elapsed when both apply
            let status = if booked.contains(&time) {
                SlotStatus::Booked
            } else if today && slot_elapsed(&time, now.time()) {
                SlotStatus::Elapsed
            } else {
                SlotStatus::Available
            };
            SlotState { time, status }
        })
        .collect();

    Ok(DayAvailability { date, status: DayStatus::Open, slots })
}

fn slot_elapsed(slot: &str, now: NaiveTime) -> bool {
    NaiveTime::parse_from_str(slot, "%H:%M")
        .map(|t| t < now)
        .unwrap_or(false)
}
