use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{BlockedPeriod, BlockedPeriodInsert, Booking, BookingInsert, Profile, DEFAULT_SERVICE};

const DATE_FMT: &str = "%Y-%m-%d";
const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

fn fmt_date(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FMT).unwrap_or_else(|_| Utc::now().date_naive())
}

fn parse_datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT).unwrap_or_else(|_| Utc::now().naive_utc())
}

// ── Bookings ──

const BOOKING_COLS: &str =
    "id, created_at, date, time_slot, client_name, client_phone, service_type, is_completed, user_id";

fn booking_from_row(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    let created_at: String = row.get(1)?;
    let date: String = row.get(2)?;
    Ok(Booking {
        id: row.get(0)?,
        created_at: parse_datetime(&created_at),
        date: parse_date(&date),
        time_slot: row.get(3)?,
        client_name: row.get(4)?,
        client_phone: row.get(5)?,
        service_type: row.get(6)?,
        is_completed: row.get::<_, i64>(7)? != 0,
        user_id: row.get(8)?,
    })
}

/// Single-row insert. The UNIQUE(date, time_slot) constraint is the only
/// defence against two concurrent writers taking the same slot; callers
/// inspect the returned error to tell a constraint violation apart from
/// other failures.
pub fn create_booking(conn: &Connection, booking: &BookingInsert) -> rusqlite::Result<Booking> {
    let service_type = booking.service_type.as_deref().unwrap_or(DEFAULT_SERVICE);
    conn.query_row(
        &format!(
            "INSERT INTO bookings (date, time_slot, client_name, client_phone, service_type, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {BOOKING_COLS}"
        ),
        params![
            fmt_date(booking.date),
            booking.time_slot,
            booking.client_name,
            booking.client_phone,
            service_type,
            booking.user_id,
        ],
        booking_from_row,
    )
}

/// Active (not completed) bookings, optionally narrowed to one date, in
/// schedule order.
pub fn get_active_bookings(conn: &Connection, date: Option<NaiveDate>) -> rusqlite::Result<Vec<Booking>> {
    let mut bookings = vec![];
    match date {
        Some(d) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOOKING_COLS} FROM bookings
                 WHERE is_completed = 0 AND date = ?1
                 ORDER BY date ASC, time_slot ASC"
            ))?;
            let rows = stmt.query_map(params![fmt_date(d)], booking_from_row)?;
            for row in rows {
                bookings.push(row?);
            }
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOOKING_COLS} FROM bookings
                 WHERE is_completed = 0
                 ORDER BY date ASC, time_slot ASC"
            ))?;
            let rows = stmt.query_map([], booking_from_row)?;
            for row in rows {
                bookings.push(row?);
            }
        }
    }
    Ok(bookings)
}

/// Slot labels already taken on a date. Completed bookings still occupy
/// their slot, so there is deliberately no is_completed filter here.
pub fn get_booked_slots(conn: &Connection, date: NaiveDate) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT time_slot FROM bookings WHERE date = ?1")?;
    let rows = stmt.query_map(params![fmt_date(date)], |row| row.get::<_, String>(0))?;

    let mut slots = vec![];
    for row in rows {
        slots.push(row?);
    }
    Ok(slots)
}

pub fn get_booking(conn: &Connection, id: i64) -> rusqlite::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLS} FROM bookings WHERE id = ?1"),
        params![id],
        booking_from_row,
    );
    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn set_completed(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET is_completed = 1 WHERE id = ?1",
        params![id],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Blocked periods ──

fn blocked_period_from_row(row: &rusqlite::Row) -> rusqlite::Result<BlockedPeriod> {
    let start: String = row.get(1)?;
    let end: String = row.get(2)?;
    let created_at: String = row.get(4)?;
    Ok(BlockedPeriod {
        id: row.get(0)?,
        start_date: parse_date(&start),
        end_date: parse_date(&end),
        reason: row.get(3)?,
        created_at: parse_datetime(&created_at),
    })
}

/// Any period whose inclusive range contains the date. One hit is enough;
/// overlaps are permitted and indistinguishable to availability.
pub fn get_blocked_period(conn: &Connection, date: NaiveDate) -> rusqlite::Result<Option<BlockedPeriod>> {
    let d = fmt_date(date);
    let result = conn.query_row(
        "SELECT id, start_date, end_date, reason, created_at FROM blocked_periods
         WHERE start_date <= ?1 AND end_date >= ?1 LIMIT 1",
        params![d],
        blocked_period_from_row,
    );
    match result {
        Ok(period) => Ok(Some(period)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn insert_blocked_period(
    conn: &Connection,
    period: &BlockedPeriodInsert,
) -> rusqlite::Result<BlockedPeriod> {
    conn.query_row(
        "INSERT INTO blocked_periods (start_date, end_date, reason)
         VALUES (?1, ?2, ?3)
         RETURNING id, start_date, end_date, reason, created_at",
        params![
            fmt_date(period.start_date),
            fmt_date(period.end_date),
            period.reason,
        ],
        blocked_period_from_row,
    )
}

// ── Profiles ──

pub fn get_profile(conn: &Connection, id: &str) -> rusqlite::Result<Option<Profile>> {
    let result = conn.query_row(
        "SELECT id, email, is_admin, created_at FROM profiles WHERE id = ?1",
        params![id],
        |row| {
            let created_at: String = row.get(3)?;
            Ok(Profile {
                id: row.get(0)?,
                email: row.get(1)?,
                is_admin: row.get::<_, i64>(2)? != 0,
                created_at: parse_datetime(&created_at),
            })
        },
    );
    match result {
        Ok(profile) => Ok(Some(profile)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn upsert_profile(conn: &Connection, id: &str, email: &str, is_admin: bool) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO profiles (id, email, is_admin) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET email = excluded.email, is_admin = excluded.is_admin",
        params![id, email, is_admin as i64],
    )?;
    Ok(())
}
