use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{BlockedPeriod, BlockedPeriodInsert};

/// Set the completion flag. One-directional: there is no un-complete
/// operation. A completed booking keeps occupying its slot; the caller's
/// refresh signal only keeps listings consistent.
pub fn mark_completed(conn: &Connection, id: i64) -> Result<(), AppError> {
    if !queries::set_completed(conn, id)? {
        return Err(AppError::NotFound(format!("booking {id}")));
    }
    Ok(())
}

/// Unconditional hard delete. Terminal: there is no path back. Whether the
/// caller was allowed to do this is the store's concern; client-side checks
/// are advisory only.
pub fn delete_booking(conn: &Connection, id: i64) -> Result<(), AppError> {
    if !queries::delete_booking(conn, id)? {
        return Err(AppError::NotFound(format!("booking {id}")));
    }
    Ok(())
}

/// Declare a closed date range. Overlaps with existing periods are fine.
pub fn block_period(conn: &Connection, req: &BlockedPeriodInsert) -> Result<BlockedPeriod, AppError> {
    if req.start_date > req.end_date {
        return Err(AppError::BadRequest(
            "start_date must not be after end_date".to_string(),
        ));
    }
    queries::insert_blocked_period(conn, req).map_err(AppError::Store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::BookingInsert;
    use crate::services::availability;
    use chrono::{NaiveDate, NaiveDateTime};

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn book(conn: &Connection) -> i64 {
        queries::create_booking(
            conn,
            &BookingInsert {
                date: d("2025-06-16"),
                time_slot: "10:00".to_string(),
                client_name: "Luan".to_string(),
                client_phone: "045777888".to_string(),
                service_type: None,
                user_id: None,
            },
        )
        .unwrap()
        .id
    }

    #[test]
    fn test_mark_completed_sets_flag_and_is_idempotent_in_effect() {
        let conn = setup_db();
        let id = book(&conn);

        mark_completed(&conn, id).unwrap();
        assert!(queries::get_booking(&conn, id).unwrap().unwrap().is_completed);

        // no special-casing of the no-op update
        mark_completed(&conn, id).unwrap();
        assert!(queries::get_booking(&conn, id).unwrap().unwrap().is_completed);
    }

    #[test]
    fn test_mark_completed_unknown_id() {
        let conn = setup_db();
        let err = mark_completed(&conn, 9999).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_delete_is_terminal_for_active_and_completed() {
        let conn = setup_db();
        let id = book(&conn);
        mark_completed(&conn, id).unwrap();

        delete_booking(&conn, id).unwrap();
        assert!(queries::get_booking(&conn, id).unwrap().is_none());

        let err = delete_booking(&conn, id).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_block_period_rejects_inverted_range() {
        let conn = setup_db();
        let err = block_period(
            &conn,
            &BlockedPeriodInsert {
                start_date: d("2025-07-10"),
                end_date: d("2025-07-01"),
                reason: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_blocked_period_is_visible_to_availability_immediately() {
        let conn = setup_db();
        block_period(
            &conn,
            &BlockedPeriodInsert {
                start_date: d("2025-07-01"),
                end_date: d("2025-07-10"),
                reason: Some("Pushime verore".to_string()),
            },
        )
        .unwrap();

        let day = availability::resolve_day(&conn, d("2025-07-05"), dt("2025-06-01 09:00")).unwrap();
        assert_eq!(
            day.status,
            crate::models::DayStatus::AdminBlocked { reason: "Pushime verore".to_string() }
        );
    }

    #[test]
    fn test_single_day_block_is_allowed() {
        let conn = setup_db();
        let period = block_period(
            &conn,
            &BlockedPeriodInsert {
                start_date: d("2025-08-15"),
                end_date: d("2025-08-15"),
                reason: None,
            },
        )
        .unwrap();
        assert_eq!(period.start_date, period.end_date);
    }
}
