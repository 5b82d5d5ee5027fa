use rusqlite::Connection;

use crate::db::queries;
use crate::errors::{map_store_error, AppError};
use crate::models::{Booking, BookingInsert, DEFAULT_SERVICE};

/// Reserve one slot for one client.
///
/// Validation happens before any store call; the uniqueness of
/// (date, time_slot) is left entirely to the store's constraint so that of
/// two concurrent writers exactly one succeeds. A constraint violation
/// comes back as [`AppError::Conflict`], everything else as
/// [`AppError::Store`]. Nothing is retried here.
pub fn create_booking(conn: &Connection, req: &BookingInsert) -> Result<Booking, AppError> {
    if req.time_slot.trim().is_empty() {
        return Err(AppError::Validation("time_slot"));
    }
    let client_name = req.client_name.trim();
    if client_name.is_empty() {
        return Err(AppError::Validation("client_name"));
    }
    let client_phone = req.client_phone.trim();
    if client_phone.is_empty() {
        return Err(AppError::Validation("client_phone"));
    }

    let normalized = BookingInsert {
        date: req.date,
        time_slot: req.time_slot.trim().to_string(),
        client_name: client_name.to_string(),
        client_phone: client_phone.to_string(),
        service_type: Some(
            req.service_type
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_SERVICE)
                .to_string(),
        ),
        user_id: req.user_id.clone(),
    };

    queries::create_booking(conn, &normalized).map_err(map_store_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::NaiveDate;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn request(name: &str, phone: &str) -> BookingInsert {
        BookingInsert {
            date: d("2025-06-15"),
            time_slot: "10:00".to_string(),
            client_name: name.to_string(),
            client_phone: phone.to_string(),
            service_type: None,
            user_id: None,
        }
    }

    #[test]
    fn test_valid_booking_is_created() {
        let conn = setup_db();
        let booking = create_booking(&conn, &request("Driton", "043980804")).unwrap();
        assert!(booking.id > 0);
        assert_eq!(booking.date, d("2025-06-15"));
        assert_eq!(booking.time_slot, "10:00");
        assert!(!booking.is_completed);
        assert_eq!(booking.service_type, DEFAULT_SERVICE);
    }

    #[test]
    fn test_blank_name_is_rejected_before_any_store_call() {
        let conn = setup_db();
        let err = create_booking(&conn, &request("   ", "043980804")).unwrap_err();
        assert!(matches!(err, AppError::Validation("client_name")));

        let err = create_booking(&conn, &request("Driton", "")).unwrap_err();
        assert!(matches!(err, AppError::Validation("client_phone")));

        let mut req = request("Driton", "043980804");
        req.time_slot = " ".to_string();
        let err = create_booking(&conn, &req).unwrap_err();
        assert!(matches!(err, AppError::Validation("time_slot")));

        assert!(queries::get_booked_slots(&conn, d("2025-06-15")).unwrap().is_empty());
    }

    #[test]
    fn test_names_and_phones_are_trimmed() {
        let conn = setup_db();
        let booking = create_booking(&conn, &request("  Driton ", " 043980804 ")).unwrap();
        assert_eq!(booking.client_name, "Driton");
        assert_eq!(booking.client_phone, "043980804");
    }

    #[test]
    fn test_second_writer_for_the_same_slot_gets_conflict() {
        let conn = setup_db();
        create_booking(&conn, &request("Driton", "043980804")).unwrap();

        let err = create_booking(&conn, &request("Arber", "044123456")).unwrap_err();
        assert!(matches!(err, AppError::Conflict));

        // exactly one row exists afterwards
        let slots = queries::get_booked_slots(&conn, d("2025-06-15")).unwrap();
        assert_eq!(slots, vec!["10:00"]);
    }

    #[test]
    fn test_custom_service_type_is_kept() {
        let conn = setup_db();
        let mut req = request("Driton", "043980804");
        req.service_type = Some("Rregullim mjekre".to_string());
        let booking = create_booking(&conn, &req).unwrap();
        assert_eq!(booking.service_type, "Rregullim mjekre");
    }
}
