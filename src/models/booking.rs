use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The shop offers a single service; every booking carries this label.
pub const DEFAULT_SERVICE: &str = "Qethje flokësh (Barber)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub date: NaiveDate,
    pub time_slot: String,
    pub client_name: String,
    pub client_phone: String,
    pub service_type: String,
    pub is_completed: bool,
    pub user_id: Option<String>,
}

/// Client-supplied fields of a new booking. `id`, `created_at` and the
/// completion flag are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingInsert {
    pub date: NaiveDate,
    pub time_slot: String,
    pub client_name: String,
    pub client_phone: String,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}
