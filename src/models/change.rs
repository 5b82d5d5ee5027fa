use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Booking;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A row-level change to the bookings table, broadcast to every open
/// subscriber after the write commits. Deletes carry only the old id; the
/// row itself is gone by the time the event is delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub booking: Option<Booking>,
    pub old_id: Option<i64>,
}

impl ChangeEvent {
    pub fn inserted(booking: Booking) -> Self {
        Self { kind: ChangeKind::Insert, booking: Some(booking), old_id: None }
    }

    pub fn updated(booking: Booking) -> Self {
        Self { kind: ChangeKind::Update, booking: Some(booking), old_id: None }
    }

    pub fn deleted(id: i64) -> Self {
        Self { kind: ChangeKind::Delete, booking: None, old_id: Some(id) }
    }

    /// Whether a consumer displaying `date` should react to this event.
    /// Deletes always match, since the deleted row's date cannot be
    /// inspected after removal.
    pub fn matches_date(&self, date: NaiveDate) -> bool {
        match self.kind {
            ChangeKind::Delete => true,
            _ => self.booking.as_ref().map(|b| b.date == date).unwrap_or(false),
        }
    }
}
