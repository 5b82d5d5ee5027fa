use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-slot classification. Exactly one state applies to each generated
/// slot; "elapsed" exists so the interface can distinguish a slot that is
/// gone for the day from one another client holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
    Elapsed,
}

/// Date-level classification of a whole day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayStatus {
    Open,
    WeeklyClosed,
    AdminBlocked { reason: String },
    Past,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotState {
    pub time: String,
    pub status: SlotStatus,
}

/// The Availability Resolver's answer for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub slots: Vec<SlotState>,
}

impl DayAvailability {
    pub fn slot_status(&self, time: &str) -> Option<SlotStatus> {
        self.slots.iter().find(|s| s.time == time).map(|s| s.status)
    }

    /// Whether a client may pass this slot to the booking writer.
    pub fn is_selectable(&self, time: &str) -> bool {
        self.status == DayStatus::Open && self.slot_status(time) == Some(SlotStatus::Available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(status: DayStatus, slots: Vec<SlotState>) -> DayAvailability {
        DayAvailability {
            date: NaiveDate::parse_from_str("2025-06-16", "%Y-%m-%d").unwrap(),
            status,
            slots,
        }
    }

    #[test]
    fn test_only_available_slots_on_open_days_are_selectable() {
        let d = day(
            DayStatus::Open,
            vec![
                SlotState { time: "08:00".into(), status: SlotStatus::Booked },
                SlotState { time: "08:30".into(), status: SlotStatus::Elapsed },
                SlotState { time: "09:00".into(), status: SlotStatus::Available },
            ],
        );
        assert!(!d.is_selectable("08:00"));
        assert!(!d.is_selectable("08:30"));
        assert!(d.is_selectable("09:00"));
        assert!(!d.is_selectable("23:00"));
    }

    #[test]
    fn test_nothing_is_selectable_on_a_closed_day() {
        let d = day(
            DayStatus::AdminBlocked { reason: "Pushime".into() },
            vec![SlotState { time: "09:00".into(), status: SlotStatus::Available }],
        );
        assert!(!d.is_selectable("09:00"));
    }
}
