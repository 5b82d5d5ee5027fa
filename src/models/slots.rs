/// Opening hour, inclusive.
pub const OPEN_HOUR: u32 = 8;
/// Closing hour, exclusive; the last slot of the day starts at 19:30.
pub const CLOSE_HOUR: u32 = 20;
/// Every appointment takes one fixed-length slot.
pub const SLOT_MINUTES: u32 = 30;

/// The ordered "HH:MM" labels of a working day. Deterministic, no external
/// input; the same sequence doubles as the fully-booked sentinel for a
/// closed day.
pub fn generate_time_slots() -> Vec<String> {
    let mut slots = Vec::with_capacity(((CLOSE_HOUR - OPEN_HOUR) * 60 / SLOT_MINUTES) as usize);
    for hour in OPEN_HOUR..CLOSE_HOUR {
        let mut minute = 0;
        while minute < 60 {
            slots.push(format!("{hour:02}:{minute:02}"));
            minute += SLOT_MINUTES;
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_count_and_bounds() {
        let slots = generate_time_slots();
        assert_eq!(slots.len(), 24);
        assert_eq!(slots.first().map(String::as_str), Some("08:00"));
        assert_eq!(slots.last().map(String::as_str), Some("19:30"));
        // 20:00 itself is never offered
        assert!(!slots.iter().any(|s| s == "20:00"));
    }

    #[test]
    fn test_slots_are_spaced_thirty_minutes_apart() {
        let slots = generate_time_slots();
        let minutes: Vec<u32> = slots
            .iter()
            .map(|s| {
                let (h, m) = s.split_once(':').unwrap();
                h.parse::<u32>().unwrap() * 60 + m.parse::<u32>().unwrap()
            })
            .collect();
        for pair in minutes.windows(2) {
            assert_eq!(pair[1] - pair[0], 30);
        }
    }

    #[test]
    fn test_slots_are_zero_padded() {
        let slots = generate_time_slots();
        assert!(slots.iter().all(|s| s.len() == 5 && s.as_bytes()[2] == b':'));
        assert_eq!(slots[1], "08:30");
        assert_eq!(slots[2], "09:00");
    }
}
