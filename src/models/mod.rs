pub mod availability;
pub mod blocked_period;
pub mod booking;
pub mod change;
pub mod profile;
pub mod slots;

pub use availability::{DayAvailability, DayStatus, SlotState, SlotStatus};
pub use blocked_period::{BlockedPeriod, BlockedPeriodInsert};
pub use booking::{Booking, BookingInsert, DEFAULT_SERVICE};
pub use change::{ChangeEvent, ChangeKind};
pub use profile::Profile;
