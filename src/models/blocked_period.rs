use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// An admin-declared closed date range. Both ends are inclusive and
/// overlapping periods are allowed; availability only asks whether a date
/// falls inside any of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockedPeriod {
    pub id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedPeriodInsert {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
}

impl BlockedPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}
