//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Local, LocalResult, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Creates a new timestamp by adding the specified number of days.
    ///
    /// Negative values subtract days.
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Creates a new timestamp by subtracting the specified number of days.
    pub fn minus_days(&self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    /// Returns the start of the server-local calendar day containing this
    /// instant (local `00:00:00`), expressed in UTC.
    ///
    /// Daily quotas reset on the server's local midnight, not on UTC midnight.
    /// When local midnight does not exist (a DST gap), UTC midnight of the
    /// local date is used instead.
    pub fn start_of_local_day(&self) -> Self {
        let local_date = self.0.with_timezone(&Local).date_naive();
        let midnight = local_date.and_time(NaiveTime::MIN);
        match midnight.and_local_timezone(Local) {
            LocalResult::Single(start) | LocalResult::Ambiguous(start, _) => {
                Self(start.with_timezone(&Utc))
            }
            LocalResult::None => Self(midnight.and_utc()),
        }
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}
