//! Clocks backed by the system time or a pinned instant.

use chrono::{DateTime, Utc};

use crate::ports::clock::Clock;

/// Live clock that returns the real current time.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant, used for reproducible build timestamps.
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Parses a `SOURCE_DATE_EPOCH`-style value (whole seconds since the epoch).
    #[must_use]
    pub fn from_epoch_str(value: &str) -> Option<Self> {
        let secs = value.trim().parse::<i64>().ok()?;
        DateTime::from_timestamp(secs, 0).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
