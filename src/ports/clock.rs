//! Clock port for obtaining the build timestamp.

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// Abstracting time access lets tests pin the `build_time` written into the
/// generated metadata module.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Converts a timestamp to fractional seconds since the Unix epoch.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn epoch_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp() as f64 + f64::from(time.timestamp_subsec_micros()) / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_seconds_keeps_fraction() {
        let time = DateTime::parse_from_rfc3339("2024-06-15T10:30:00.25Z").unwrap().with_timezone(&Utc);
        assert!((epoch_seconds(time) - 1_718_447_400.25).abs() < 1e-6);
    }
}
