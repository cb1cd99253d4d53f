//! Time keeping module for PineTime

use chrono::{DateTime, NaiveDateTime, TimeDelta};
use embassy_time::Instant;

/// Wall clock time anchored to a system instant
#[derive(Clone, Copy)]
pub struct TimeReference {
    /// Clock time
    time: NaiveDateTime,
    /// Related system time
    instant: Instant,
}

impl TimeReference {
    /// Create new time reference from NaiveDateTime
    pub fn from_datetime(time: NaiveDateTime) -> Self {
        Self {
            time,
            instant: Instant::now(),
        }
    }

    /// Create new time reference from a UTC epoch and a local offset in seconds.
    ///
    /// Falls back to the Unix epoch if the timestamp is out of range.
    pub fn from_epoch(epoch: i64, offset: i32) -> Self {
        let time = DateTime::from_timestamp(epoch + offset as i64, 0)
            .map(|utc| utc.naive_utc())
            .unwrap_or_default();
        Self::from_datetime(time)
    }
}

/// Local clock, copies share the same reference
#[derive(Clone, Copy)]
pub struct TimeManager {
    reference: TimeReference,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init(reference: TimeReference) -> Self {
        Self { reference }
    }

    /// Get current time
    pub fn get_time(&self) -> NaiveDateTime {
        let elapsed = Instant::now().duration_since(self.reference.instant);
        self.reference.time + TimeDelta::microseconds(elapsed.as_micros() as i64)
    }
}
