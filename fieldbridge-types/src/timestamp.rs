//! Wire-format timestamp.
//!
//! Schema compilers emit timestamps as a pair of whole seconds since the
//! Unix epoch and a non-negative nanosecond adjustment. Domain models use
//! `chrono::DateTime<Utc>` instead; the codec between the two lives here.

use crate::{TypeError, TypeResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

const NANOS_PER_SECOND: i32 = 1_000_000_000;

/// A `{seconds, nanos}` timestamp as carried by wire messages.
///
/// `nanos` must lie in `0..1_000_000_000`; negative instants are expressed
/// with negative `seconds` and a positive `nanos` remainder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireTimestamp {
    seconds: i64,
    nanos: i32,
}

impl WireTimestamp {
    /// Creates a timestamp from components.
    #[must_use]
    pub const fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Creates a timestamp at the current time.
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Returns the seconds component.
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Returns the nanoseconds component.
    #[must_use]
    pub const fn nanos(&self) -> i32 {
        self.nanos
    }

    /// Returns true if `nanos` is within the canonical range.
    #[must_use]
    pub const fn is_normalized(&self) -> bool {
        self.nanos >= 0 && self.nanos < NANOS_PER_SECOND
    }

    /// Converts a native date-time into the wire representation.
    ///
    /// A leap second reports `nanos` past one second; the overflow is
    /// carried into `seconds` so the result stays normalized.
    #[must_use]
    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        let subsec = value.timestamp_subsec_nanos() as i32;
        Self {
            seconds: value
                .timestamp()
                .saturating_add(i64::from(subsec / NANOS_PER_SECOND)),
            nanos: subsec % NANOS_PER_SECOND,
        }
    }

    /// Converts to a native date-time.
    ///
    /// Fails when `nanos` is not normalized or the instant is outside the
    /// range chrono can represent.
    pub fn to_datetime(&self) -> TypeResult<DateTime<Utc>> {
        if !self.is_normalized() {
            return Err(self.out_of_range());
        }
        DateTime::<Utc>::from_timestamp(self.seconds, self.nanos as u32)
            .ok_or_else(|| self.out_of_range())
    }

    fn out_of_range(&self) -> TypeError {
        TypeError::TimestampOutOfRange {
            seconds: self.seconds,
            nanos: self.nanos,
        }
    }
}

impl From<DateTime<Utc>> for WireTimestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self::from_datetime(value)
    }
}

impl TryFrom<WireTimestamp> for DateTime<Utc> {
    type Error = TypeError;

    fn try_from(value: WireTimestamp) -> TypeResult<Self> {
        value.to_datetime()
    }
}

impl PartialOrd for WireTimestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WireTimestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.seconds.cmp(&other.seconds) {
            Ordering::Equal => self.nanos.cmp(&other.nanos),
            other => other,
        }
    }
}
