//! Entry timestamps.
//!
//! The entry table stores the last-write time as a Windows FILETIME: a
//! 64-bit count of 100-nanosecond intervals since January 1, 1601 (UTC).
//!
//! # Example
//!
//! ```rust
//! use gdarc::Timestamp;
//! use std::time::SystemTime;
//!
//! let ts = Timestamp::from_filetime(116444736000000000);
//! assert_eq!(ts.as_unix_secs(), 0);
//! assert_eq!(ts.as_system_time(), SystemTime::UNIX_EPOCH);
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Difference between the FILETIME and Unix epochs in 100ns intervals.
const FILETIME_UNIX_DIFF: u64 = 116444736000000000;

/// Number of 100-nanosecond intervals per second.
const INTERVALS_PER_SECOND: u64 = 10_000_000;

/// A FILETIME timestamp from an entry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    filetime: u64,
}

impl Timestamp {
    /// Creates a timestamp from a raw FILETIME value.
    #[inline]
    pub const fn from_filetime(filetime: u64) -> Self {
        Self { filetime }
    }

    /// Returns the current time.
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    /// Converts a `SystemTime`, clamping to the FILETIME range.
    pub fn from_system_time(time: SystemTime) -> Self {
        let filetime = match time.duration_since(UNIX_EPOCH) {
            Ok(d) => FILETIME_UNIX_DIFF.saturating_add(intervals(d)),
            Err(e) => FILETIME_UNIX_DIFF.saturating_sub(intervals(e.duration())),
        };
        Self { filetime }
    }

    /// Returns the raw FILETIME value.
    #[inline]
    pub const fn as_filetime(&self) -> u64 {
        self.filetime
    }

    /// Returns the timestamp as a `SystemTime`.
    pub fn as_system_time(&self) -> SystemTime {
        if self.filetime >= FILETIME_UNIX_DIFF {
            UNIX_EPOCH + from_intervals(self.filetime - FILETIME_UNIX_DIFF)
        } else {
            UNIX_EPOCH - from_intervals(FILETIME_UNIX_DIFF - self.filetime)
        }
    }

    /// Returns whole Unix seconds, rounding towards negative infinity.
    pub fn as_unix_secs(&self) -> i64 {
        if self.filetime >= FILETIME_UNIX_DIFF {
            ((self.filetime - FILETIME_UNIX_DIFF) / INTERVALS_PER_SECOND) as i64
        } else {
            let before = FILETIME_UNIX_DIFF - self.filetime;
            -(before.div_ceil(INTERVALS_PER_SECOND) as i64)
        }
    }
}

fn intervals(d: Duration) -> u64 {
    d.as_secs()
        .saturating_mul(INTERVALS_PER_SECOND)
        .saturating_add(u64::from(d.subsec_nanos() / 100))
}

fn from_intervals(n: u64) -> Duration {
    Duration::new(
        n / INTERVALS_PER_SECOND,
        ((n % INTERVALS_PER_SECOND) * 100) as u32,
    )
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        Self::from_system_time(time)
    }
}
