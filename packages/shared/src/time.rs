//! Time utilities with a clock abstraction so timestamps can be pinned in
//! tests.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in JST (milliseconds)
    fn now_jst_millis(&self) -> i64;
}

/// System clock (actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_jst_millis(&self) -> i64 {
        get_jst_timestamp()
    }
}

/// Fixed clock for tests, always returns the timestamp it was built with
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_jst_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Current Unix timestamp in JST (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    let jst_offset = FixedOffset::east_opt(9 * 3600).unwrap(); // JST is UTC+9
    let now_utc = Utc::now();
    let now_jst: DateTime<FixedOffset> = now_utc.with_timezone(&jst_offset);
    now_jst.timestamp_millis()
}

/// Convert a Unix timestamp (milliseconds) to JST RFC 3339 format
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    let jst_offset = FixedOffset::east_opt(9 * 3600).unwrap(); // JST is UTC+9
    let seconds = timestamp_millis / 1000;
    let nanos = ((timestamp_millis % 1000) * 1_000_000) as u32;
    let dt = jst_offset.timestamp_opt(seconds, nanos).unwrap();
    dt.to_rfc3339()
}
