//! Clock adapters for time operations.
//!
//! Provides SystemClock implementation for production use.
//!
//! # Testing
//!
//! See `MockClock` (in `crate::infrastructure::mocks`) for a controllable test clock.
//! Available with the `test-helpers` feature or in test builds:
//!
//! ```toml
//! [dev-dependencies]
//! tagged-throttle = { version = "*", features = ["test-helpers"] }
//! ```

use crate::application::ports::Clock;
use crate::domain::timestamp::WallTime;
use chrono::{Datelike, Local, NaiveDateTime, Timelike};

/// System clock reading local time through `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> WallTime {
        wall_time(&Local::now().naive_local())
    }
}

/// Break a naive local date-time into a [`WallTime`].
///
/// Leap-second nanoseconds are clamped to the last millisecond of the second.
pub(crate) fn wall_time(dt: &NaiveDateTime) -> WallTime {
    WallTime {
        month: dt.month() as u8,
        day: dt.day() as u8,
        hour: dt.hour() as u8,
        minute: dt.minute() as u8,
        second: dt.second() as u8,
        millis: (dt.nanosecond() / 1_000_000).min(999) as u16,
    }
}
