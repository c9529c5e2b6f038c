//! Mock clock for testing.

use crate::application::ports::Clock;
use crate::domain::timestamp::WallTime;
use crate::infrastructure::clock::wall_time;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock clock for testing.
///
/// Allows tests to control time progression explicitly, enabling deterministic
/// testing of throttle windows and timestamp abbreviation.
///
/// # Examples
///
/// ```
/// use tagged_throttle::infrastructure::mocks::MockClock;
/// use tagged_throttle::application::ports::Clock;
/// use std::time::Duration;
///
/// let clock = MockClock::at(2024, 1, 27, 23, 59, 59, 500);
/// assert_eq!(clock.now().render_full(), "01/27 23:59:59.500");
///
/// // Advancing past midnight rolls the date over
/// clock.advance(Duration::from_millis(600));
/// assert_eq!(clock.now().render_full(), "01/28 00:00:00.100");
/// assert_eq!(clock.now().ms_of_day(), 100);
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying time value, so advancing time in
/// one clone affects all clones.
#[derive(Debug, Clone)]
pub struct MockClock {
    current_time: Arc<Mutex<NaiveDateTime>>,
}

impl MockClock {
    /// Create a mock clock starting at a specific local date-time.
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            current_time: Arc::new(Mutex::new(start)),
        }
    }

    /// Create a mock clock from calendar fields.
    ///
    /// # Panics
    /// Panics if the fields do not form a valid date-time.
    pub fn at(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        millis: u32,
    ) -> Self {
        let start = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_milli_opt(hour, minute, second, millis))
            .expect("MockClock::at called with an invalid date-time");
        Self::new(start)
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: Duration) {
        let step = chrono::Duration::from_std(duration)
            .expect("MockClock advanced by a duration out of range");
        let mut time = self
            .current_time
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock");
        *time += step;
    }

    /// Set the clock to a specific date-time.
    pub fn set(&self, instant: NaiveDateTime) {
        let mut time = self
            .current_time
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock");
        *time = instant;
    }
}

impl Clock for MockClock {
    fn now(&self) -> WallTime {
        let time = self
            .current_time
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock");
        wall_time(&time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_clock() {
        let clock = MockClock::at(2024, 3, 1, 8, 0, 0, 0);
        assert_eq!(clock.now().render_full(), "03/01 08:00:00.000");

        clock.advance(Duration::from_millis(61_001));
        assert_eq!(clock.now().render_full(), "03/01 08:01:01.001");

        let new_time = NaiveDate::from_ymd_opt(2024, 12, 31)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        clock.set(new_time);
        assert_eq!(clock.now().ms_of_day(), 0);
    }

    #[test]
    fn test_clones_share_time() {
        let clock = MockClock::at(2024, 3, 1, 8, 0, 0, 0);
        let other = clock.clone();
        other.advance(Duration::from_secs(5));
        assert_eq!(clock.now().second, 5);
    }
}
