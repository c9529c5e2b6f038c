//! Clock source: timestamps that shrink for consecutive same-minute lines.
//!
//! The first display render in a new minute is the full `MM/DD HH:MM:SS.mmm`
//! form; later display renders in that minute are `SS.mmm`. Readings that
//! also need the millisecond-of-day value (the throttle ledger's) are always
//! rendered in full and never consume the pending full render.

use crate::application::ports::Clock;
use crate::domain::timestamp::{Timestamp, WallTime};
use std::sync::Arc;

/// Stateful renderer over a [`Clock`].
#[derive(Debug, Clone)]
pub struct ClockSource {
    clock: Arc<dyn Clock>,
    last_reading: Option<WallTime>,
    full_pending: bool,
}

impl ClockSource {
    /// Create a clock source; its first display render is full.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last_reading: None,
            full_pending: true,
        }
    }

    /// Read the clock and render it.
    ///
    /// With `want_ms_of_day` the full form is always produced. Without it the
    /// full form is produced only when the minute changed since the previous
    /// reading (or no display render happened yet since then).
    pub fn now(&mut self, want_ms_of_day: bool) -> Timestamp {
        let time = self.clock.now();

        if !self.last_reading.is_some_and(|last| last.same_minute(&time)) {
            self.full_pending = true;
        }
        self.last_reading = Some(time);

        let full = self.full_pending || want_ms_of_day;
        if full && !want_ms_of_day {
            self.full_pending = false;
        }

        Timestamp {
            text: if full {
                time.render_full()
            } else {
                time.render_short()
            },
            ms_of_day: time.ms_of_day(),
        }
    }

    /// Force the next display render to be full.
    pub fn force_full(&mut self) {
        self.full_pending = true;
    }
}
