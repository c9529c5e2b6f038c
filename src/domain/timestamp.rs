//! Wall-clock readings and their rendered forms.
//!
//! Log lines carry either a full timestamp `MM/DD HH:MM:SS.mmm` or, for
//! consecutive lines within the same minute, an abbreviated `SS.mmm`.
//! Throttle windows are measured in milliseconds since local midnight, which
//! wrap at [`DAY_MS`].

use std::fmt;

/// Milliseconds in one day; millisecond-of-day values are always below this.
pub const DAY_MS: u32 = 86_400_000;

/// A broken-down local time with millisecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallTime {
    /// Month of year, 1-12
    pub month: u8,
    /// Day of month, 1-31
    pub day: u8,
    /// Hour, 0-23
    pub hour: u8,
    /// Minute, 0-59
    pub minute: u8,
    /// Second, 0-59 (60 on a leap second)
    pub second: u8,
    /// Millisecond, 0-999
    pub millis: u16,
}

impl WallTime {
    /// Milliseconds elapsed since midnight.
    pub fn ms_of_day(&self) -> u32 {
        let secs =
            u32::from(self.hour) * 3_600 + u32::from(self.minute) * 60 + u32::from(self.second);
        (secs * 1_000 + u32::from(self.millis)) % DAY_MS
    }

    /// Whether both readings fall in the same calendar minute.
    pub fn same_minute(&self, other: &WallTime) -> bool {
        (self.month, self.day, self.hour, self.minute)
            == (other.month, other.day, other.hour, other.minute)
    }

    /// Render as `MM/DD HH:MM:SS.mmm`.
    pub fn render_full(&self) -> String {
        format!(
            "{:02}/{:02} {:02}:{:02}:{:02}.{:03}",
            self.month, self.day, self.hour, self.minute, self.second, self.millis
        )
    }

    /// Render as `SS.mmm`.
    pub fn render_short(&self) -> String {
        format!("{:02}.{:03}", self.second, self.millis)
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_full())
    }
}

/// Milliseconds from `start` to `now`, both millisecond-of-day values.
///
/// A `now` smaller than `start` is taken to be on the following day.
pub fn elapsed_ms(start: u32, now: u32) -> u32 {
    let start = start % DAY_MS;
    let now = now % DAY_MS;
    if now >= start {
        now - start
    } else {
        DAY_MS - start + now
    }
}

/// A rendered timestamp together with the reading it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    /// Display text, full or abbreviated
    pub text: String,
    /// Milliseconds since midnight of the reading
    pub ms_of_day: u32,
}

impl Timestamp {
    /// Whether the text is the full `MM/DD HH:MM:SS.mmm` form.
    pub fn is_full(&self) -> bool {
        self.text.len() > 6
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
