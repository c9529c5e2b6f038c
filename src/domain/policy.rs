//! Throttling policies for call sites.
//!
//! A call site configured with a maximum rate of `hz` messages per second is
//! throttled in one of two ways:
//!
//! - [`ThrottleMode::Count`]: at most `hz` calls are admitted per one-second
//!   window that starts at the site's first admitted call.
//! - [`ThrottleMode::Interval`]: after a window opens, further calls are dropped
//!   until `1000 / hz` milliseconds have passed.

/// One second, the count-mode window length.
pub const WINDOW_MS: u32 = 1_000;

/// Decision made for a single log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    /// Emit the call
    Allow,
    /// Drop the call
    Suppress,
}

impl PolicyDecision {
    /// Check if this decision is Allow.
    pub fn is_allow(&self) -> bool {
        matches!(self, PolicyDecision::Allow)
    }

    /// Check if this decision is Suppress.
    pub fn is_suppress(&self) -> bool {
        matches!(self, PolicyDecision::Suppress)
    }
}

/// How a throttled call site's budget is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThrottleMode {
    /// Limit the number of calls per second
    #[default]
    Count,
    /// Limit the spacing between calls
    Interval,
}

impl ThrottleMode {
    /// Length of a site's window in milliseconds for the given rate.
    ///
    /// `max_per_second` must be non-zero.
    pub fn window_ms(&self, max_per_second: u8) -> u32 {
        match self {
            ThrottleMode::Count => WINDOW_MS,
            ThrottleMode::Interval => WINDOW_MS / u32::from(max_per_second.max(1)),
        }
    }

    /// Hit count stored in a freshly opened window.
    ///
    /// Count mode counts every call including the first; interval mode counts
    /// only dropped calls.
    pub fn initial_hits(&self) -> u16 {
        match self {
            ThrottleMode::Count => 1,
            ThrottleMode::Interval => 0,
        }
    }

    /// Register another call inside an open window.
    ///
    /// Returns the updated hit count and the decision for the call.
    pub fn register_hit(&self, hits: u16, max_per_second: u8) -> (u16, PolicyDecision) {
        let hits = hits.saturating_add(1);
        let decision = match self {
            ThrottleMode::Count if hits <= u16::from(max_per_second) => PolicyDecision::Allow,
            ThrottleMode::Count | ThrottleMode::Interval => PolicyDecision::Suppress,
        };
        (hits, decision)
    }

    /// Number of calls dropped during a closed window with `hits` recorded.
    pub fn dropped(&self, hits: u16, max_per_second: u8) -> u16 {
        match self {
            ThrottleMode::Count => hits.saturating_sub(u16::from(max_per_second)),
            ThrottleMode::Interval => hits,
        }
    }
}
