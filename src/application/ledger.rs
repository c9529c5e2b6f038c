//! Throttle ledger: per-call-site rate limiting in fixed memory.
//!
//! The ledger is a circular array of slots, each holding at most one
//! [`ThrottleRecord`]. Every call is fingerprinted by `file:line` and goes
//! through two sweeps:
//!
//! 1. **Window sweep** - starting at the cursor, every record for the incoming
//!    fingerprint whose window has closed is cleared. If calls were
//!    dropped during that window a [`DroppedSummary`] is produced.
//! 2. **Decision sweep** - a live record for the fingerprint inside its window
//!    registers a hit and may suppress the call. Without a live record a new one
//!    is written at the cursor, evicting whatever occupied that slot.
//!
//! Windows are not refreshed on hits; a record lives until a later call for
//! the same site finds its window closed.

use crate::domain::fingerprint::{ArgumentError, CallSiteFingerprint};
use crate::domain::location::SourceLocation;
use crate::domain::policy::{PolicyDecision, ThrottleMode};
use crate::domain::summary::DroppedSummary;
use crate::domain::timestamp::elapsed_ms;

/// Default number of ledger slots.
pub const DEFAULT_CAPACITY: usize = 10;

/// Throttle state for one call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleRecord {
    /// Fingerprint of `file:line`
    pub fingerprint: CallSiteFingerprint,
    /// Millisecond-of-day at which the current window opened
    pub window_start_ms: u32,
    /// Source file (truncated for display)
    pub location: SourceLocation,
    /// Source line
    pub line: u16,
    /// Calls counted in the current window (see [`ThrottleMode::initial_hits`])
    pub hits: u16,
}

/// Outcome of a single [`ThrottleLedger::admit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Whether the call is emitted or dropped
    pub decision: PolicyDecision,
    /// Summary of the site's previous window, if it dropped calls
    pub summary: Option<DroppedSummary>,
    /// Live record displaced to make room for this call site
    pub evicted: Option<ThrottleRecord>,
}

impl Admission {
    pub(crate) fn allow() -> Self {
        Self {
            decision: PolicyDecision::Allow,
            summary: None,
            evicted: None,
        }
    }

    /// Whether the call should be dropped.
    pub fn is_suppress(&self) -> bool {
        self.decision.is_suppress()
    }
}

/// Fixed-capacity ledger of recently seen call sites.
#[derive(Debug, Clone)]
pub struct ThrottleLedger {
    slots: Box<[Option<ThrottleRecord>]>,
    /// Next slot to write; also the oldest written slot once the ledger wrapped
    cursor: usize,
    mode: ThrottleMode,
}

impl ThrottleLedger {
    /// Create a ledger with `capacity` slots (at least one).
    pub fn new(capacity: usize, mode: ThrottleMode) -> Self {
        Self {
            slots: vec![None; capacity.max(1)].into_boxed_slice(),
            cursor: 0,
            mode,
        }
    }

    /// Decide whether a call at `file:line` is throttled.
    ///
    /// `max_per_second == 0` disables throttling for the call; it is allowed
    /// without touching the ledger. `now_ms` is the millisecond-of-day of the
    /// call.
    ///
    /// # Errors
    /// Returns `ArgumentError::EmptyFileName` if `file` is empty. Callers
    /// should treat this as "do not suppress".
    pub fn admit(
        &mut self,
        file: &str,
        line: u16,
        max_per_second: u8,
        now_ms: u32,
    ) -> Result<Admission, ArgumentError> {
        if max_per_second == 0 {
            return Ok(Admission::allow());
        }

        let fingerprint = CallSiteFingerprint::of(file, line)?;
        let window = self.mode.window_ms(max_per_second);
        let summary = self.close_expired(fingerprint, window, max_per_second, now_ms);

        for record in self.slots.iter_mut().flatten() {
            if record.fingerprint != fingerprint {
                continue;
            }
            let decision = if elapsed_ms(record.window_start_ms, now_ms) < window {
                let (hits, decision) = self.mode.register_hit(record.hits, max_per_second);
                record.hits = hits;
                decision
            } else {
                PolicyDecision::Allow
            };
            return Ok(Admission {
                decision,
                summary,
                evicted: None,
            });
        }

        let evicted = self.open(fingerprint, file, line, now_ms);
        Ok(Admission {
            decision: PolicyDecision::Allow,
            summary,
            evicted,
        })
    }

    /// Clear closed windows for `fingerprint`, summarising dropped calls.
    fn close_expired(
        &mut self,
        fingerprint: CallSiteFingerprint,
        window: u32,
        max_per_second: u8,
        now_ms: u32,
    ) -> Option<DroppedSummary> {
        let capacity = self.slots.len();
        let mut summary = None;

        for offset in 0..capacity {
            let idx = (self.cursor + offset) % capacity;
            let Some(record) = self.slots[idx] else {
                continue;
            };
            if record.fingerprint != fingerprint {
                continue;
            }

            let elapsed = elapsed_ms(record.window_start_ms, now_ms);
            if elapsed < window {
                continue;
            }

            let dropped = self.mode.dropped(record.hits, max_per_second);
            if dropped > 0 {
                summary = Some(DroppedSummary {
                    location: record.location,
                    line: record.line,
                    elapsed_ms: elapsed,
                    dropped,
                });
            }
            self.slots[idx] = None;
        }

        summary
    }

    /// Write a fresh record at the cursor and advance it.
    fn open(
        &mut self,
        fingerprint: CallSiteFingerprint,
        file: &str,
        line: u16,
        now_ms: u32,
    ) -> Option<ThrottleRecord> {
        let idx = self.cursor;
        self.cursor = (idx + 1) % self.slots.len();
        self.slots[idx].replace(ThrottleRecord {
            fingerprint,
            window_start_ms: now_ms,
            location: SourceLocation::new(file),
            line,
            hits: self.mode.initial_hits(),
        })
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Check if no records are live.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// The configured throttle mode.
    pub fn mode(&self) -> ThrottleMode {
        self.mode
    }

    /// Iterate over live records in slot order.
    pub fn records(&self) -> impl Iterator<Item = &ThrottleRecord> {
        self.slots.iter().flatten()
    }

    /// Find the live record for a call site, if any.
    pub fn record_for(&self, file: &str, line: u16) -> Option<&ThrottleRecord> {
        let fingerprint = CallSiteFingerprint::of(file, line).ok()?;
        self.records().find(|r| r.fingerprint == fingerprint)
    }

    /// Drop every record and rewind the cursor.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.cursor = 0;
    }
}

impl Default for ThrottleLedger {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, ThrottleMode::default())
    }
}
