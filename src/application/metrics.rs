//! Observability metrics for the admission pipeline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters describing admission decisions.
///
/// All metrics use atomic operations for thread-safe updates and reads.
/// Cloning yields another handle to the same counters.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Calls admitted for emission
    calls_allowed: AtomicU64,
    /// Calls dropped by the throttle ledger
    calls_throttled: AtomicU64,
    /// Calls dropped by the tag gate
    calls_gated: AtomicU64,
    /// Ledger records overwritten while still live
    records_evicted: AtomicU64,
    /// Dropped-call summaries written to the sink
    summaries_emitted: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                calls_allowed: AtomicU64::new(0),
                calls_throttled: AtomicU64::new(0),
                calls_gated: AtomicU64::new(0),
                records_evicted: AtomicU64::new(0),
                summaries_emitted: AtomicU64::new(0),
            }),
        }
    }

    pub(crate) fn record_allowed(&self) {
        self.inner.calls_allowed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_throttled(&self) {
        self.inner.calls_throttled.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_gated(&self) {
        self.inner.calls_gated.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.inner.records_evicted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_summary(&self) {
        self.inner.summaries_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the number of calls admitted.
    pub fn calls_allowed(&self) -> u64 {
        self.inner.calls_allowed.load(Ordering::Relaxed)
    }

    /// Get the number of calls dropped by throttling.
    pub fn calls_throttled(&self) -> u64 {
        self.inner.calls_throttled.load(Ordering::Relaxed)
    }

    /// Get the number of calls dropped by the tag gate.
    pub fn calls_gated(&self) -> u64 {
        self.inner.calls_gated.load(Ordering::Relaxed)
    }

    /// Get the number of live records evicted from the ledger.
    pub fn records_evicted(&self) -> u64 {
        self.inner.records_evicted.load(Ordering::Relaxed)
    }

    /// Get the number of summary lines written.
    pub fn summaries_emitted(&self) -> u64 {
        self.inner.summaries_emitted.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            calls_allowed: self.calls_allowed(),
            calls_throttled: self.calls_throttled(),
            calls_gated: self.calls_gated(),
            records_evicted: self.records_evicted(),
            summaries_emitted: self.summaries_emitted(),
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.inner.calls_allowed.store(0, Ordering::Relaxed);
        self.inner.calls_throttled.store(0, Ordering::Relaxed);
        self.inner.calls_gated.store(0, Ordering::Relaxed);
        self.inner.records_evicted.store(0, Ordering::Relaxed);
        self.inner.summaries_emitted.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Calls admitted for emission
    pub calls_allowed: u64,
    /// Calls dropped by the throttle ledger
    pub calls_throttled: u64,
    /// Calls dropped by the tag gate
    pub calls_gated: u64,
    /// Ledger records overwritten while still live
    pub records_evicted: u64,
    /// Dropped-call summaries written to the sink
    pub summaries_emitted: u64,
}

impl MetricsSnapshot {
    /// Total number of calls seen.
    pub fn total_calls(&self) -> u64 {
        self.calls_allowed
            .saturating_add(self.calls_throttled)
            .saturating_add(self.calls_gated)
    }

    /// Fraction of calls dropped for any reason (0.0 to 1.0).
    ///
    /// Returns 0.0 if no calls have been processed.
    pub fn suppression_rate(&self) -> f64 {
        let total = self.total_calls();
        if total == 0 {
            0.0
        } else {
            (self.calls_throttled + self.calls_gated) as f64 / total as f64
        }
    }
}
