//! Admission pipeline: tag gate, then throttle ledger, then clock source.
//!
//! Every log call passes through [`AdmissionPipeline::check`], which returns
//! either a display tag and timestamp to emit with, or the reason the call was
//! dropped. All mutable state lives behind one mutex, so the pipeline can be
//! shared between threads without changing any decision.

use crate::application::clock_source::ClockSource;
use crate::application::ledger::{Admission, ThrottleLedger, DEFAULT_CAPACITY};
use crate::application::metrics::Metrics;
use crate::application::ports::{Clock, Sink};
use crate::application::tag_gate::{GateVerdict, TagGate};
use crate::domain::policy::ThrottleMode;
use crate::domain::summary::DroppedSummary;
use crate::domain::tag::TagControl;
use crate::domain::timestamp::Timestamp;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::sink::WriterSink;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Tag printed on throttling summary lines unless configured otherwise.
pub const DEFAULT_SUMMARY_TAG: &str = "LOG";

/// Error returned when building an `AdmissionPipeline` fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Ledger capacity must be greater than zero
    ZeroCapacity,
    /// Summary tag must not be empty
    EmptySummaryTag,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::ZeroCapacity => write!(f, "ledger capacity must be greater than 0"),
            BuildError::EmptySummaryTag => write!(f, "summary tag must not be empty"),
        }
    }
}

impl std::error::Error for BuildError {}

/// Inputs of one log call that the pipeline decides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    /// Tag, possibly carrying a control sigil
    pub tag: &'a str,
    /// Source file name
    pub file: &'a str,
    /// Source line
    pub line: u16,
    /// Maximum messages per second for this site; 0 disables throttling
    pub max_per_second: u8,
}

impl<'a> CallSite<'a> {
    /// Describe an unthrottled call.
    pub fn new(tag: &'a str, file: &'a str, line: u16) -> Self {
        Self {
            tag,
            file,
            line,
            max_per_second: 0,
        }
    }

    /// Limit the call site to `max_per_second` messages per second.
    pub fn with_rate(mut self, max_per_second: u8) -> Self {
        self.max_per_second = max_per_second;
        self
    }
}

/// Why a call was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// The tag carried the `!` sigil
    Excluded,
    /// Restricted mode is active and the tag was not privileged
    Restricted,
    /// The call site exceeded its rate
    Throttled,
}

/// Decision for one log call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<'a> {
    /// Print the call
    Emit {
        /// Display tag with the sigil stripped
        tag: &'a str,
        /// Rendered timestamp for the line
        timestamp: Timestamp,
        /// Whether the call also bypasses level filtering
        privileged: bool,
    },
    /// Drop the call
    Suppressed(SuppressReason),
}

impl Verdict<'_> {
    /// Check if the call is printed.
    pub fn is_emit(&self) -> bool {
        matches!(self, Verdict::Emit { .. })
    }

    /// Check if the call is dropped.
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Verdict::Suppressed(_))
    }
}

#[derive(Debug)]
struct PipelineState {
    gate: TagGate,
    ledger: ThrottleLedger,
    clock: ClockSource,
}

/// Builder for constructing an `AdmissionPipeline`.
#[derive(Debug)]
pub struct AdmissionPipelineBuilder {
    capacity: usize,
    mode: ThrottleMode,
    clock: Option<Arc<dyn Clock>>,
    sink: Option<Arc<dyn Sink>>,
    summary_tag: String,
}

impl AdmissionPipelineBuilder {
    /// Set the number of throttle ledger slots.
    ///
    /// Size it to the number of distinct throttled call sites expected to fire
    /// within one second. Default: 10
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set how throttled sites are limited. Default: `ThrottleMode::Count`
    pub fn with_mode(mut self, mode: ThrottleMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set a custom clock (mainly for testing).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the sink that receives throttling summary lines. Default: stderr
    pub fn with_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the tag printed on summary lines. Default: `LOG`
    pub fn with_summary_tag(mut self, tag: impl Into<String>) -> Self {
        self.summary_tag = tag.into();
        self
    }

    /// Build the pipeline.
    ///
    /// # Errors
    /// Returns `BuildError` if the configuration is invalid.
    pub fn build(self) -> Result<AdmissionPipeline, BuildError> {
        if self.capacity == 0 {
            return Err(BuildError::ZeroCapacity);
        }
        if self.summary_tag.is_empty() {
            return Err(BuildError::EmptySummaryTag);
        }

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        let sink = self.sink.unwrap_or_else(|| Arc::new(WriterSink::stderr()));

        Ok(AdmissionPipeline {
            state: Mutex::new(PipelineState {
                gate: TagGate::new(),
                ledger: ThrottleLedger::new(self.capacity, self.mode),
                clock: ClockSource::new(clock),
            }),
            sink,
            metrics: Metrics::new(),
            summary_tag: self.summary_tag,
        })
    }
}

/// The admission pipeline shared by every log call of a process.
#[derive(Debug)]
pub struct AdmissionPipeline {
    state: Mutex<PipelineState>,
    sink: Arc<dyn Sink>,
    metrics: Metrics,
    summary_tag: String,
}

impl AdmissionPipeline {
    /// Create a builder for configuring the pipeline.
    ///
    /// Defaults:
    /// - Capacity: 10 ledger slots
    /// - Mode: count-based throttling
    /// - Clock: system local time
    /// - Sink: stderr
    /// - Summary tag: `LOG`
    pub fn builder() -> AdmissionPipelineBuilder {
        AdmissionPipelineBuilder {
            capacity: DEFAULT_CAPACITY,
            mode: ThrottleMode::default(),
            clock: None,
            sink: None,
            summary_tag: DEFAULT_SUMMARY_TAG.to_string(),
        }
    }

    /// Create a pipeline with default settings.
    pub fn new() -> Self {
        Self::builder()
            .build()
            .expect("default configuration is always valid")
    }

    fn lock(&self) -> MutexGuard<'_, PipelineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one log call through the gate, the throttle and the clock.
    ///
    /// Summary lines for closed throttle windows are written to the sink
    /// before returning, whatever the verdict.
    pub fn check<'a>(&self, call: &CallSite<'a>) -> Verdict<'a> {
        let mut pending = None;
        let verdict = {
            let mut state = self.lock();
            Self::decide(&mut state, call, &self.metrics, &mut pending)
        };
        if let Some((summary, stamp)) = pending {
            self.write_summary(&summary, &stamp);
        }
        verdict
    }

    fn decide<'a>(
        state: &mut PipelineState,
        call: &CallSite<'a>,
        metrics: &Metrics,
        pending: &mut Option<(DroppedSummary, Timestamp)>,
    ) -> Verdict<'a> {
        let gate = Self::gate(&mut state.gate, call.tag);
        if gate.suppress {
            metrics.record_gated();
            return Verdict::Suppressed(match gate.control {
                TagControl::Exclude => SuppressReason::Excluded,
                _ => SuppressReason::Restricted,
            });
        }

        if call.max_per_second > 0 {
            let stamp = state.clock.now(true);
            let admission = Self::throttle(&mut state.ledger, call, stamp.ms_of_day, metrics);
            if let Some(summary) = admission.summary {
                *pending = Some((summary, stamp));
            }
            if admission.is_suppress() {
                metrics.record_throttled();
                return Verdict::Suppressed(SuppressReason::Throttled);
            }
        }

        metrics.record_allowed();
        Verdict::Emit {
            tag: gate.display,
            timestamp: state.clock.now(false),
            privileged: gate.is_privileged(),
        }
    }

    fn gate<'a>(gate: &mut TagGate, tag: &'a str) -> GateVerdict<'a> {
        let was_restricted = gate.is_restricted();
        match gate.gatekeep(tag) {
            Ok(verdict) => {
                if gate.is_restricted() != was_restricted {
                    tracing::debug!(
                        tag = verdict.display,
                        restricted = gate.is_restricted(),
                        "tag gate mode changed"
                    );
                }
                verdict
            }
            Err(e) => {
                tracing::warn!(error = %e, "invalid tag, call admitted");
                GateVerdict {
                    display: tag,
                    control: TagControl::Normal,
                    suppress: false,
                }
            }
        }
    }

    fn throttle(
        ledger: &mut ThrottleLedger,
        call: &CallSite<'_>,
        now_ms: u32,
        metrics: &Metrics,
    ) -> Admission {
        match ledger.admit(call.file, call.line, call.max_per_second, now_ms) {
            Ok(admission) => {
                if let Some(evicted) = admission.evicted {
                    metrics.record_eviction();
                    tracing::debug!(
                        location = %evicted.location,
                        line = evicted.line,
                        hits = evicted.hits,
                        "throttle record evicted"
                    );
                }
                admission
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    line = call.line,
                    "invalid call site, throttling skipped"
                );
                Admission::allow()
            }
        }
    }

    fn write_summary(&self, summary: &DroppedSummary, stamp: &Timestamp) {
        let line = summary.render_line(&stamp.text, &self.summary_tag);
        match self.sink.write(line.as_bytes()) {
            Ok(()) => self.metrics.record_summary(),
            Err(e) => tracing::warn!(error = %e, "failed to write throttling summary"),
        }
    }

    /// Throttle stage only: `true` means the call is dropped.
    ///
    /// Invalid arguments never drop a call.
    pub fn admit(&self, file: &str, line: u16, max_per_second: u8) -> bool {
        let call = CallSite::new("", file, line).with_rate(max_per_second);
        let (admission, stamp) = {
            let mut state = self.lock();
            let stamp = state.clock.now(true);
            let admission =
                Self::throttle(&mut state.ledger, &call, stamp.ms_of_day, &self.metrics);
            (admission, stamp)
        };
        if let Some(summary) = admission.summary {
            self.write_summary(&summary, &stamp);
        }
        admission.is_suppress()
    }

    /// Tag gate stage only.
    pub fn gatekeep<'a>(&self, tag: &'a str) -> GateVerdict<'a> {
        let mut state = self.lock();
        Self::gate(&mut state.gate, tag)
    }

    /// Clock stage only.
    pub fn now(&self, want_ms_of_day: bool) -> Timestamp {
        self.lock().clock.now(want_ms_of_day)
    }

    /// Whether restricted mode is active.
    pub fn is_restricted(&self) -> bool {
        self.lock().gate.is_restricted()
    }

    /// Number of live throttle records.
    pub fn tracked_sites(&self) -> usize {
        self.lock().ledger.len()
    }

    /// Get a reference to the metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Forget all throttle records and leave restricted mode.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.ledger.clear();
        state.gate.reset();
        state.clock.force_full();
    }
}

impl Default for AdmissionPipeline {
    fn default() -> Self {
        Self::new()
    }
}
