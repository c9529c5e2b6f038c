//! # tagged-throttle
//!
//! Tag-gated, per-call-site log throttling with compact timestamps for the
//! `tracing` ecosystem.
//!
//! Every log call passes through an [`AdmissionPipeline`] of three stages:
//!
//! 1. the **tag gate** reads a control sigil on the call's tag and decides
//!    whether the call is shown at all;
//! 2. the **throttle ledger** limits each call site (file + line) to a number
//!    of messages per second, and writes a summary line for what it dropped;
//! 3. the **clock source** renders a timestamp that is abbreviated to seconds
//!    while the minute has not changed.
//!
//! The pipeline never fails a call: invalid arguments are logged and the call
//! is admitted.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tagged_throttle::{AdmissionFilter, AdmissionPipeline};
//! use tracing_subscriber::prelude::*;
//!
//! let pipeline = Arc::new(AdmissionPipeline::new());
//!
//! // Throttle every call site to 5 messages per second unless it says otherwise
//! let filter = AdmissionFilter::new(pipeline).with_default_rate(5);
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer().with_filter(filter))
//!     .init();
//!
//! tracing::info!(target: "MOTOR", "speed {}", 1200);
//! tracing::info!(target: "SENSOR", log_hz = 1, "sampled once a second at most");
//! ```
//!
//! The pipeline can also be driven directly, without `tracing`:
//!
//! ```rust
//! use tagged_throttle::{AdmissionPipeline, CallSite, Verdict};
//!
//! let pipeline = AdmissionPipeline::new();
//!
//! match pipeline.check(&CallSite::new("*BOOT", "main.rs", 12)) {
//!     Verdict::Emit { tag, timestamp, privileged } => {
//!         assert_eq!(tag, "BOOT");
//!         assert!(privileged);
//!         assert!(timestamp.is_full());
//!     }
//!     Verdict::Suppressed(reason) => unreachable!("{reason:?}"),
//! }
//! ```
//!
//! ## Tag Sigils
//!
//! The first character of a tag may control the gate:
//!
//! | Sigil | Display tag      | Call is          | Restricted mode |
//! |-------|------------------|------------------|-----------------|
//! | `!`   | unchanged        | suppressed       | unchanged       |
//! | `#`   | sigil stripped   | shown            | entered         |
//! | `~`   | sigil stripped   | shown            | left            |
//! | `*`   | sigil stripped   | shown            | unchanged       |
//! | none  | unchanged        | shown unless restricted | unchanged |
//!
//! `#` focuses output on one tag: once restricted, calls without a sigil are
//! dropped until a `~` call leaves the mode.
//!
//! ```rust
//! use tagged_throttle::AdmissionPipeline;
//!
//! let pipeline = AdmissionPipeline::new();
//! assert!(!pipeline.gatekeep("#NET").suppress);
//! assert!(pipeline.gatekeep("DISK").suppress);
//! assert!(!pipeline.gatekeep("*ALARM").suppress);
//! assert!(!pipeline.gatekeep("~NET").suppress);
//! assert!(!pipeline.gatekeep("DISK").suppress);
//! ```
//!
//! ## Throttling
//!
//! Call sites are identified by [`hash`] of `"file:line"` and tracked in a
//! fixed number of ledger slots (10 by default). When the ledger is full the
//! oldest slot is overwritten, so size it to the number of throttled call
//! sites expected to fire within one second.
//!
//! Two modes are available through [`ThrottleMode`]:
//!
//! - **Count** (default): at most `N` calls per 1000 ms window.
//! - **Interval**: calls closer than `1000 / N` ms to the window start are dropped.
//!
//! When a window that dropped calls closes, one summary line is written to the
//! pipeline's [`Sink`] (stderr by default):
//!
//! ```text
//! W>09/16 11:17:34.000 {LOG} <motor.rs: 88> (-1000ms) discard times: 2
//! ```
//!
//! ## Timestamps
//!
//! The first line of each minute carries a full `MM/DD HH:MM:SS.mmm` stamp;
//! later lines in the same minute carry `SS.mmm` only. [`LogLine`] renders the
//! complete line convention `L>timestamp {TAG} <func:line> message\r\n`.
//!
//! ## Observability
//!
//! ```rust
//! # use tagged_throttle::AdmissionPipeline;
//! let pipeline = AdmissionPipeline::new();
//! let snapshot = pipeline.metrics().snapshot();
//! println!("Calls allowed: {}", snapshot.calls_allowed);
//! println!("Suppression rate: {:.2}%", snapshot.suppression_rate() * 100.0);
//! ```
//!
//! ## Concurrency
//!
//! Gate, ledger and clock state sit behind one mutex inside the pipeline, so an
//! `Arc<AdmissionPipeline>` can be shared by every thread of a process.
//! Summary lines are written after the lock is released.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use domain::{
    fingerprint::{hash, ArgumentError, CallSiteFingerprint},
    line::LogLine,
    location::SourceLocation,
    policy::{PolicyDecision, ThrottleMode},
    summary::DroppedSummary,
    tag::{parse_tag, TagControl},
    timestamp::{Timestamp, WallTime, DAY_MS},
};

pub use application::{
    clock_source::ClockSource,
    ledger::{Admission, ThrottleLedger, ThrottleRecord},
    metrics::{Metrics, MetricsSnapshot},
    pipeline::{
        AdmissionPipeline, AdmissionPipelineBuilder, BuildError, CallSite, SuppressReason, Verdict,
    },
    ports::{Clock, Sink},
    tag_gate::{GateVerdict, TagGate},
};

pub use infrastructure::{
    clock::SystemClock,
    filter::AdmissionFilter,
    sink::{TracingSink, WriterSink, SUMMARY_TARGET},
};
