//! Tracing integration filter.
//!
//! [`AdmissionFilter`] runs every `tracing` event through an
//! [`AdmissionPipeline`], letting the standard `tracing` macros stand in for a
//! logging macro layer:
//!
//! - the event **target** is the tag, so `info!(target: "#net", ...)` focuses
//!   output on that tag and `info!(target: "!noisy", ...)` is never shown;
//! - the callsite **file name and line** identify the call site;
//! - the **rate** is the filter's default or the event's `log_hz` field.
//!
//! Level filtering is left to other filters in the stack. Events emitted by
//! this crate itself (diagnostics and [`TracingSink`] summaries) bypass the
//! pipeline, since they may be raised while it is deciding.
//!
//! [`TracingSink`]: crate::infrastructure::sink::TracingSink

use crate::application::pipeline::{AdmissionPipeline, CallSite};
use crate::infrastructure::visitor::RateVisitor;

use std::sync::Arc;
use tracing::{Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Filter};

/// Target prefix of every event this crate emits.
const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// A per-layer filter applying tag gating and call-site throttling.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tagged_throttle::{AdmissionFilter, AdmissionPipeline};
/// use tracing_subscriber::prelude::*;
///
/// let pipeline = Arc::new(AdmissionPipeline::new());
/// let filter = AdmissionFilter::new(pipeline).with_default_rate(10);
///
/// tracing_subscriber::registry()
///     .with(tracing_subscriber::fmt::layer().with_filter(filter))
///     .init();
///
/// tracing::info!(target: "#motor", "only motor logs from here on");
/// tracing::info!(target: "*alarm", "still printed");
/// tracing::info!(target: "~motor", "back to normal");
/// ```
#[derive(Debug, Clone)]
pub struct AdmissionFilter {
    pipeline: Arc<AdmissionPipeline>,
    default_rate: u8,
}

impl AdmissionFilter {
    /// Create a filter over a shared pipeline; events are unthrottled by default.
    pub fn new(pipeline: Arc<AdmissionPipeline>) -> Self {
        Self {
            pipeline,
            default_rate: 0,
        }
    }

    /// Throttle events without a `log_hz` field to `hz` per second per call site.
    pub fn with_default_rate(mut self, hz: u8) -> Self {
        self.default_rate = hz;
        self
    }

    /// Get a reference to the underlying pipeline.
    pub fn pipeline(&self) -> &Arc<AdmissionPipeline> {
        &self.pipeline
    }

    fn call_site<'a>(meta: &'a Metadata<'a>, rate: u8) -> CallSite<'a> {
        let file = meta.file().map(file_name).unwrap_or_default();
        let line = meta
            .line()
            .map_or(0, |l| u16::try_from(l).unwrap_or(u16::MAX));
        CallSite::new(meta.target(), file, line).with_rate(rate)
    }
}

/// Strip directories from a source path.
fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(OWN_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

impl<S> Filter<S> for AdmissionFilter
where
    S: Subscriber,
{
    fn enabled(&self, _meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        // Decisions are stateful and made per event in event_enabled
        true
    }

    fn event_enabled(&self, event: &tracing::Event<'_>, _cx: &Context<'_, S>) -> bool {
        let meta = event.metadata();
        if is_own_target(meta.target()) {
            return true;
        }

        let mut visitor = RateVisitor::new();
        event.record(&mut visitor);
        let rate = visitor.rate().unwrap_or(self.default_rate);

        self.pipeline
            .check(&Self::call_site(meta, rate))
            .is_emit()
    }
}
