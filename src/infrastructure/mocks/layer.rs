//! Capturing layer for checking what an `AdmissionFilter` lets through.

use crate::infrastructure::sink::SUMMARY_TARGET;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::field::{Field, Visit};
use tracing::Level;
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// Layer recording every event it receives, tag (target) included.
///
/// Put it behind an [`AdmissionFilter`](crate::AdmissionFilter) to see which
/// calls survived gating and throttling. Clones share the same record.
///
/// # Examples
///
/// ```
/// use tagged_throttle::infrastructure::mocks::MockCaptureLayer;
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let capture = MockCaptureLayer::new();
/// let subscriber = tracing_subscriber::registry().with(capture.clone());
///
/// tracing::subscriber::with_default(subscriber, || {
///     tracing::info!(target: "MOTOR", "spin up");
///     tracing::warn!(target: "MOTOR", "stall");
///     tracing::info!(target: "NET", "link up");
/// });
///
/// assert_eq!(capture.messages_for("MOTOR"), vec!["spin up", "stall"]);
/// capture.clear();
/// assert_eq!(capture.count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct MockCaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

/// One recorded event.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct CapturedEvent {
    pub level: Level,
    /// Event target, i.e. the tag as written at the call, sigil included
    pub target: String,
    pub message: String,
}

impl CapturedEvent {
    /// Whether this event is a throttling summary re-emitted by `TracingSink`.
    pub fn is_summary(&self) -> bool {
        self.target == SUMMARY_TARGET
    }
}

impl MockCaptureLayer {
    /// Create an empty capture layer.
    pub fn new() -> Self {
        Self::default()
    }

    fn events(&self) -> MutexGuard<'_, Vec<CapturedEvent>> {
        self.events
            .lock()
            .expect(
                "MockCaptureLayer mutex poisoned - a test thread panicked while holding the lock",
            )
    }

    /// All recorded events, in arrival order.
    pub fn get_captured(&self) -> Vec<CapturedEvent> {
        self.events().clone()
    }

    /// Number of recorded events.
    pub fn count(&self) -> usize {
        self.events().len()
    }

    /// Messages of the events logged under `tag`.
    pub fn messages_for(&self, tag: &str) -> Vec<String> {
        self.events()
            .iter()
            .filter(|e| e.target == tag)
            .map(|e| e.message.clone())
            .collect()
    }

    /// Summary lines received through the summary target.
    pub fn summaries(&self) -> Vec<String> {
        self.events()
            .iter()
            .filter(|e| e.is_summary())
            .map(|e| e.message.clone())
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.events().clear();
    }
}

impl<S> Layer<S> for MockCaptureLayer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut message = MessageVisitor::default();
        event.record(&mut message);

        let meta = event.metadata();
        self.events().push(CapturedEvent {
            level: *meta.level(),
            target: meta.target().to_string(),
            message: message.0,
        });
    }
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}
