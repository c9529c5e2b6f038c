//! Field visitor for reading a per-event throttle rate.
//!
//! An event may carry a `log_hz` field to set its own call site's rate:
//!
//! ```rust,ignore
//! tracing::info!(log_hz = 5, "sensor sample {}", value);
//! ```
//!
//! Values outside `0..=255` are clamped; non-integer values are ignored.

use std::fmt;
use tracing::field::{Field, Visit};

/// Name of the event field holding the per-call-site rate.
pub const RATE_FIELD: &str = "log_hz";

/// A visitor that picks the rate field out of an event.
#[derive(Debug, Default)]
pub(crate) struct RateVisitor {
    rate: Option<u8>,
}

impl RateVisitor {
    /// Create a new rate visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// The rate found on the event, if any.
    pub fn rate(&self) -> Option<u8> {
        self.rate
    }
}

impl Visit for RateVisitor {
    fn record_i64(&mut self, field: &Field, value: i64) {
        if field.name() == RATE_FIELD {
            self.rate = Some(value.clamp(0, i64::from(u8::MAX)) as u8);
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == RATE_FIELD {
            self.rate = Some(value.min(u64::from(u8::MAX)) as u8);
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
}
