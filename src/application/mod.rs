//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain logic and owns the mutable state:
//! - Tag gate (restricted-mode flag)
//! - Throttle ledger (bounded per-call-site windows)
//! - Clock source (full vs abbreviated timestamps)
//! - Admission pipeline (one lock over all of the above)
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod clock_source;
pub mod ledger;
pub mod metrics;
pub mod pipeline;
pub mod ports;
pub mod tag_gate;
