//! Domain layer - pure logic with no I/O and no shared state.
//!
//! - Call-site fingerprints and the string hash behind them
//! - Tag sigil parsing
//! - Throttle modes and per-call decisions
//! - Wall-clock readings and timestamp rendering
//! - Dropped-call summaries and the log line format

pub mod fingerprint;
pub mod line;
pub mod location;
pub mod policy;
pub mod summary;
pub mod tag;
pub mod timestamp;
