//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use crate::domain::timestamp::WallTime;
use std::fmt::Debug;
use std::io;

/// Port for obtaining the current local wall-clock time.
///
/// Infrastructure provides concrete implementations (SystemClock, MockClock).
pub trait Clock: Send + Sync + Debug {
    /// Read the current time with millisecond resolution.
    fn now(&self) -> WallTime;
}

/// Port for the byte-level log backend.
///
/// The pipeline writes nothing but throttling summary lines through this port.
/// Terminal, file and flash backends all sit behind it.
pub trait Sink: Send + Sync + Debug {
    /// Write one complete, already formatted line.
    fn write(&self, buf: &[u8]) -> io::Result<()>;
}
