//! Dropped-call summaries.
//!
//! When a throttled call site's window closes with calls dropped, a single
//! summary line reports how many were lost, so suppression never goes
//! unnoticed.

use crate::domain::location::SourceLocation;
use std::fmt::Write as _;

/// Characters of the tag printed in a log line.
pub const TAG_WIDTH: usize = 8;

/// Report of calls dropped at one call site during a closed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DroppedSummary {
    /// Source file of the call site (possibly truncated)
    pub location: SourceLocation,
    /// Source line of the call site
    pub line: u16,
    /// Milliseconds between the window start and the call that closed it
    pub elapsed_ms: u32,
    /// Number of calls dropped
    pub dropped: u16,
}

impl DroppedSummary {
    /// Format the summary as a human-readable message.
    pub fn format_message(&self) -> String {
        format!(
            "<{}: {}> (-{}ms) discard times: {}",
            self.location, self.line, self.elapsed_ms, self.dropped
        )
    }

    /// Render the full warning line written to a sink.
    ///
    /// ```
    /// use tagged_throttle::{DroppedSummary, SourceLocation};
    ///
    /// let summary = DroppedSummary {
    ///     location: SourceLocation::new("f.c"),
    ///     line: 10,
    ///     elapsed_ms: 1200,
    ///     dropped: 2,
    /// };
    /// assert_eq!(
    ///     summary.render_line("09/16 11:17:33.990", "LOG"),
    ///     "W>09/16 11:17:33.990 {LOG} <f.c: 10> (-1200ms) discard times: 2\r\n"
    /// );
    /// ```
    pub fn render_line(&self, timestamp: &str, tag: &str) -> String {
        let mut out = String::with_capacity(64);
        let _ = write!(
            out,
            "W>{} {{{}}} {}\r\n",
            timestamp,
            clip_tag(tag),
            self.format_message()
        );
        out
    }
}

/// Clip a tag to [`TAG_WIDTH`] characters.
pub fn clip_tag(tag: &str) -> &str {
    match tag.char_indices().nth(TAG_WIDTH) {
        Some((idx, _)) => &tag[..idx],
        None => tag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(dropped: u16) -> DroppedSummary {
        DroppedSummary {
            location: SourceLocation::new("log.c"),
            line: 373,
            elapsed_ms: 1_004,
            dropped,
        }
    }

    #[test]
    fn test_format_message() {
        assert_eq!(
            summary(7).format_message(),
            "<log.c: 373> (-1004ms) discard times: 7"
        );
    }

    #[test]
    fn test_render_line_clips_tag() {
        let line = summary(1).render_line("00.001", "THROTTLING");
        assert!(line.starts_with("W>00.001 {THROTTLI} "));
        assert!(line.ends_with("\r\n"));
    }

    #[test]
    fn test_clip_tag() {
        assert_eq!(clip_tag("LOG"), "LOG");
        assert_eq!(clip_tag("12345678"), "12345678");
        assert_eq!(clip_tag("123456789"), "12345678");
        assert_eq!(clip_tag(""), "");
    }
}
