//! Presentation format of an emitted log line.
//!
//! ```text
//! E>09/16 11:17:33.990 {TEST-sku} <test:373> This is test.
//! ```
//!
//! The level letter, the timestamp from the clock source, the display tag
//! clipped to eight characters, the function and line, then the message.

use crate::domain::summary::clip_tag;
use std::fmt;

/// One formatted log line, terminated with `\r\n`.
#[derive(Debug, Clone, Copy)]
pub struct LogLine<'a> {
    /// Single-letter level (`V`, `D`, `I`, `W`, `E`)
    pub level: char,
    /// Rendered timestamp
    pub timestamp: &'a str,
    /// Display tag with any sigil already stripped
    pub tag: &'a str,
    /// Calling function or module
    pub func: &'a str,
    /// Source line
    pub line: u32,
    /// Message text
    pub message: &'a str,
}

impl fmt::Display for LogLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}>{} {{{}}} <{}:{}> {}\r\n",
            self.level,
            self.timestamp,
            clip_tag(self.tag),
            self.func,
            self.line,
            self.message
        )
    }
}
