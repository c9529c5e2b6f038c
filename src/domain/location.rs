//! Bounded source locations stored inside throttle records.

use std::fmt;

/// Maximum stored length of a file name in bytes.
pub const MAX_LOCATION_LEN: usize = 47;

/// A file name truncated to at most [`MAX_LOCATION_LEN`] bytes.
///
/// Truncation happens on a character boundary. Only the display is affected;
/// fingerprints are computed from the full name.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    bytes: [u8; MAX_LOCATION_LEN],
    len: u8,
}

impl SourceLocation {
    /// Store `file`, truncating if it is too long.
    pub fn new(file: &str) -> Self {
        let mut end = file.len().min(MAX_LOCATION_LEN);
        while !file.is_char_boundary(end) {
            end -= 1;
        }
        let mut bytes = [0u8; MAX_LOCATION_LEN];
        bytes[..end].copy_from_slice(&file.as_bytes()[..end]);
        Self {
            bytes,
            len: end as u8,
        }
    }

    /// The stored file name.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes[..usize::from(self.len)]).unwrap_or_default()
    }

    /// Whether the original name was longer than what is stored.
    pub fn is_truncated_from(&self, file: &str) -> bool {
        file.len() > usize::from(self.len)
    }
}

impl fmt::Debug for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SourceLocation").field(&self.as_str()).finish()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
