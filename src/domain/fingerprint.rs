//! Call-site fingerprints for throttling.
//!
//! A fingerprint identifies a log call site by hashing `"<file>:<line>"` with the
//! BKDR string hash (seed 131) masked to 31 bits. The hash is deterministic across
//! processes, so fingerprints can be compared between runs.
//!
//! Distinct call sites may collide. A collision makes two sites share one throttle
//! record; this is accepted in exchange for constant-size records.

use std::fmt;

const SEED: u32 = 131;
const MASK: u32 = 0x7FFF_FFFF;

/// Hash a string with the BKDR algorithm, masked to 31 bits.
///
/// Returns 0 for the empty string.
///
/// # Example
/// ```
/// use tagged_throttle::hash;
///
/// assert_eq!(hash(""), 0);
/// assert_eq!(hash("a"), 97);
/// assert_eq!(hash("ab"), 97 * 131 + 98);
/// ```
pub fn hash(s: &str) -> u32 {
    s.bytes()
        .fold(0u32, |h, b| h.wrapping_mul(SEED).wrapping_add(u32::from(b)))
        & MASK
}

/// Error returned when a required argument is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentError {
    /// The source file name was empty
    EmptyFileName,
    /// The tag was empty
    EmptyTag,
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentError::EmptyFileName => write!(f, "file name must not be empty"),
            ArgumentError::EmptyTag => write!(f, "tag must not be empty"),
        }
    }
}

impl std::error::Error for ArgumentError {}

/// 31-bit fingerprint of a `(file, line)` call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallSiteFingerprint(u32);

impl CallSiteFingerprint {
    /// Fingerprint the call site `file:line`.
    ///
    /// The full file name is hashed even when the stored location is truncated.
    ///
    /// # Errors
    /// Returns `ArgumentError::EmptyFileName` if `file` is empty.
    pub fn of(file: &str, line: u16) -> Result<Self, ArgumentError> {
        if file.is_empty() {
            return Err(ArgumentError::EmptyFileName);
        }
        Ok(Self(hash(&format!("{file}:{line}"))))
    }

    /// Wrap a raw hash value.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw & MASK)
    }

    /// Get the raw 31-bit value.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CallSiteFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash("main.c:42"), hash("main.c:42"));
        assert_eq!(hash("log.rs:7"), hash(&format!("{}:{}", "log.rs", 7)));
    }

    #[test]
    fn test_hash_known_values() {
        assert_eq!(hash("a"), 97);
        assert_eq!(hash("abc"), (97 * 131 + 98) * 131 + 99);
    }

    #[test]
    fn test_hash_fits_31_bits() {
        let long = "x".repeat(1_000);
        assert!(hash(&long) <= MASK);
        assert!(hash("some/really/deep/path/to/a/source/file.c:65535") <= MASK);
    }

    #[test]
    fn test_hash_treats_high_bytes_unsigned() {
        // 'é' is 0xC3 0xA9 in UTF-8
        assert_eq!(hash("é"), 0xC3 * 131 + 0xA9);
    }

    #[test]
    fn test_empty_string_hashes_to_zero() {
        assert_eq!(hash(""), 0);
    }

    #[test]
    fn test_fingerprint_of_call_site() {
        let fp = CallSiteFingerprint::of("f.c", 10).unwrap();
        assert_eq!(fp.as_u32(), hash("f.c:10"));
    }

    #[test]
    fn test_different_lines_different_fingerprints() {
        let a = CallSiteFingerprint::of("f.c", 10).unwrap();
        let b = CallSiteFingerprint::of("f.c", 11).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_file_rejected() {
        assert_eq!(
            CallSiteFingerprint::of("", 1),
            Err(ArgumentError::EmptyFileName)
        );
    }

    #[test]
    fn test_from_raw_masks_high_bit() {
        assert_eq!(CallSiteFingerprint::from_raw(u32::MAX).as_u32(), MASK);
    }

    #[test]
    fn test_display_format() {
        let fp = CallSiteFingerprint::from_raw(0xABC);
        assert_eq!(fp.to_string(), "00000abc");
    }
}
