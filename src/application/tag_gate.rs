//! Tag gate: session-style "focus on these tags" filtering.
//!
//! The gate holds one flag, `restricted`. A `#` tag prints and turns the flag
//! on; from then on only `*` (privileged) and `#` tags print until a `~` tag
//! turns it off again. `!` tags never print. Untagged-sigil calls follow the
//! flag.

use crate::domain::fingerprint::ArgumentError;
use crate::domain::tag::{parse_tag, TagControl};

/// Outcome of passing a tag through the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateVerdict<'a> {
    /// Tag text to display, sigil stripped
    pub display: &'a str,
    /// Control action the tag carried
    pub control: TagControl,
    /// Whether the call must not print
    pub suppress: bool,
}

impl GateVerdict<'_> {
    /// Whether the call bypasses level filtering as well.
    pub fn is_privileged(&self) -> bool {
        self.control == TagControl::Privileged
    }
}

/// Restricted-mode state machine.
#[derive(Debug, Clone, Default)]
pub struct TagGate {
    restricted: bool,
}

impl TagGate {
    /// Create an unrestricted gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a call tagged `tag` may print, updating the mode.
    ///
    /// # Errors
    /// Returns `ArgumentError::EmptyTag` for an empty tag; the mode is left
    /// unchanged and callers should not suppress the call.
    pub fn gatekeep<'a>(&mut self, tag: &'a str) -> Result<GateVerdict<'a>, ArgumentError> {
        let (control, display) = parse_tag(tag)?;
        let suppress = match control {
            TagControl::Exclude => true,
            TagControl::Focus => {
                self.restricted = true;
                false
            }
            TagControl::Release => {
                self.restricted = false;
                self.restricted
            }
            TagControl::Privileged => false,
            TagControl::Normal => self.restricted,
        };
        Ok(GateVerdict {
            display,
            control,
            suppress,
        })
    }

    /// Whether restricted mode is active.
    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    /// Leave restricted mode.
    pub fn reset(&mut self) {
        self.restricted = false;
    }
}
