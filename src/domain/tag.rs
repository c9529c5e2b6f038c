//! Tag sigils.
//!
//! The first character of a tag may be a control sigil that changes how the tag
//! gate treats the call:
//!
//! | Sigil | Control      | Display tag       |
//! |-------|--------------|-------------------|
//! | `!`   | `Exclude`    | unchanged         |
//! | `#`   | `Focus`      | sigil stripped    |
//! | `~`   | `Release`    | sigil stripped    |
//! | `*`   | `Privileged` | sigil stripped    |
//! | other | `Normal`     | unchanged         |

use crate::domain::fingerprint::ArgumentError;

/// Control action carried by a tag's leading sigil.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagControl {
    /// `!` - never print this tag
    Exclude,
    /// `#` - print this tag and enter restricted mode
    Focus,
    /// `~` - leave restricted mode, then follow it
    Release,
    /// `*` - always print, bypassing restricted mode and level filtering
    Privileged,
    /// No sigil
    Normal,
}

impl TagControl {
    /// Map a leading character to its control action.
    pub fn from_sigil(c: char) -> Self {
        match c {
            '!' => TagControl::Exclude,
            '#' => TagControl::Focus,
            '~' => TagControl::Release,
            '*' => TagControl::Privileged,
            _ => TagControl::Normal,
        }
    }

    /// Whether the sigil is removed from the display tag.
    pub fn strips_sigil(&self) -> bool {
        matches!(
            self,
            TagControl::Focus | TagControl::Release | TagControl::Privileged
        )
    }
}

/// Split a tag into its control action and display text.
///
/// # Errors
/// Returns `ArgumentError::EmptyTag` for an empty tag.
///
/// # Example
/// ```
/// use tagged_throttle::{parse_tag, TagControl};
///
/// assert_eq!(parse_tag("*net").unwrap(), (TagControl::Privileged, "net"));
/// assert_eq!(parse_tag("!net").unwrap(), (TagControl::Exclude, "!net"));
/// assert_eq!(parse_tag("net").unwrap(), (TagControl::Normal, "net"));
/// ```
pub fn parse_tag(tag: &str) -> Result<(TagControl, &str), ArgumentError> {
    let first = tag.chars().next().ok_or(ArgumentError::EmptyTag)?;
    let control = TagControl::from_sigil(first);
    let display = if control.strips_sigil() {
        &tag[first.len_utf8()..]
    } else {
        tag
    };
    Ok((control, display))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_sigil() {
        assert_eq!(parse_tag("!A").unwrap(), (TagControl::Exclude, "!A"));
        assert_eq!(parse_tag("#A").unwrap(), (TagControl::Focus, "A"));
        assert_eq!(parse_tag("~A").unwrap(), (TagControl::Release, "A"));
        assert_eq!(parse_tag("*A").unwrap(), (TagControl::Privileged, "A"));
        assert_eq!(parse_tag("A").unwrap(), (TagControl::Normal, "A"));
    }

    #[test]
    fn test_only_first_sigil_consumed() {
        assert_eq!(parse_tag("##A").unwrap(), (TagControl::Focus, "#A"));
        assert_eq!(parse_tag("*~A").unwrap(), (TagControl::Privileged, "~A"));
    }

    #[test]
    fn test_bare_sigil_leaves_empty_display() {
        assert_eq!(parse_tag("*").unwrap(), (TagControl::Privileged, ""));
    }

    #[test]
    fn test_multibyte_first_char() {
        assert_eq!(parse_tag("日志").unwrap(), (TagControl::Normal, "日志"));
    }

    #[test]
    fn test_empty_tag_rejected() {
        assert_eq!(parse_tag(""), Err(ArgumentError::EmptyTag));
    }
}
