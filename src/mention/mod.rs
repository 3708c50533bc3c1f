//! Mention span detection and replacement
//!
//! This module is the synchronous foundation of the crate. It knows nothing
//! about suggestions or async fetching; it only answers two questions:
//!
//! - Is the user currently typing an `@token` at the end of the text?
//!   ([`locate`])
//! - What does the text look like once that token is replaced by a chosen
//!   candidate? ([`apply`])
//!
//! Offsets are byte offsets into the UTF-8 text and always fall on char
//! boundaries. Use [`MentionSpan::char_range`] or
//! [`MentionSpan::utf16_range`] when a widget indexes text differently.
//!
//! # Examples
//!
//! ```
//! use mentionkit::mention::{apply, locate};
//!
//! let span = locate("hi @b", None).unwrap();
//! assert_eq!(span.query, "b");
//!
//! let replaced = apply("hi @b", &span, "bob").unwrap();
//! assert_eq!(replaced.text, "hi @bob ");
//! assert_eq!(replaced.cursor, 8);
//!
//! // The boundary keeps the accepted mention from reopening.
//! assert!(locate(&replaced.text, Some(replaced.cursor)).is_none());
//! ```

use std::ops::Range;

use crate::error::{Result, SpanError};

/// Character that opens a mention.
pub const TRIGGER: char = '@';

/// An in-progress mention: the trigger plus the run typed after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionSpan {
    /// Text after the trigger, possibly empty
    pub query: String,
    /// Byte range covering the trigger and the query
    pub range: Range<usize>,
}

/// Result of splicing a candidate into the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// Full text after the replacement
    pub text: String,
    /// Byte offset right after the inserted trailing space
    pub cursor: usize,
}

/// Find the mention the user is currently typing, if any.
///
/// Only the run after the *last* trigger is considered. It is active when
/// it contains no whitespace (the full-width space U+3000 included) and the
/// trigger lies after `boundary`, the end of the most recently accepted
/// mention.
///
/// A trigger sitting exactly at `boundary` stays closed too, so typing `@`
/// right after an accepted `"@john "` opens nothing until the user types
/// another character first or deletes something.
///
/// # Arguments
/// * `text` - Full text of the input
/// * `boundary` - End of the last inserted mention, if any
///
/// # Returns
/// * `Option<MentionSpan>` - The active span, `None` when nothing is being typed
pub fn locate(text: &str, boundary: Option<usize>) -> Option<MentionSpan> {
    let at = text.rfind(TRIGGER)?;

    if boundary.is_some_and(|b| at <= b) {
        return None;
    }

    let query = &text[at + TRIGGER.len_utf8()..];
    if query.chars().any(char::is_whitespace) {
        return None;
    }

    Some(MentionSpan {
        query: query.to_string(),
        range: at..text.len(),
    })
}

/// Replace the span with `@display ` and report where the mention ends.
///
/// The span is re-validated against `text` first. If the text changed
/// since the span was located, nothing is spliced and an error is returned.
///
/// # Arguments
/// * `text` - Current full text
/// * `span` - Span previously returned by [`locate`]
/// * `display` - Text inserted after the trigger
///
/// # Returns
/// * `Result<Replacement>` - New text and the boundary after the trailing space
pub fn apply(text: &str, span: &MentionSpan, display: &str) -> Result<Replacement> {
    span.validate(text)?;

    let start = span.range.start;
    let mut out = String::with_capacity(text.len() - span.range.len() + display.len() + 2);
    out.push_str(&text[..start]);
    out.push(TRIGGER);
    out.push_str(display);
    out.push(' ');
    let cursor = out.len();
    out.push_str(&text[span.range.end..]);

    Ok(Replacement { text: out, cursor })
}

impl MentionSpan {
    /// The span as it appears in the text, trigger included.
    pub fn token(&self) -> String {
        format!("{TRIGGER}{}", self.query)
    }

    /// Check that this span still describes `text`.
    pub fn is_valid_for(&self, text: &str) -> bool {
        self.validate(text).is_ok()
    }

    fn validate(&self, text: &str) -> std::result::Result<(), SpanError> {
        let Range { start, end } = self.range.clone();
        let invalid = SpanError::InvalidRange {
            start,
            end,
            len: text.len(),
        };

        if start >= end || end != text.len() {
            return Err(invalid);
        }
        let Some(found) = text.get(start..end) else {
            return Err(invalid);
        };

        let expected = self.token();
        if found != expected {
            return Err(SpanError::StaleSpan {
                expected,
                found: found.to_string(),
            });
        }
        Ok(())
    }

    /// The range in Unicode scalar values instead of bytes.
    ///
    /// Returns `None` if the span is not valid for `text`.
    pub fn char_range(&self, text: &str) -> Option<Range<usize>> {
        let head = text.get(..self.range.start)?;
        let body = text.get(self.range.clone())?;
        let start = head.chars().count();
        Some(start..start + body.chars().count())
    }

    /// The range in UTF-16 code units, for widgets that index that way.
    ///
    /// Returns `None` if the span is not valid for `text`.
    pub fn utf16_range(&self, text: &str) -> Option<Range<usize>> {
        let head = text.get(..self.range.start)?;
        let body = text.get(self.range.clone())?;
        let start = head.encode_utf16().count();
        Some(start..start + body.encode_utf16().count())
    }
}

#[cfg(test)]
mod tests;
