//! Error handling module for mentionkit.
//!
//! Errors fall into three groups:
//! - Source failures, reported by the caller-supplied suggestion source.
//!   These are recovered locally by the coordinator and surfaced through
//!   logging and the host's error handler, never into typing control flow.
//! - Span errors, raised when a mention range no longer matches the text.
//! - Configuration and I/O errors from loading settings.
//!
//! # Example
//!
//! ```rust
//! use mentionkit::error::{MentionError, Result, SourceError};
//!
//! fn lookup(query: &str) -> Result<Vec<String>> {
//!     Err(SourceError::Unavailable(format!("no directory for '{query}'")).into())
//! }
//!
//! assert!(matches!(lookup("al"), Err(MentionError::Source(_))));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, MentionError, Result, SourceError, SpanError};
