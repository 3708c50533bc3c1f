use std::{fmt, io};

/// Crate-wide `Result` type using [`MentionError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, MentionError>;

/// Top-level error type for mentionkit operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum MentionError {
    /// The suggestion source failed.
    Source(SourceError),

    /// A mention span could not be applied to the text.
    Span(SpanError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Failures reported by (or on behalf of) a suggestion source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The source returned an error for this query.
    FetchFailed { query: String, reason: String },

    /// The source did not answer within the configured timeout.
    Timeout { query: String, after_ms: u64 },

    /// The source cannot serve requests at all.
    Unavailable(String),
}

/// Integration errors when splicing a mention into text.
///
/// These indicate that a span was computed against different text than
/// the one it is being applied to. They are never user-facing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanError {
    /// The range does not fit the text or does not sit on char boundaries.
    InvalidRange { start: usize, end: usize, len: usize },

    /// The range fits, but the text under it is no longer the mention.
    StaleSpan { expected: String, found: String },
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for MentionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MentionError::Source(e) => write!(f, "Suggestion source error: {e}"),
            MentionError::Span(e) => write!(f, "Mention span error: {e}"),
            MentionError::Config(e) => write!(f, "Configuration error: {e}"),
            MentionError::Io(e) => write!(f, "I/O error: {e}"),
            MentionError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::FetchFailed { query, reason } => {
                write!(f, "fetch for '@{query}' failed: {reason}")
            }
            SourceError::Timeout { query, after_ms } => {
                write!(f, "fetch for '@{query}' timed out after {after_ms}ms")
            }
            SourceError::Unavailable(msg) => write!(f, "source unavailable: {msg}"),
        }
    }
}

impl fmt::Display for SpanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanError::InvalidRange { start, end, len } => {
                write!(f, "range {start}..{end} is not valid for text of {len} bytes")
            }
            SpanError::StaleSpan { expected, found } => {
                write!(f, "expected mention '{expected}', found '{found}'")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for MentionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MentionError::Source(e) => Some(e),
            MentionError::Span(e) => Some(e),
            MentionError::Config(e) => Some(e),
            MentionError::Io(e) => Some(e),
            MentionError::Generic(_) => None,
        }
    }
}
impl std::error::Error for SourceError {}
impl std::error::Error for SpanError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to MentionError ========================= */

impl From<io::Error> for MentionError {
    fn from(err: io::Error) -> Self {
        MentionError::Io(err)
    }
}

impl From<SourceError> for MentionError {
    fn from(err: SourceError) -> Self {
        MentionError::Source(err)
    }
}

impl From<SpanError> for MentionError {
    fn from(err: SpanError) -> Self {
        MentionError::Span(err)
    }
}

impl From<ConfigError> for MentionError {
    fn from(err: ConfigError) -> Self {
        MentionError::Config(err)
    }
}

impl From<toml::de::Error> for MentionError {
    fn from(err: toml::de::Error) -> Self {
        MentionError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<toml::ser::Error> for MentionError {
    fn from(err: toml::ser::Error) -> Self {
        MentionError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<String> for MentionError {
    fn from(msg: String) -> Self {
        MentionError::Generic(msg)
    }
}

impl From<&str> for MentionError {
    fn from(msg: &str) -> Self {
        MentionError::Generic(msg.to_owned())
    }
}

impl MentionError {
    /// Returns true when this error came from a suggestion source.
    pub fn is_source_failure(&self) -> bool {
        matches!(self, MentionError::Source(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_display() {
        let err = MentionError::from(SourceError::FetchFailed {
            query: "al".to_string(),
            reason: "backend down".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Suggestion source error: fetch for '@al' failed: backend down"
        );
        assert!(err.is_source_failure());
    }

    #[test]
    fn test_span_error_display() {
        let err = SpanError::InvalidRange {
            start: 4,
            end: 9,
            len: 6,
        };
        assert_eq!(err.to_string(), "range 4..9 is not valid for text of 6 bytes");
        assert!(!MentionError::from(err).is_source_failure());
    }

    #[test]
    fn test_generic_from_str() {
        let err: MentionError = "boom".into();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let err = MentionError::from(SourceError::Unavailable("offline".to_string()));
        assert!(err.source().is_some());
        assert!(MentionError::Generic("x".into()).source().is_none());
    }
}
