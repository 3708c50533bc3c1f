//! Mention Suggestion Library
//!
//! This library provides the platform-independent core of a mention picker:
//! detecting an `@token` being typed in a text input, fetching candidates for
//! it asynchronously, tracking the selection, and inserting the chosen
//! candidate back into the text.
//!
//! # Modules
//!
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `host`: Text widget adapter layer
//! - `logging`: Tracing subscriber setup
//! - `mention`: Mention span detection and replacement
//! - `suggest`: Suggestion sources, state and the async coordinator
//!
//! # Example
//!
//! ```
//! use mentionkit::{MentionOptions, StaticSource, SuggestionCoordinator};
//!
//! # tokio_test::block_on(async {
//! let source = StaticSource::from_names(["alice", "albert", "bob"]);
//! let mut coordinator = SuggestionCoordinator::new(source, MentionOptions::new(String::clone));
//!
//! coordinator.set_text("thanks @al");
//! coordinator.settle().await;
//! assert_eq!(coordinator.state().items(), ["alice", "albert"]);
//! # });
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod mention;
pub mod suggest;

// Re-export commonly used types
pub use config::Config;
pub use error::{MentionError, Result};
pub use host::{BufferHost, HostEvent, MentionInput, TextHost};
pub use mention::{MentionSpan, Replacement, apply, locate};
pub use suggest::{
    MentionOptions, StaticSource, SuggestionCoordinator, SuggestionSource, SuggestionState,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
