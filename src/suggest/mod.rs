//! Asynchronous suggestion fetching and list selection
//!
//! # Architecture
//!
//! - **SuggestionSource**: caller-supplied async lookup from query to candidates
//! - **SuggestionState**: items, selection and visibility/loading flags
//! - **SuggestionCoordinator**: turns text changes into fetches, discards
//!   superseded results by epoch, and handles navigation and submission
//!
//! # Examples
//!
//! ```
//! use mentionkit::suggest::{MentionOptions, StaticSource, SuggestionCoordinator};
//!
//! # tokio_test::block_on(async {
//! let source = StaticSource::from_names(["john", "joanna", "alice"]);
//! let mut coordinator = SuggestionCoordinator::new(source, MentionOptions::new(String::clone));
//!
//! coordinator.set_text("hey @jo");
//! coordinator.settle().await;
//! assert_eq!(coordinator.state().items(), ["john", "joanna"]);
//!
//! let outcome = coordinator.on_submit_intent();
//! assert!(outcome.handled);
//! assert_eq!(coordinator.text(), "hey @john ");
//! # });
//! ```

mod coordinator;
mod source;
mod state;


pub use coordinator::{
    CompletionOutcome, MentionOptions, SubmitOutcome, SuggestionCoordinator, SuggestionView,
};
pub use source::{FnSource, StaticSource, SuggestionSource};
pub use state::{Direction, Phase, SuggestionState};
