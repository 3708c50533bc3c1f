//! Host text widget adapter
//!
//! Platform widgets differ in how they deliver key presses and edits, but the
//! coordinator only needs a small capability set from them: read the text,
//! replace it (with a cursor), and forward a handful of events. A platform
//! adapter implements [`TextHost`] and feeds [`HostEvent`]s into a
//! [`MentionInput`].
//!
//! # Examples
//!
//! ```
//! use mentionkit::host::{BufferHost, HostEvent, MentionInput};
//! use mentionkit::suggest::{MentionOptions, StaticSource, SuggestionCoordinator};
//!
//! # tokio_test::block_on(async {
//! let source = StaticSource::from_names(["john"]);
//! let coordinator = SuggestionCoordinator::new(source, MentionOptions::new(String::clone));
//! let mut input = MentionInput::new(BufferHost::default(), coordinator);
//!
//! input.edit(|host| host.insert("@jo"));
//! input.settle().await;
//!
//! // The submit key inserts the mention instead of a newline.
//! assert!(input.handle(HostEvent::Submit).handled);
//! assert_eq!(input.host().text(), "@john ");
//! # });
//! ```

use tracing::trace;

use crate::mention::Replacement;
use crate::suggest::{CompletionOutcome, Direction, SubmitOutcome, SuggestionCoordinator};

/// What the core needs from a text widget.
pub trait TextHost {
    /// Full current text
    fn text(&self) -> String;

    /// Replace the full text and place the cursor (byte offset).
    ///
    /// Implementations must not echo this write back as a
    /// [`HostEvent::TextChanged`]; [`MentionInput`] already told the
    /// coordinator about it.
    fn replace_text(&mut self, text: &str, cursor: usize);
}

/// Events a host forwards from its widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The user edited the text
    TextChanged { old: String, new: String },
    /// Submit/newline key
    Submit,
    /// Escape key or focus loss
    Dismiss,
    /// Arrow keys
    Navigate(Direction),
    /// Pointer over item `index`
    Hover(usize),
    /// Click or tap on item `index`
    Activate(usize),
}

/// Host reply to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventResponse {
    /// When true the widget must skip its default action for the key
    pub handled: bool,
}

/// A host widget bound to a suggestion coordinator.
#[derive(Debug)]
pub struct MentionInput<H, T: Send + 'static> {
    host: H,
    coordinator: SuggestionCoordinator<T>,
}

impl<H: TextHost, T: Send + 'static> MentionInput<H, T> {
    /// Bind `host` to `coordinator`, syncing the coordinator to the host's text.
    ///
    /// A host that already holds an open mention starts a fetch right away.
    pub fn new(host: H, mut coordinator: SuggestionCoordinator<T>) -> Self {
        let text = host.text();
        if text != coordinator.text() {
            coordinator.set_text(&text);
        }
        Self { host, coordinator }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn coordinator(&self) -> &SuggestionCoordinator<T> {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut SuggestionCoordinator<T> {
        &mut self.coordinator
    }

    pub fn into_parts(self) -> (H, SuggestionCoordinator<T>) {
        (self.host, self.coordinator)
    }

    /// Route one widget event.
    pub fn handle(&mut self, event: HostEvent) -> EventResponse {
        trace!(?event, "host event");
        match event {
            HostEvent::TextChanged { old, new } => {
                self.coordinator.on_text_changed(&old, &new);
                EventResponse::default()
            }
            HostEvent::Submit => {
                let outcome = self.coordinator.on_submit_intent();
                self.write_back(outcome)
            }
            HostEvent::Activate(index) => {
                let outcome = self.coordinator.select_item(index);
                self.write_back(outcome)
            }
            HostEvent::Dismiss => {
                self.coordinator.on_dismiss();
                EventResponse::default()
            }
            HostEvent::Navigate(direction) => {
                let handled = self.coordinator.state().is_actionable();
                self.coordinator.on_navigate(direction);
                EventResponse { handled }
            }
            HostEvent::Hover(index) => {
                self.coordinator.on_hover(index);
                EventResponse::default()
            }
        }
    }

    /// Mutate the host directly and forward the edit it reports.
    pub fn edit<F>(&mut self, f: F) -> EventResponse
    where
        F: FnOnce(&mut H) -> HostEvent,
    {
        let event = f(&mut self.host);
        self.handle(event)
    }

    /// See [`SuggestionCoordinator::poll_completions`].
    pub fn poll_completions(&mut self) -> Vec<CompletionOutcome> {
        self.coordinator.poll_completions()
    }

    /// See [`SuggestionCoordinator::settle`].
    pub async fn settle(&mut self) {
        self.coordinator.settle().await;
    }

    fn write_back(&mut self, outcome: SubmitOutcome) -> EventResponse {
        if let Some(Replacement { text, cursor }) = &outcome.replacement {
            self.host.replace_text(text, *cursor);
        }
        EventResponse {
            handled: outcome.handled,
        }
    }
}

/// In-memory text widget: a string and a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferHost {
    text: String,
    cursor: usize,
}

impl BufferHost {
    /// Buffer holding `text` with the cursor at its end
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Type `s` at the cursor.
    pub fn insert(&mut self, s: &str) -> HostEvent {
        let old = self.text.clone();
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
        HostEvent::TextChanged {
            old,
            new: self.text.clone(),
        }
    }

    /// Delete the scalar before the cursor.
    pub fn backspace(&mut self) -> HostEvent {
        let old = self.text.clone();
        if let Some((at, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.text.remove(at);
            self.cursor = at;
        }
        HostEvent::TextChanged {
            old,
            new: self.text.clone(),
        }
    }

    /// Insert a newline, the widget's default action for submit.
    pub fn newline(&mut self) -> HostEvent {
        self.insert("\n")
    }
}

impl TextHost for BufferHost {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn replace_text(&mut self, text: &str, cursor: usize) {
        self.text.clear();
        self.text.push_str(text);
        self.cursor = cursor.min(self.text.len());
    }
}
