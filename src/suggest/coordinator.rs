//! Suggestion coordinator - drives the list from text changes and key intents
//!
//! The coordinator is owned by one task (the host's event loop). Text
//! changes start fetches on the tokio runtime; their results come back over
//! a channel and are only applied when the owner drains it with
//! [`SuggestionCoordinator::poll_completions`],
//! [`SuggestionCoordinator::next_completion`] or
//! [`SuggestionCoordinator::settle`]. Every state mutation therefore happens
//! on the owning task.
//!
//! Overlapping fetches are allowed to run. Each one is tagged with the
//! request epoch current when it started, and the epoch is bumped on every
//! text change, so only the most recently started fetch can ever land.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use super::source::SuggestionSource;
use super::state::{Direction, Phase, SuggestionState};
use crate::config::{Edge, FetchErrorPolicy, SuggestionConfig};
use crate::error::{MentionError, Result, SourceError};
use crate::mention::{MentionSpan, Replacement, apply, locate};

type DisplayFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
type ErrorHandler = Box<dyn Fn(&MentionError) + Send + Sync>;

/// Construction-time behavior of a coordinator.
pub struct MentionOptions<T> {
    display: DisplayFn<T>,
    identity: Option<DisplayFn<T>>,
    on_error: Option<ErrorHandler>,
    config: SuggestionConfig,
    runtime: Option<Handle>,
}

impl<T> MentionOptions<T> {
    /// Create options with the text inserted after `@` for a chosen item
    pub fn new<D>(display: D) -> Self
    where
        D: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            display: Arc::new(display),
            identity: None,
            on_error: None,
            config: SuggestionConfig::default(),
            runtime: None,
        }
    }

    /// Stable key per item for list diffing. Defaults to the display string.
    pub fn with_identity<I>(mut self, identity: I) -> Self
    where
        I: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.identity = Some(Arc::new(identity));
        self
    }

    /// Host error channel for source failures.
    pub fn with_error_handler<E>(mut self, handler: E) -> Self
    where
        E: Fn(&MentionError) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(handler));
        self
    }

    pub fn with_config(mut self, config: SuggestionConfig) -> Self {
        self.config = config;
        self
    }

    /// Runtime that runs fetches.
    ///
    /// Hosts whose UI thread is not a tokio worker pass the handle of the
    /// runtime they keep for background work. Without one, the runtime
    /// current at construction (or at the first fetch) is used.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }
}

impl<T> fmt::Debug for MentionOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MentionOptions")
            .field("identity", &self.identity.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("config", &self.config)
            .field("runtime", &self.runtime.is_some())
            .finish()
    }
}

/// A finished fetch on its way back to the owning task.
struct FetchCompletion<T> {
    epoch: u64,
    query: String,
    result: Result<Vec<T>>,
}

/// What happened to a fetch result once the owner received it.
#[derive(Debug)]
pub enum CompletionOutcome {
    /// The result was current and is now the shown list
    Applied { epoch: u64, count: usize },
    /// The current fetch failed; the error went to the host's handler
    Failed { epoch: u64, error: MentionError },
    /// A newer fetch had started; the result was dropped untouched
    Stale { epoch: u64, current: u64 },
}

impl CompletionOutcome {
    pub fn is_stale(&self) -> bool {
        matches!(self, CompletionOutcome::Stale { .. })
    }
}

/// Answer to a submit key or item activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// True when the host must suppress its default action (newline)
    pub handled: bool,
    /// New text and cursor for the host, when a mention was inserted
    pub replacement: Option<Replacement>,
}

impl SubmitOutcome {
    fn unhandled() -> Self {
        Self {
            handled: false,
            replacement: None,
        }
    }
}

/// Everything a list renderer needs for one frame.
#[derive(Debug)]
pub struct SuggestionView<'a, T> {
    pub items: &'a [T],
    /// Stable identity per item, parallel to `items`
    pub keys: Vec<String>,
    pub selected_index: usize,
    pub visible: bool,
    pub loading: bool,
    pub phase: Phase,
    pub edge: Edge,
}

/// State machine tying text changes, fetches and selection together.
pub struct SuggestionCoordinator<T: Send + 'static> {
    source: Arc<dyn SuggestionSource<T>>,
    options: MentionOptions<T>,
    text: String,
    span: Option<MentionSpan>,
    boundary: Option<usize>,
    state: SuggestionState<T>,
    completions_tx: mpsc::UnboundedSender<FetchCompletion<T>>,
    completions_rx: mpsc::UnboundedReceiver<FetchCompletion<T>>,
    shutdown: CancellationToken,
}

impl<T: Send + 'static> SuggestionCoordinator<T> {
    /// Create a new coordinator
    ///
    /// # Arguments
    /// * `source` - Async lookup for candidates
    /// * `options` - Display function, error handler and policies
    pub fn new<S>(source: S, options: MentionOptions<T>) -> Self
    where
        S: SuggestionSource<T> + 'static,
    {
        Self::with_shared_source(Arc::new(source), options)
    }

    /// Create a coordinator over a source shared with other owners
    pub fn with_shared_source(
        source: Arc<dyn SuggestionSource<T>>,
        mut options: MentionOptions<T>,
    ) -> Self {
        if options.runtime.is_none() {
            options.runtime = Handle::try_current().ok();
        }
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            source,
            options,
            text: String::new(),
            span: None,
            boundary: None,
            state: SuggestionState::default(),
            completions_tx,
            completions_rx,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The mention being typed, as of the last text change
    pub fn current_span(&self) -> Option<&MentionSpan> {
        self.span.as_ref()
    }

    /// End of the most recently inserted mention, if still in effect
    pub fn last_completed_boundary(&self) -> Option<usize> {
        self.boundary
    }

    pub fn state(&self) -> &SuggestionState<T> {
        &self.state
    }

    pub fn config(&self) -> &SuggestionConfig {
        &self.options.config
    }

    /// Snapshot for the list renderer
    pub fn view(&self) -> SuggestionView<'_, T> {
        let key = self.options.identity.as_ref().unwrap_or(&self.options.display);
        SuggestionView {
            items: &self.state.items,
            keys: self.state.items.iter().map(|item| key(item)).collect(),
            selected_index: self.state.selected_index,
            visible: self.state.visible,
            loading: self.state.loading,
            phase: self.state.phase(),
            edge: self.options.config.edge,
        }
    }

    /// React to an edit of the host text.
    ///
    /// An active mention starts a fetch on the coordinator's runtime. With no
    /// runtime at all the fetch fails with [`SourceError::Unavailable`],
    /// delivered through the usual completion path.
    pub fn on_text_changed(&mut self, old: &str, new: &str) {
        // Deletions are the only signal that reopens a completed mention.
        if new.chars().count() < old.chars().count() && self.boundary.take().is_some() {
            trace!("deletion cleared the completed-mention boundary");
        }

        let epoch = self.state.bump_epoch();
        self.text.clear();
        self.text.push_str(new);

        match locate(new, self.boundary) {
            None => {
                self.span = None;
                self.state.clear();
            }
            Some(span) => {
                self.state.selected_index = 0;
                self.state.loading = true;
                self.spawn_fetch(epoch, span.query.clone());
                self.span = Some(span);
            }
        }
    }

    /// Same as [`Self::on_text_changed`] with the current text as the old one.
    pub fn set_text(&mut self, new: &str) {
        let old = std::mem::take(&mut self.text);
        self.on_text_changed(&old, new);
    }

    fn spawn_fetch(&self, epoch: u64, query: String) {
        debug!(epoch, query = %query, "fetching suggestions");

        let tx = self.completions_tx.clone();
        let Some(runtime) = self
            .options
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
        else {
            // Reported like any other failure once the owner drains.
            let _ = tx.send(FetchCompletion {
                epoch,
                result: Err(SourceError::Unavailable(format!(
                    "no tokio runtime to fetch '@{query}'"
                ))
                .into()),
                query,
            });
            return;
        };

        let source = Arc::clone(&self.source);
        let shutdown = self.shutdown.clone();
        let timeout = self.options.config.fetch_timeout();

        runtime.spawn(async move {
            let lookup = {
                let query = query.clone();
                async move {
                    match timeout {
                        Some(limit) => tokio::time::timeout(limit, source.fetch(&query))
                            .await
                            .unwrap_or_else(|_| {
                                Err(SourceError::Timeout {
                                    query: query.clone(),
                                    after_ms: limit.as_millis() as u64,
                                }
                                .into())
                            }),
                        None => source.fetch(&query).await,
                    }
                }
            };

            let result = tokio::select! {
                _ = shutdown.cancelled() => return,
                caught = AssertUnwindSafe(lookup).catch_unwind() => caught.unwrap_or_else(|panic| {
                    Err(SourceError::FetchFailed {
                        query: query.clone(),
                        reason: format!("source panicked: {}", panic_message(panic.as_ref())),
                    }
                    .into())
                }),
            };

            // The receiver is gone once the coordinator is dropped.
            let _ = tx.send(FetchCompletion {
                epoch,
                query,
                result,
            });
        });
    }

    fn apply_completion(&mut self, completion: FetchCompletion<T>) -> CompletionOutcome {
        let FetchCompletion {
            epoch,
            query,
            result,
        } = completion;
        let current = self.state.epoch;

        if epoch != current {
            debug!(epoch, current, query = %query, "discarding stale suggestions");
            return CompletionOutcome::Stale { epoch, current };
        }

        self.state.loading = false;
        match result {
            Ok(items) => {
                let count = items.len();
                debug!(epoch, count, query = %query, "showing suggestions");
                self.state.replace_items(items);
                self.state.visible = true;
                CompletionOutcome::Applied { epoch, count }
            }
            Err(error) => {
                warn!(epoch, query = %query, "suggestion fetch failed: {error}");
                if self.options.config.on_fetch_error == FetchErrorPolicy::Clear {
                    self.state.replace_items(Vec::new());
                }
                if let Some(handler) = &self.options.on_error {
                    handler(&error);
                }
                CompletionOutcome::Failed { epoch, error }
            }
        }
    }

    /// Apply every completion that has already arrived, without waiting.
    pub fn poll_completions(&mut self) -> Vec<CompletionOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(completion) = self.completions_rx.try_recv() {
            outcomes.push(self.apply_completion(completion));
        }
        outcomes
    }

    /// Wait for the next completion, stale or not, and apply it.
    pub async fn next_completion(&mut self) -> Option<CompletionOutcome> {
        let completion = self.completions_rx.recv().await?;
        Some(self.apply_completion(completion))
    }

    /// Wait until the current fetch, if any, has landed.
    ///
    /// A source that panics or times out lands as a failure. One that never
    /// answers, with no `fetch_timeout_ms` set, keeps this pending.
    pub async fn settle(&mut self) {
        while self.state.loading {
            if self.next_completion().await.is_none() {
                break;
            }
        }
    }

    /// Move the selection up or down, wrapping around.
    pub fn on_navigate(&mut self, direction: Direction) {
        self.state.navigate(direction);
        trace!(?direction, selected = self.state.selected_index, "navigate");
    }

    /// Pointer moved over item `index`. Out-of-range indices are ignored.
    pub fn on_hover(&mut self, index: usize) {
        self.state.select(index);
    }

    /// Submit key pressed: insert the selected candidate if the list is up.
    pub fn on_submit_intent(&mut self) -> SubmitOutcome {
        if !self.state.is_actionable() {
            return SubmitOutcome::unhandled();
        }
        let Some(name) = self.state.selected().map(|item| (self.options.display)(item)) else {
            return SubmitOutcome::unhandled();
        };

        // Re-derive the span from the text as it is now; the shown items
        // may have been fetched against older text.
        let Some(span) = locate(&self.text, self.boundary) else {
            self.span = None;
            self.state.clear();
            return SubmitOutcome::unhandled();
        };
        debug_assert!(span.is_valid_for(&self.text));

        match apply(&self.text, &span, &name) {
            Ok(replacement) => {
                debug!(mention = %name, cursor = replacement.cursor, "inserted mention");
                self.text.clone_from(&replacement.text);
                self.boundary = Some(replacement.cursor);
                self.span = None;
                self.state.bump_epoch();
                self.state.clear();
                SubmitOutcome {
                    handled: true,
                    replacement: Some(replacement),
                }
            }
            Err(err) => {
                error!("refusing to insert mention: {err}");
                SubmitOutcome::unhandled()
            }
        }
    }

    /// Renderer activated item `index` (click or tap).
    pub fn select_item(&mut self, index: usize) -> SubmitOutcome {
        if !self.state.select(index) {
            return SubmitOutcome::unhandled();
        }
        self.on_submit_intent()
    }

    /// Hide the list. Calling it again changes nothing.
    ///
    /// With `dismiss_cancels_fetch` the in-flight fetch is invalidated too,
    /// so a late result cannot bring the list back.
    pub fn on_dismiss(&mut self) {
        self.state.visible = false;
        if self.options.config.dismiss_cancels_fetch && self.state.loading {
            let epoch = self.state.bump_epoch();
            self.state.loading = false;
            trace!(epoch, "dismiss invalidated in-flight fetch");
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

impl<T: Send + 'static> Drop for SuggestionCoordinator<T> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl<T: Send + 'static> fmt::Debug for SuggestionCoordinator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuggestionCoordinator")
            .field("text", &self.text)
            .field("span", &self.span)
            .field("boundary", &self.boundary)
            .field("items", &self.state.items.len())
            .field("selected_index", &self.state.selected_index)
            .field("visible", &self.state.visible)
            .field("loading", &self.state.loading)
            .field("epoch", &self.state.epoch)
            .finish()
    }
}
