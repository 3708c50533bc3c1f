//! Suggestion list state
//!
//! All flags the renderer cares about live in one record so transitions are
//! explicit methods instead of scattered field edits.

/// Navigation intent from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Coarse lifecycle of the suggestion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No active mention, nothing shown
    Idle,
    /// A fetch for the active mention is in flight
    Fetching,
    /// Items from the latest fetch are on screen
    Showing,
}

/// Items, selection and flags of the suggestion list.
///
/// `items` keeps the exact order the source returned. `selected_index` is
/// reset to 0 whenever `items` is replaced and always indexes into `items`
/// when the list is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionState<T> {
    pub(crate) items: Vec<T>,
    pub(crate) selected_index: usize,
    pub(crate) visible: bool,
    pub(crate) loading: bool,
    pub(crate) epoch: u64,
}

impl<T> Default for SuggestionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected_index: 0,
            visible: false,
            loading: false,
            epoch: 0,
        }
    }
}

impl<T> SuggestionState<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected(&self) -> Option<&T> {
        self.items.get(self.selected_index)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current request epoch. Results tagged with any other epoch are stale.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Fetching
        } else if self.visible {
            Phase::Showing
        } else {
            Phase::Idle
        }
    }

    /// True when the list is on screen and has something to pick.
    pub fn is_actionable(&self) -> bool {
        self.visible && !self.items.is_empty()
    }

    /// Invalidate every outstanding fetch and return the new epoch.
    pub(crate) fn bump_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    /// Replace the items and reset the selection.
    pub(crate) fn replace_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.selected_index = 0;
    }

    /// Back to idle: hidden, empty, not loading. The epoch is kept.
    pub(crate) fn clear(&mut self) {
        self.items.clear();
        self.selected_index = 0;
        self.visible = false;
        self.loading = false;
    }

    /// Move the selection one step, wrapping at both ends.
    ///
    /// No-op unless the list is visible and non-empty.
    pub(crate) fn navigate(&mut self, direction: Direction) {
        if !self.is_actionable() {
            return;
        }
        let len = self.items.len();
        self.selected_index = match direction {
            Direction::Next => (self.selected_index + 1) % len,
            Direction::Previous => (self.selected_index + len - 1) % len,
        };
    }

    /// Select `index` if it points at an item. Returns whether it did.
    pub(crate) fn select(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.selected_index = index;
            true
        } else {
            false
        }
    }
}
