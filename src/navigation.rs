use tokio::sync::watch;
use tracing::debug;

use crate::types::Event;

/// What a display region binds to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub selected: Option<Event>,
    pub selected_index: usize,
    pub count: usize,
}

/// The fetched events plus a cursor into them.
///
/// Only the owner (the UI context) can mutate it, since every operation
/// takes `&mut self`. Everyone else observes through [`subscribe`], which
/// yields a fresh [`Selection`] after each change. Navigation saturates at
/// both ends and is a no-op on an empty list; no-ops do not notify.
///
/// [`subscribe`]: NavigationState::subscribe
#[derive(Debug)]
pub struct NavigationState {
    events: Vec<Event>,
    selected_index: usize,
    observers: watch::Sender<Selection>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationState {
    pub fn new() -> Self {
        let (observers, _) = watch::channel(Selection::default());
        Self {
            events: Vec::new(),
            selected_index: 0,
            observers,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Selection> {
        self.observers.subscribe()
    }

    /// Replaces the whole list and goes back to the first event.
    pub fn set_events(&mut self, events: Vec<Event>) {
        debug!(count = events.len(), "set events");
        self.events = events;
        self.selected_index = 0;
        self.notify();
    }

    pub fn move_next(&mut self) -> bool {
        if self.selected_index + 1 < self.events.len() {
            self.select(self.selected_index + 1)
        } else {
            false
        }
    }

    pub fn move_previous(&mut self) -> bool {
        if self.selected_index > 0 {
            self.select(self.selected_index - 1)
        } else {
            false
        }
    }

    /// Out-of-range indices are ignored.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index < self.events.len() {
            self.select(index)
        } else {
            false
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn selected(&self) -> Option<&Event> {
        self.events.get(self.selected_index)
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn selection(&self) -> Selection {
        Selection {
            selected: self.selected().cloned(),
            selected_index: self.selected_index,
            count: self.events.len(),
        }
    }

    fn select(&mut self, index: usize) -> bool {
        if index == self.selected_index {
            return false;
        }
        self.selected_index = index;
        self.notify();
        true
    }

    fn notify(&self) {
        // send_replace works without receivers
        self.observers.send_replace(self.selection());
    }
}
