use std::collections::VecDeque;

use crate::{foundation::config::DEFAULT_HISTORY_CAP, scenegraph::model::Play};

/// Editor state captured before a mutation.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Full document.
    pub play: Play,
    /// Scene the editor had selected, if any.
    pub selected_scene_id: Option<String>,
}

impl Snapshot {
    /// Capture a document and selection.
    pub fn new(play: Play, selected_scene_id: Option<String>) -> Self {
        Self {
            play,
            selected_scene_id,
        }
    }
}

/// Bounded undo/redo history.
///
/// `past` holds states older than the caller's current one, oldest first. `future` holds
/// undone states, the next redo target first. Both sides are capped; when a push would
/// overflow, the entry farthest from the present is dropped.
#[derive(Clone, Debug)]
pub struct HistoryStack<T = Snapshot> {
    past: VecDeque<T>,
    future: VecDeque<T>,
    cap: usize,
}

impl<T> Default for HistoryStack<T> {
    fn default() -> Self {
        Self::with_cap(DEFAULT_HISTORY_CAP)
    }
}

impl<T> HistoryStack<T> {
    /// An empty history with the default cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cap of zero is treated as one.
    pub fn with_cap(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            past: VecDeque::with_capacity(cap.min(DEFAULT_HISTORY_CAP)),
            future: VecDeque::new(),
            cap,
        }
    }

    /// Maximum entries per side.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Record `snapshot` (the state before a mutation) and forget everything undone.
    pub fn push_snapshot(&mut self, snapshot: T) {
        self.past.push_back(snapshot);
        if self.past.len() > self.cap {
            self.past.pop_front();
        }
        self.future.clear();
        tracing::debug!(past = self.past.len(), "history snapshot pushed");
    }

    /// Step back. `current` moves to the redo side and the most recent snapshot is
    /// returned; `None` (with `current` dropped) when there is nothing to undo.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let prev = self.past.pop_back()?;
        self.future.push_front(current);
        if self.future.len() > self.cap {
            self.future.pop_back();
        }
        Some(prev)
    }

    /// Step forward. `current` moves back to the undo side.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.future.pop_front()?;
        self.past.push_back(current);
        if self.past.len() > self.cap {
            self.past.pop_front();
        }
        Some(next)
    }

    /// Whether [`HistoryStack::undo`] has anything to return.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Whether [`HistoryStack::redo`] has anything to return.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo targets.
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    /// Number of redo targets.
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Undo targets, oldest first.
    pub fn past(&self) -> impl Iterator<Item = &T> {
        self.past.iter()
    }

    /// Redo targets, next redo first.
    pub fn future(&self) -> impl Iterator<Item = &T> {
        self.future.iter()
    }

    /// Drop both sides, e.g. after loading a different document.
    pub fn reset(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/stack.rs"]
mod tests;
