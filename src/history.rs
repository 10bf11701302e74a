//! Snapshot history (undo/redo) for the text engine
//!
//! Both stacks hold full copies of the buffer. The oldest snapshot is evicted
//! first once a stack grows past `max_size`.

use std::collections::VecDeque;

/// Default number of snapshots kept per stack
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Undo/redo stacks over full-buffer snapshots
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<String>,
    redo_stack: VecDeque<String>,
    max_size: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create a new history with the default max size
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_HISTORY)
    }

    /// Create a new history with specified max size (at least 1)
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_size: max_size.max(1),
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Push a snapshot onto the undo stack.
    ///
    /// A snapshot equal to the current top is ignored. Returns whether the
    /// snapshot was stored.
    pub fn push_undo(&mut self, snapshot: &str) -> bool {
        if self.undo_stack.back().is_some_and(|top| top == snapshot) {
            tracing::debug!("Skipping duplicate undo snapshot");
            return false;
        }
        push_bounded(&mut self.undo_stack, snapshot.to_string(), self.max_size);
        true
    }

    /// Pop the latest undo snapshot, saving `current` for redo
    pub fn undo(&mut self, current: &str) -> Option<String> {
        let snapshot = self.undo_stack.pop_back()?;
        push_bounded(&mut self.redo_stack, current.to_string(), self.max_size);
        Some(snapshot)
    }

    /// Pop the latest redo snapshot, saving `current` for undo
    pub fn redo(&mut self, current: &str) -> Option<String> {
        let snapshot = self.redo_stack.pop_back()?;
        push_bounded(&mut self.undo_stack, current.to_string(), self.max_size);
        Some(snapshot)
    }

    /// Drop every redo snapshot (called after a fresh edit)
    pub fn clear_redo(&mut self) {
        self.redo_stack.clear();
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of snapshots in the undo stack
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of snapshots in the redo stack
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

fn push_bounded(stack: &mut VecDeque<String>, snapshot: String, max_size: usize) {
    stack.push_back(snapshot);
    while stack.len() > max_size {
        stack.pop_front();
    }
}
