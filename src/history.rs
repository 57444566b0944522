//! Bounded undo/redo over document edits.
//!
//! Each committed gesture is recorded as a [`Command`] carrying everything
//! needed to apply it in either direction. The canvas is never snapshotted
//! here; callers re-render the document after an undo or redo.

use crate::draw::{Document, DrawableObject};

/// Default number of undoable steps kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A reversible edit to the [`Document`].
#[derive(Debug, Clone)]
pub enum Command {
    /// An object was appended on top of the log.
    Add(DrawableObject),
    /// The object at `index` changed from `before` to `after` (e.g. dragged).
    Replace {
        index: usize,
        before: DrawableObject,
        after: DrawableObject,
    },
    /// The whole log was emptied; `removed` holds what was there.
    Clear { removed: Vec<DrawableObject> },
}

impl Command {
    fn apply(&self, document: &mut Document) {
        match self {
            Command::Add(object) => document.push(object.clone()),
            Command::Replace { index, after, .. } => {
                if document.replace(*index, after.clone()).is_none() {
                    log::warn!("Redo skipped: no object at index {index}");
                }
            }
            Command::Clear { .. } => {
                document.clear();
            }
        }
    }

    fn revert(&self, document: &mut Document) {
        match self {
            Command::Add(_) => {
                document.pop();
            }
            Command::Replace { index, before, .. } => {
                if document.replace(*index, before.clone()).is_none() {
                    log::warn!("Undo skipped: no object at index {index}");
                }
            }
            Command::Clear { removed } => document.restore(removed.clone()),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Command::Add(_) => "add",
            Command::Replace { .. } => "replace",
            Command::Clear { .. } => "clear",
        }
    }
}

/// Command log with a cursor.
///
/// `step` counts how many entries are currently applied: entries before it
/// can be undone, entries from it onward can be redone.
#[derive(Debug)]
pub struct History {
    entries: Vec<Command>,
    step: usize,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Creates an empty history keeping at most `limit` entries (minimum 1).
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            step: 0,
            limit: limit.max(1),
        }
    }

    /// Records a command that has already been applied to the document.
    ///
    /// Discards the redo branch, then evicts the oldest entry if over the limit.
    pub fn record(&mut self, command: Command) {
        if self.step < self.entries.len() {
            log::debug!(
                "Discarding {} redo entries",
                self.entries.len() - self.step
            );
            self.entries.truncate(self.step);
        }

        log::debug!("History: recorded {}", command.label());
        self.entries.push(command);
        self.step += 1;

        if self.entries.len() > self.limit {
            self.entries.remove(0);
            self.step -= 1;
        }
    }

    /// Reverts the most recently applied command. Returns false at the start of history.
    pub fn undo(&mut self, document: &mut Document) -> bool {
        if self.step == 0 {
            return false;
        }
        self.step -= 1;
        let command = &self.entries[self.step];
        log::debug!("Undo {}", command.label());
        command.revert(document);
        true
    }

    /// Reapplies the next undone command. Returns false when nothing is left to redo.
    pub fn redo(&mut self, document: &mut Document) -> bool {
        let Some(command) = self.entries.get(self.step) else {
            return false;
        };
        log::debug!("Redo {}", command.label());
        command.apply(document);
        self.step += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.step > 0
    }

    pub fn can_redo(&self) -> bool {
        self.step < self.entries.len()
    }

    /// Number of recorded entries (applied and undone).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor position: how many entries are currently applied.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::RED;
    use crate::util::Point;

    fn stroke(i: usize) -> DrawableObject {
        let y = i as f64;
        DrawableObject::stroke(vec![Point::new(0.0, y), Point::new(10.0, y)], RED, 2.0)
    }

    fn commit(history: &mut History, document: &mut Document, object: DrawableObject) {
        document.push(object.clone());
        history.record(Command::Add(object));
    }

    #[test]
    fn cap_evicts_oldest_and_keeps_cursor_at_top() {
        let mut history = History::default();
        let mut document = Document::new();
        for i in 0..60 {
            commit(&mut history, &mut document, stroke(i));
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.step(), 50);
        assert!(!history.can_redo());

        for _ in 0..50 {
            assert!(history.undo(&mut document));
        }
        assert!(!history.undo(&mut document));
        // The 10 evicted commits can no longer be undone.
        assert_eq!(document.len(), 10);
    }

    #[test]
    fn new_commit_discards_redo_branch() {
        let mut history = History::default();
        let mut document = Document::new();
        commit(&mut history, &mut document, stroke(1));
        commit(&mut history, &mut document, stroke(2));

        assert!(history.undo(&mut document));
        commit(&mut history, &mut document, stroke(3));

        assert!(!history.redo(&mut document));
        assert_eq!(history.len(), 2);
        assert_eq!(document.len(), 2);
    }

    #[test]
    fn boundaries_are_no_ops() {
        let mut history = History::default();
        let mut document = Document::new();
        assert!(!history.undo(&mut document));
        assert!(!history.redo(&mut document));
        assert_eq!(history.step(), 0);
    }

    #[test]
    fn replace_and_clear_round_trip() {
        let mut history = History::default();
        let mut document = Document::new();
        commit(&mut history, &mut document, stroke(1));

        let before = document.get(0).unwrap().clone();
        let after = before.translated(20.0, 5.0);
        document.replace(0, after.clone());
        history.record(Command::Replace {
            index: 0,
            before: before.clone(),
            after: after.clone(),
        });

        let removed = document.clear();
        history.record(Command::Clear { removed });
        assert!(document.is_empty());

        assert!(history.undo(&mut document));
        assert_eq!(document.get(0).unwrap().bounds(), after.bounds());
        assert!(history.undo(&mut document));
        assert_eq!(document.get(0).unwrap().bounds(), before.bounds());

        assert!(history.redo(&mut document));
        assert!(history.redo(&mut document));
        assert!(document.is_empty());
    }

    #[test]
    fn limit_is_at_least_one() {
        let mut history = History::new(0);
        let mut document = Document::new();
        commit(&mut history, &mut document, stroke(1));
        commit(&mut history, &mut document, stroke(2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.limit(), 1);
    }
}
