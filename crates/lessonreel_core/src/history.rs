use crate::error::{CoreError, Result};
use crate::timeline::Timeline;
use crate::types::Element;
use serde::Serialize;
use std::collections::BTreeSet;
use uuid::Uuid;

/// The document part of the timeline: what undo/redo restores.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Snapshot {
    pub(crate) elements: Vec<Element>,
    pub(crate) selected_ids: BTreeSet<Uuid>,
    pub(crate) current_time: f64,
}

impl Snapshot {
    pub fn capture(timeline: &Timeline) -> Self {
        Self {
            elements: timeline.elements().to_vec(),
            selected_ids: timeline.selected_ids().clone(),
            current_time: timeline.current_time(),
        }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn selected_ids(&self) -> &BTreeSet<Uuid> {
        &self.selected_ids
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }
}

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub label: String,
    pub snapshot: Snapshot,
}

/// Append-only arena of snapshots with a cursor.
///
/// `entries[index]` mirrors the live elements. Selection and playhead edits
/// are written back with `sync_view` before the cursor moves. Recording a
/// new entry drops everything after the cursor (the redo branch).
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
    max_size: usize,
}

impl History {
    pub fn new(initial: Snapshot, max_size: usize) -> Self {
        Self {
            entries: vec![HistoryEntry {
                label: "Initial state".to_string(),
                snapshot: initial,
            }],
            index: 0,
            max_size: max_size.max(1),
        }
    }

    /// Truncate the redo branch and append `snapshot` as the new current entry.
    pub fn record(&mut self, label: &str, snapshot: Snapshot) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry {
            label: label.to_string(),
            snapshot,
        });
        self.index = self.entries.len() - 1;

        while self.entries.len() > self.max_size {
            self.entries.remove(0);
            self.index -= 1;
        }

        tracing::debug!(label, index = self.index, len = self.entries.len(), "History recorded");
    }

    /// Selection and playhead edits are not entries of their own; they
    /// overwrite the current entry so stepping back to it restores them.
    pub(crate) fn sync_view(&mut self, selected_ids: &BTreeSet<Uuid>, current_time: f64) {
        let snapshot = &mut self.entries[self.index].snapshot;
        snapshot.selected_ids = selected_ids.clone();
        snapshot.current_time = current_time;
    }

    /// Step the cursor back and return the snapshot to restore.
    pub fn undo(&mut self) -> Result<&Snapshot> {
        if self.index == 0 {
            return Err(CoreError::NothingToUndo);
        }
        self.index -= 1;
        Ok(&self.entries[self.index].snapshot)
    }

    /// Step the cursor forward and return the snapshot to restore.
    pub fn redo(&mut self) -> Result<&Snapshot> {
        if self.index + 1 >= self.entries.len() {
            return Err(CoreError::NothingToRedo);
        }
        self.index += 1;
        Ok(&self.entries[self.index].snapshot)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn undo_description(&self) -> Option<&str> {
        if self.can_undo() {
            Some(self.entries[self.index].label.as_str())
        } else {
            None
        }
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.entries
            .get(self.index + 1)
            .map(|entry| entry.label.as_str())
    }

    pub fn current(&self) -> &Snapshot {
        &self.entries[self.index].snapshot
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    fn make_snapshot(count: usize) -> Snapshot {
        let elements = (0..count)
            .map(|i| Element::Text {
                id: Uuid::new_v4(),
                placement: Placement {
                    position_start: i as f64,
                    position_end: i as f64 + 1.0,
                    z_index: i as i64,
                    opacity: 100.0,
                },
                transform: Transform::default(),
                text: format!("fact {i}"),
                style: TextStyle::default(),
                animation: TextAnimation::None,
                animation_duration: 0.0,
            })
            .collect();
        Snapshot {
            elements,
            selected_ids: BTreeSet::new(),
            current_time: 0.0,
        }
    }

    // -----------------------------------------------------------------------
    // record / undo / redo
    // -----------------------------------------------------------------------

    #[test]
    fn record_undo_redo() {
        let mut history = History::new(make_snapshot(0), 100);
        let one = make_snapshot(1);
        history.record("Add text", one.clone());
        assert_eq!(history.len(), 2);
        assert_eq!(history.index(), 1);

        let restored = history.undo().unwrap();
        assert!(restored.elements().is_empty());

        let restored = history.redo().unwrap();
        assert_eq!(restored, &one);
    }

    #[test]
    fn new_record_truncates_redo_branch() {
        let mut history = History::new(make_snapshot(0), 100);
        history.record("Add text", make_snapshot(1));
        history.record("Add text", make_snapshot(2));
        history.undo().unwrap();
        history.undo().unwrap();
        assert!(history.can_redo());

        history.record("Add media", make_snapshot(3));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        assert_eq!(history.current().elements().len(), 3);
    }

    #[test]
    fn sync_view_rewrites_current_entry_only() {
        let mut history = History::new(make_snapshot(0), 100);
        let one = make_snapshot(1);
        let id = one.elements()[0].id();
        history.record("Add text", one);

        history.sync_view(&BTreeSet::from([id]), 0.75);
        assert!(history.current().selected_ids().contains(&id));
        assert_eq!(history.current().current_time(), 0.75);

        let previous = history.undo().unwrap();
        assert!(previous.selected_ids().is_empty());
        assert_eq!(previous.current_time(), 0.0);
    }

    #[test]
    fn undo_at_start_errors() {
        let mut history = History::new(make_snapshot(0), 100);
        let result = history.undo();
        assert!(matches!(result.unwrap_err(), CoreError::NothingToUndo));
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn redo_at_end_errors() {
        let mut history = History::new(make_snapshot(0), 100);
        history.record("Add text", make_snapshot(1));
        let result = history.redo();
        assert!(matches!(result.unwrap_err(), CoreError::NothingToRedo));
        assert_eq!(history.index(), 1);
    }

    // -----------------------------------------------------------------------
    // max_size
    // -----------------------------------------------------------------------

    #[test]
    fn max_size_drops_oldest_and_keeps_index_valid() {
        let mut history = History::new(make_snapshot(0), 3);
        for i in 1..=5 {
            history.record("Add text", make_snapshot(i));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        assert!(history.index() < history.len());

        assert!(history.undo().is_ok());
        assert!(history.undo().is_ok());
        assert!(history.undo().is_err());
        assert_eq!(history.current().elements().len(), 3);
    }

    #[test]
    fn zero_max_size_still_holds_current() {
        let mut history = History::new(make_snapshot(0), 0);
        history.record("Add text", make_snapshot(1));
        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), 0);
        assert!(!history.can_undo());
    }

    // -----------------------------------------------------------------------
    // flags and descriptions
    // -----------------------------------------------------------------------

    #[test]
    fn can_undo_can_redo_flags() {
        let mut history = History::new(make_snapshot(0), 100);
        assert!(!history.can_undo());
        assert!(!history.can_redo());

        history.record("Add text", make_snapshot(1));
        assert!(history.can_undo());
        assert!(!history.can_redo());

        history.undo().unwrap();
        assert!(!history.can_undo());
        assert!(history.can_redo());
    }

    #[test]
    fn description_methods() {
        let mut history = History::new(make_snapshot(0), 100);
        assert_eq!(history.undo_description(), None);
        assert_eq!(history.redo_description(), None);

        history.record("Split element", make_snapshot(2));
        assert_eq!(history.undo_description(), Some("Split element"));

        history.undo().unwrap();
        assert_eq!(history.undo_description(), None);
        assert_eq!(history.redo_description(), Some("Split element"));
    }
}
