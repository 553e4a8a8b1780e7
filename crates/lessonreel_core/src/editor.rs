use crate::commands::*;
use crate::config::EditorConfig;
use crate::history::{History, Snapshot};
use crate::timeline::Timeline;
use crate::types::*;
use uuid::Uuid;

/// The command engine and the only writer of a [`Timeline`]. Every public
/// operation either succeeds or degrades to a logged no-op.
#[derive(Debug, Clone)]
pub struct Editor {
    timeline: Timeline,
    history: History,
    clipboard: Vec<Element>,
    config: EditorConfig,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let timeline = Timeline::new(config.composition.clone(), config.zoom.initial);
        let history = History::new(Snapshot::capture(&timeline), config.history_limit);
        tracing::debug!(
            width = timeline.settings().width,
            height = timeline.settings().height,
            fps = timeline.fps(),
            "Editor created"
        );
        Self {
            timeline,
            history,
            clipboard: vec![],
            config,
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clipboard(&self) -> &[Element] {
        &self.clipboard
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Apply `command` to a scratch copy of the timeline. On success the copy
    /// becomes the live timeline and a snapshot is recorded; on failure the
    /// live timeline is untouched and nothing is recorded.
    pub fn execute(&mut self, command: &dyn Command) -> bool {
        let mut next = self.timeline.clone();
        match command.apply(&mut next, &self.config) {
            Ok(()) => {
                next.clamp_playhead();
                self.sync_history_view();
                self.timeline = next;
                self.history
                    .record(command.description(), Snapshot::capture(&self.timeline));
                tracing::debug!(
                    command = command.description(),
                    elements = self.timeline.elements().len(),
                    duration = self.timeline.duration(),
                    "Command applied"
                );
                true
            }
            Err(e) => {
                tracing::debug!(command = command.description(), error = %e, "Command rejected");
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Element commands
    // -----------------------------------------------------------------------

    pub fn add_media(&mut self, spec: MediaSpec) -> Option<Uuid> {
        let command = AddMediaCommand::new(spec);
        self.execute(&command).then(|| command.id())
    }

    pub fn add_text(&mut self, spec: TextSpec) -> Option<Uuid> {
        let command = AddTextCommand::new(spec);
        self.execute(&command).then(|| command.id())
    }

    pub fn update_media(&mut self, id: Uuid, patch: MediaPatch) -> bool {
        self.execute(&UpdateMediaCommand::new(id, patch))
    }

    pub fn update_text(&mut self, id: Uuid, patch: TextPatch) -> bool {
        self.execute(&UpdateTextCommand::new(id, patch))
    }

    pub fn delete_selected(&mut self) -> bool {
        self.execute(&DeleteSelectedCommand::new())
    }

    /// Split `id` at timeline position `at`. Requires exactly one selected
    /// element; returns the id of the new right half.
    pub fn split_media(&mut self, id: Uuid, at: f64) -> Option<Uuid> {
        let command = SplitCommand::new(id, at);
        self.execute(&command).then(|| command.right_id())
    }

    /// Split the single selected element at the playhead.
    pub fn split_at_playhead(&mut self) -> Option<Uuid> {
        let id = self.timeline.single_selection()?;
        self.split_media(id, self.timeline.current_time())
    }

    pub fn move_element(&mut self, id: Uuid, new_start: f64, snap: bool) -> bool {
        self.execute(&MoveElementCommand::new(id, new_start, snap))
    }

    pub fn move_selected(&mut self, delta: f64) -> bool {
        self.execute(&MoveSelectedCommand::new(delta))
    }

    pub fn bring_to_front(&mut self, id: Uuid) -> bool {
        self.execute(&ReorderCommand::new(id, ZOrder::Front))
    }

    pub fn send_to_back(&mut self, id: Uuid) -> bool {
        self.execute(&ReorderCommand::new(id, ZOrder::Back))
    }

    // -----------------------------------------------------------------------
    // Clipboard
    // -----------------------------------------------------------------------

    /// Copy the selected elements, in insertion order, into the clipboard.
    /// Returns how many were copied; an empty selection leaves the clipboard alone.
    pub fn copy(&mut self) -> usize {
        let copied: Vec<Element> = self.timeline.selected_elements().cloned().collect();
        if copied.is_empty() {
            tracing::debug!("Copy ignored: selection is empty");
            return 0;
        }
        self.clipboard = copied;
        tracing::debug!(count = self.clipboard.len(), "Copied to clipboard");
        self.clipboard.len()
    }

    pub fn cut(&mut self) -> bool {
        if self.copy() == 0 {
            return false;
        }
        self.execute(&DeleteSelectedCommand::cut())
    }

    /// Insert fresh clones of the clipboard anchored at the playhead.
    /// Returns the new ids, which also become the selection.
    pub fn paste(&mut self) -> Vec<Uuid> {
        if self.clipboard.is_empty() {
            tracing::debug!("Paste ignored: clipboard is empty");
            return vec![];
        }
        let command = PasteCommand::new(self.clipboard.clone());
        if self.execute(&command) {
            command.new_ids().to_vec()
        } else {
            vec![]
        }
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Write the live selection and playhead into the current entry so
    /// stepping back to it later returns them unchanged.
    fn sync_history_view(&mut self) {
        self.history
            .sync_view(self.timeline.selected_ids(), self.timeline.current_time());
    }

    pub fn undo(&mut self) -> bool {
        self.sync_history_view();
        match self.history.undo() {
            Ok(snapshot) => {
                self.timeline.restore(snapshot);
                tracing::debug!(index = self.history.index(), "Undo");
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "Undo ignored");
                false
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        self.sync_history_view();
        match self.history.redo() {
            Ok(snapshot) => {
                self.timeline.restore(snapshot);
                tracing::debug!(index = self.history.index(), "Redo");
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "Redo ignored");
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -----------------------------------------------------------------------
    // Selection (not recorded as history)
    // -----------------------------------------------------------------------

    pub fn select(&mut self, id: Uuid, additive: bool) -> bool {
        self.timeline.select(id, additive).is_ok()
    }

    pub fn toggle_selection(&mut self, id: Uuid) -> bool {
        self.timeline.toggle_selected(id).is_ok()
    }

    pub fn select_all(&mut self) {
        self.timeline.select_all();
    }

    pub fn clear_selection(&mut self) {
        self.timeline.clear_selection();
    }

    // -----------------------------------------------------------------------
    // Viewport
    // -----------------------------------------------------------------------

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.config.zoom.min).min(self.config.zoom.max)
    }

    pub fn zoom_in(&mut self) {
        let zoom = self.clamp_zoom(self.timeline.zoom() * self.config.zoom.step);
        self.timeline.set_zoom(zoom);
    }

    pub fn zoom_out(&mut self) {
        let zoom = self.clamp_zoom(self.timeline.zoom() / self.config.zoom.step);
        self.timeline.set_zoom(zoom);
    }

    /// Fit the whole duration into `viewport_width` pixels. Only the upper
    /// zoom bound applies, so the fitted timeline never overflows the viewport.
    pub fn zoom_to_fit(&mut self, viewport_width: f64) -> bool {
        if !(viewport_width.is_finite() && viewport_width > 0.0) {
            tracing::debug!(viewport_width, "Zoom to fit ignored: bad viewport width");
            return false;
        }
        let zoom = viewport_width / self.timeline.duration().max(MIN_SPAN);
        self.timeline.set_zoom(zoom.min(self.config.zoom.max));
        true
    }

    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.timeline.set_scroll_offset(offset);
    }

    // -----------------------------------------------------------------------
    // Transport
    // -----------------------------------------------------------------------

    /// Move the playhead, clamped into `[0, duration]`.
    pub fn set_current_time(&mut self, t: f64) {
        self.timeline.set_current_time(t);
    }

    pub fn seek_by(&mut self, delta: f64) {
        if delta.is_finite() {
            self.timeline
                .set_current_time(self.timeline.current_time() + delta);
        }
    }

    pub fn jump_to_start(&mut self) {
        self.timeline.set_current_time(0.0);
    }

    pub fn jump_to_end(&mut self) {
        self.timeline.set_current_time(self.timeline.duration());
    }

    pub fn toggle_play_pause(&mut self) {
        if self.timeline.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Start playback. A playhead parked at the end rewinds to zero first.
    pub fn play(&mut self) {
        let duration = self.timeline.duration();
        if duration > 0.0 && self.timeline.current_time() >= duration {
            self.timeline.set_current_time(0.0);
        }
        self.timeline.set_playing(true);
        tracing::debug!(time = self.timeline.current_time(), "Playback started");
    }

    pub fn pause(&mut self) {
        if self.timeline.is_playing() {
            self.timeline.set_playing(false);
            tracing::debug!(time = self.timeline.current_time(), "Playback paused");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
