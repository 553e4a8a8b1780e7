use crate::error::{CoreError, Result};
use crate::history::Snapshot;
use crate::sanitize;
use crate::types::*;
use serde::Serialize;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Authoritative editing state for one session.
///
/// Fields are read through accessors; every write goes through the
/// crate-private mutators below, which the command engine drives.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Timeline {
    elements: Vec<Element>,
    selected_ids: BTreeSet<Uuid>,
    current_time: f64,
    settings: CompositionSettings,
    zoom: f64,
    scroll_offset: f64,
    is_playing: bool,
}

impl Timeline {
    pub fn new(settings: CompositionSettings, zoom: f64) -> Self {
        let settings = CompositionSettings {
            fps: settings.fps.max(1),
            ..settings
        };
        Self {
            elements: vec![],
            selected_ids: BTreeSet::new(),
            current_time: 0.0,
            settings,
            zoom: if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 },
            scroll_offset: 0.0,
            is_playing: false,
        }
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Elements in insertion order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn selected_ids(&self) -> &BTreeSet<Uuid> {
        &self.selected_ids
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn settings(&self) -> &CompositionSettings {
        &self.settings
    }

    pub fn fps(&self) -> u32 {
        self.settings.fps
    }

    /// Pixels per second.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Max `position_end` over all elements, 0 when empty. Always derived.
    pub fn duration(&self) -> f64 {
        self.elements
            .iter()
            .map(|e| e.position_end())
            .fold(0.0, f64::max)
    }

    pub fn element(&self, id: Uuid) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.element(id).is_some()
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selected_ids.contains(&id)
    }

    /// Selected elements in insertion order.
    pub fn selected_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(move |e| self.selected_ids.contains(&e.id()))
    }

    /// The only selected id, if exactly one element is selected.
    pub fn single_selection(&self) -> Option<Uuid> {
        if self.selected_ids.len() == 1 {
            self.selected_ids.iter().next().copied()
        } else {
            None
        }
    }

    pub fn max_z_index(&self) -> Option<i64> {
        self.elements.iter().map(|e| e.z_index()).max()
    }

    pub fn min_z_index(&self) -> Option<i64> {
        self.elements.iter().map(|e| e.z_index()).min()
    }

    /// z-index for an element placed on top of everything.
    pub fn next_z_index(&self) -> i64 {
        self.max_z_index().map_or(0, |z| z + 1)
    }

    // -----------------------------------------------------------------------
    // Element mutations
    // -----------------------------------------------------------------------

    pub(crate) fn push_element(&mut self, mut element: Element) {
        sanitize::normalize_element(&mut element);
        self.elements.push(element);
    }

    /// Apply `f` to the element, then re-establish its invariants.
    pub(crate) fn modify_element<F>(&mut self, id: Uuid, f: F) -> Result<()>
    where
        F: FnOnce(&mut Element) -> Result<()>,
    {
        let element = self
            .elements
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(CoreError::ElementNotFound(id))?;
        f(element)?;
        sanitize::normalize_element(element);
        Ok(())
    }

    pub(crate) fn remove_element(&mut self, id: Uuid) -> Result<Element> {
        let pos = self
            .elements
            .iter()
            .position(|e| e.id() == id)
            .ok_or(CoreError::ElementNotFound(id))?;
        self.selected_ids.remove(&id);
        Ok(self.elements.remove(pos))
    }

    /// Remove every selected element. Returns how many were removed.
    pub(crate) fn remove_selected(&mut self) -> Result<usize> {
        if self.selected_ids.is_empty() {
            return Err(CoreError::InvalidOperation("selection is empty".into()));
        }
        let before = self.elements.len();
        let selected = std::mem::take(&mut self.selected_ids);
        self.elements.retain(|e| !selected.contains(&e.id()));
        Ok(before - self.elements.len())
    }

    /// Split an element at a timeline position strictly inside it.
    /// The left half keeps `id`; the right half gets `right_id` and is
    /// inserted directly after the left one. Returns `right_id`.
    pub(crate) fn split_element(&mut self, id: Uuid, at: f64, right_id: Uuid) -> Result<Uuid> {
        let pos = self
            .elements
            .iter()
            .position(|e| e.id() == id)
            .ok_or(CoreError::ElementNotFound(id))?;

        let original = &self.elements[pos];
        let placement = original.placement();
        if !at.is_finite() || !placement.strictly_contains(at) {
            return Err(CoreError::InvalidOperation(
                "split position must be strictly between element start and end".into(),
            ));
        }
        if at - placement.position_start <= 0.0 || placement.position_end - at <= 0.0 {
            return Err(CoreError::InvalidOperation("split leaves an empty segment".into()));
        }

        let mut left = original.clone();
        let mut right = original.clone();
        right.set_id(right_id);
        left.placement_mut().position_end = at;
        right.placement_mut().position_start = at;

        if let (Some(lt), Some(rt)) = (left.source_mut(), right.source_mut()) {
            let offset = at - placement.position_start;
            let split_source = lt.start_time + offset * lt.playback_speed;
            if split_source <= lt.start_time || split_source >= rt.end_time {
                return Err(CoreError::InvalidOperation(
                    "split leaves an empty trim window".into(),
                ));
            }
            lt.end_time = split_source;
            rt.start_time = split_source;
        }

        self.elements[pos] = left;
        self.elements.insert(pos + 1, right);
        Ok(right_id)
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub(crate) fn select(&mut self, id: Uuid, additive: bool) -> Result<()> {
        if !self.contains(id) {
            return Err(CoreError::ElementNotFound(id));
        }
        if !additive {
            self.selected_ids.clear();
        }
        self.selected_ids.insert(id);
        Ok(())
    }

    pub(crate) fn toggle_selected(&mut self, id: Uuid) -> Result<()> {
        if !self.contains(id) {
            return Err(CoreError::ElementNotFound(id));
        }
        if !self.selected_ids.remove(&id) {
            self.selected_ids.insert(id);
        }
        Ok(())
    }

    pub(crate) fn set_selection(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        self.selected_ids = ids.into_iter().filter(|id| self.contains(*id)).collect();
    }

    pub(crate) fn select_all(&mut self) {
        self.selected_ids = self.elements.iter().map(|e| e.id()).collect();
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected_ids.clear();
    }

    // -----------------------------------------------------------------------
    // Transport and viewport
    // -----------------------------------------------------------------------

    /// Clamp into `[0, duration]`. NaN keeps the current time.
    pub(crate) fn set_current_time(&mut self, t: f64) {
        let t = sanitize::finite_or(t, self.current_time);
        self.current_time = t.clamp(0.0, self.duration());
    }

    /// Re-clamp the playhead after the duration may have shrunk.
    pub(crate) fn clamp_playhead(&mut self) {
        self.set_current_time(self.current_time);
    }

    pub(crate) fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    pub(crate) fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        }
    }

    pub(crate) fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = sanitize::non_negative(offset, self.scroll_offset);
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    pub(crate) fn restore(&mut self, snapshot: &Snapshot) {
        self.elements = snapshot.elements.clone();
        self.selected_ids = snapshot.selected_ids.clone();
        self.current_time = snapshot.current_time;
        self.clamp_playhead();
    }
}
