use crate::config::EditorConfig;
use crate::error::{CoreError, Result};
use crate::sanitize;
use crate::snapping;
use crate::timeline::Timeline;
use crate::types::*;
use uuid::Uuid;

/// Animation length used when a text animation is requested without one.
pub const DEFAULT_ANIMATION_DURATION: f64 = 0.5;

/// A history-producing edit. `apply` either succeeds, leaving every element
/// invariant intact, or returns an error and is discarded by the editor.
pub trait Command: std::fmt::Debug {
    fn apply(&self, timeline: &mut Timeline, config: &EditorConfig) -> Result<()>;
    fn description(&self) -> &str;
}

// ---------------------------------------------------------------------------
// AddMediaCommand
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AddMediaCommand {
    id: Uuid,
    spec: MediaSpec,
}

impl AddMediaCommand {
    pub fn new(spec: MediaSpec) -> Self {
        Self {
            id: Uuid::new_v4(),
            spec,
        }
    }

    /// Id the element receives once applied.
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Command for AddMediaCommand {
    fn apply(&self, timeline: &mut Timeline, config: &EditorConfig) -> Result<()> {
        let spec = &self.spec;
        let source = &spec.source;
        let speed = sanitize::playback_speed(spec.playback_speed.unwrap_or(1.0));
        let source_duration =
            sanitize::source_duration(source.source_duration, config.default_media_duration);
        let start_time =
            sanitize::non_negative(spec.start_time.unwrap_or(0.0), 0.0).min(source_duration - MIN_SPAN);

        let now = timeline.current_time();
        let position_start = sanitize::non_negative(spec.position_start.unwrap_or(now), now);

        let requested_end = spec
            .end_time
            .filter(|end| end.is_finite() && *end > start_time);
        let length = match requested_end {
            Some(end) => (end.min(source_duration) - start_time) / speed,
            None => match source.kind {
                MediaKind::Image => config.default_media_duration,
                MediaKind::Video | MediaKind::Audio => {
                    ((source_duration - start_time) / speed).min(config.default_media_duration)
                }
            },
        };
        let position_end = match spec.position_end {
            Some(end) if end.is_finite() && end > position_start => end,
            _ => position_start + length,
        };
        let end_time =
            requested_end.unwrap_or(start_time + (position_end - position_start) * speed);

        let placement = Placement {
            position_start,
            position_end,
            z_index: timeline.next_z_index(),
            opacity: spec.opacity.unwrap_or(100.0),
        };
        let trim = SourceTrim {
            source_locator: source.source_locator.clone(),
            content_kind: source.content_kind.clone(),
            source_duration,
            start_time,
            end_time,
            playback_speed: speed,
        };
        let transform = spec.transform.clone().unwrap_or_default();
        let volume = spec.volume.unwrap_or(100.0);

        let element = match source.kind {
            MediaKind::Video => Element::Video {
                id: self.id,
                placement,
                transform,
                source: trim,
                volume,
            },
            MediaKind::Audio => Element::Audio {
                id: self.id,
                placement,
                source: trim,
                volume,
            },
            MediaKind::Image => Element::Image {
                id: self.id,
                placement,
                transform,
                source: trim,
            },
        };
        timeline.push_element(element);
        Ok(())
    }

    fn description(&self) -> &str {
        "Add media"
    }
}

// ---------------------------------------------------------------------------
// AddTextCommand
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AddTextCommand {
    id: Uuid,
    spec: TextSpec,
}

impl AddTextCommand {
    pub fn new(spec: TextSpec) -> Self {
        Self {
            id: Uuid::new_v4(),
            spec,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Command for AddTextCommand {
    fn apply(&self, timeline: &mut Timeline, config: &EditorConfig) -> Result<()> {
        let spec = &self.spec;
        if spec.text.trim().is_empty() {
            return Err(CoreError::InvalidOperation("text element needs text".into()));
        }

        let now = timeline.current_time();
        let position_start = sanitize::non_negative(spec.position_start.unwrap_or(now), now);
        let position_end = match spec.position_end {
            Some(end) if end.is_finite() && end > position_start => end,
            _ => position_start + config.default_text_duration,
        };
        let animation = spec.animation.unwrap_or_default();
        let animation_duration = spec.animation_duration.unwrap_or(match animation {
            TextAnimation::None => 0.0,
            _ => DEFAULT_ANIMATION_DURATION,
        });
        let z_index = timeline.next_z_index();

        timeline.push_element(Element::Text {
            id: self.id,
            placement: Placement {
                position_start,
                position_end,
                z_index,
                opacity: spec.opacity.unwrap_or(100.0),
            },
            transform: spec.transform.clone().unwrap_or_default(),
            text: spec.text.clone(),
            style: spec.style.clone().unwrap_or_default(),
            animation,
            animation_duration,
        });
        Ok(())
    }

    fn description(&self) -> &str {
        "Add text"
    }
}

// ---------------------------------------------------------------------------
// UpdateMediaCommand / UpdateTextCommand
// ---------------------------------------------------------------------------

fn patch_placement(
    element: &mut Element,
    position_start: Option<f64>,
    position_end: Option<f64>,
    opacity: Option<f64>,
    z_index: Option<i64>,
) {
    let placement = element.placement_mut();
    if let Some(v) = position_start {
        placement.position_start = v;
    }
    if let Some(v) = position_end {
        placement.position_end = v;
    }
    if let Some(v) = opacity {
        placement.opacity = v;
    }
    if let Some(v) = z_index {
        placement.z_index = v;
    }
}

fn patch_transform(
    element: &mut Element,
    x: Option<f64>,
    y: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    rotation: Option<f64>,
) {
    let Some(transform) = element.transform_mut() else {
        return;
    };
    if let Some(v) = x {
        transform.x = v;
    }
    if let Some(v) = y {
        transform.y = v;
    }
    if let Some(v) = width {
        transform.width = Some(v);
    }
    if let Some(v) = height {
        transform.height = Some(v);
    }
    if let Some(v) = rotation {
        transform.rotation = v;
    }
}

#[derive(Debug)]
pub struct UpdateMediaCommand {
    id: Uuid,
    patch: MediaPatch,
}

impl UpdateMediaCommand {
    pub fn new(id: Uuid, patch: MediaPatch) -> Self {
        Self { id, patch }
    }
}

impl Command for UpdateMediaCommand {
    fn apply(&self, timeline: &mut Timeline, _config: &EditorConfig) -> Result<()> {
        let patch = &self.patch;
        timeline.modify_element(self.id, |element| {
            if !element.is_media() {
                return Err(CoreError::ElementNotFound(self.id));
            }
            patch_placement(
                element,
                patch.position_start,
                patch.position_end,
                patch.opacity,
                patch.z_index,
            );
            patch_transform(
                element,
                patch.x,
                patch.y,
                patch.width,
                patch.height,
                patch.rotation,
            );
            if let Some(trim) = element.source_mut() {
                if let Some(v) = patch.start_time {
                    trim.start_time = v;
                }
                if let Some(v) = patch.end_time {
                    trim.end_time = v;
                }
                if let Some(v) = patch.playback_speed {
                    trim.playback_speed = v;
                }
            }
            if let (Some(volume), Some(v)) = (element.volume_mut(), patch.volume) {
                *volume = v;
            }
            Ok(())
        })
    }

    fn description(&self) -> &str {
        "Update media"
    }
}

#[derive(Debug)]
pub struct UpdateTextCommand {
    id: Uuid,
    patch: TextPatch,
}

impl UpdateTextCommand {
    pub fn new(id: Uuid, patch: TextPatch) -> Self {
        Self { id, patch }
    }
}

impl Command for UpdateTextCommand {
    fn apply(&self, timeline: &mut Timeline, _config: &EditorConfig) -> Result<()> {
        let patch = &self.patch;
        if patch.text.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(CoreError::InvalidOperation("text element needs text".into()));
        }
        timeline.modify_element(self.id, |element| {
            if element.is_media() {
                return Err(CoreError::ElementNotFound(self.id));
            }
            patch_placement(
                element,
                patch.position_start,
                patch.position_end,
                patch.opacity,
                patch.z_index,
            );
            patch_transform(
                element,
                patch.x,
                patch.y,
                patch.width,
                patch.height,
                patch.rotation,
            );
            if let Element::Text {
                text,
                style,
                animation,
                animation_duration,
                ..
            } = element
            {
                if let Some(v) = &patch.text {
                    *text = v.clone();
                }
                if let Some(v) = &patch.font_family {
                    style.font_family = v.clone();
                }
                if let Some(v) = patch.font_size {
                    style.font_size = v;
                }
                if let Some(v) = patch.font_weight {
                    style.font_weight = v;
                }
                if let Some(v) = patch.font_style {
                    style.font_style = v;
                }
                if let Some(v) = &patch.color {
                    style.color = v.clone();
                }
                if let Some(v) = &patch.background_color {
                    style.background_color = Some(v.clone());
                }
                if let Some(v) = patch.text_align {
                    style.text_align = v;
                }
                if let Some(v) = patch.animation {
                    *animation = v;
                }
                if let Some(v) = patch.animation_duration {
                    *animation_duration = v;
                }
            }
            Ok(())
        })
    }

    fn description(&self) -> &str {
        "Update text"
    }
}

// ---------------------------------------------------------------------------
// DeleteSelectedCommand
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct DeleteSelectedCommand {
    label: &'static str,
}

impl DeleteSelectedCommand {
    pub fn new() -> Self {
        Self { label: "Delete" }
    }

    /// Same edit, recorded under the "Cut" label.
    pub fn cut() -> Self {
        Self { label: "Cut" }
    }
}

impl Default for DeleteSelectedCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for DeleteSelectedCommand {
    fn apply(&self, timeline: &mut Timeline, _config: &EditorConfig) -> Result<()> {
        timeline.remove_selected().map(|_| ())
    }

    fn description(&self) -> &str {
        self.label
    }
}

// ---------------------------------------------------------------------------
// SplitCommand
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct SplitCommand {
    id: Uuid,
    at: f64,
    right_id: Uuid,
}

impl SplitCommand {
    pub fn new(id: Uuid, at: f64) -> Self {
        Self {
            id,
            at,
            right_id: Uuid::new_v4(),
        }
    }

    /// Id the right half receives once applied.
    pub fn right_id(&self) -> Uuid {
        self.right_id
    }
}

impl Command for SplitCommand {
    fn apply(&self, timeline: &mut Timeline, _config: &EditorConfig) -> Result<()> {
        // Single-selection split is the contract; multi-select split is not generalized.
        if timeline.single_selection().is_none() {
            return Err(CoreError::InvalidOperation(
                "split requires exactly one selected element".into(),
            ));
        }
        timeline.split_element(self.id, self.at, self.right_id).map(|_| ())
    }

    fn description(&self) -> &str {
        "Split element"
    }
}

// ---------------------------------------------------------------------------
// PasteCommand
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct PasteCommand {
    clipboard: Vec<Element>,
    new_ids: Vec<Uuid>,
}

impl PasteCommand {
    pub fn new(clipboard: Vec<Element>) -> Self {
        let new_ids = clipboard.iter().map(|_| Uuid::new_v4()).collect();
        Self { clipboard, new_ids }
    }

    /// Ids of the pasted clones, in clipboard order.
    pub fn new_ids(&self) -> &[Uuid] {
        &self.new_ids
    }
}

impl Command for PasteCommand {
    fn apply(&self, timeline: &mut Timeline, _config: &EditorConfig) -> Result<()> {
        let earliest = self
            .clipboard
            .iter()
            .map(|e| e.position_start())
            .reduce(f64::min)
            .ok_or_else(|| CoreError::InvalidOperation("clipboard is empty".into()))?;
        let shift = timeline.current_time() - earliest;

        // Pasted clones go on top, keeping their stacking order among themselves.
        let mut order: Vec<usize> = (0..self.clipboard.len()).collect();
        order.sort_by_key(|&i| self.clipboard[i].z_index());
        let base_z = timeline.next_z_index();
        let mut z_for = vec![0; self.clipboard.len()];
        for (rank, &i) in order.iter().enumerate() {
            z_for[i] = base_z + rank as i64;
        }

        for (i, original) in self.clipboard.iter().enumerate() {
            let mut clone = original.clone();
            clone.set_id(self.new_ids[i]);
            let placement = clone.placement_mut();
            placement.position_start += shift;
            placement.position_end += shift;
            placement.z_index = z_for[i];
            timeline.push_element(clone);
        }
        timeline.set_selection(self.new_ids.iter().copied());
        Ok(())
    }

    fn description(&self) -> &str {
        "Paste"
    }
}

// ---------------------------------------------------------------------------
// MoveElementCommand / MoveSelectedCommand
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct MoveElementCommand {
    id: Uuid,
    new_start: f64,
    snap: bool,
}

impl MoveElementCommand {
    pub fn new(id: Uuid, new_start: f64, snap: bool) -> Self {
        Self {
            id,
            new_start,
            snap,
        }
    }
}

impl Command for MoveElementCommand {
    fn apply(&self, timeline: &mut Timeline, config: &EditorConfig) -> Result<()> {
        let element = timeline
            .element(self.id)
            .ok_or(CoreError::ElementNotFound(self.id))?;
        let length = element.placement().length();
        let mut start = sanitize::non_negative(self.new_start, element.position_start());

        if self.snap {
            let points = snapping::collect_snap_points(timeline, Some(self.id));
            start = snapping::snap_span(start, length, &points, config.snap_threshold).max(0.0);
        }

        timeline.modify_element(self.id, |element| {
            let placement = element.placement_mut();
            placement.position_start = start;
            placement.position_end = start + length;
            Ok(())
        })
    }

    fn description(&self) -> &str {
        "Move element"
    }
}

#[derive(Debug)]
pub struct MoveSelectedCommand {
    delta: f64,
}

impl MoveSelectedCommand {
    pub fn new(delta: f64) -> Self {
        Self { delta }
    }
}

impl Command for MoveSelectedCommand {
    fn apply(&self, timeline: &mut Timeline, _config: &EditorConfig) -> Result<()> {
        let earliest = timeline
            .selected_elements()
            .map(|e| e.position_start())
            .reduce(f64::min)
            .ok_or_else(|| CoreError::InvalidOperation("selection is empty".into()))?;
        // Nothing may start before zero.
        let delta = sanitize::finite_or(self.delta, 0.0).max(-earliest);
        if delta == 0.0 {
            return Err(CoreError::InvalidOperation("move has no effect".into()));
        }

        let ids: Vec<Uuid> = timeline.selected_ids().iter().copied().collect();
        for id in ids {
            timeline.modify_element(id, |element| {
                let placement = element.placement_mut();
                placement.position_start += delta;
                placement.position_end += delta;
                Ok(())
            })?;
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Move selection"
    }
}

// ---------------------------------------------------------------------------
// ReorderCommand
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrder {
    Front,
    Back,
}

#[derive(Debug)]
pub struct ReorderCommand {
    id: Uuid,
    to: ZOrder,
}

impl ReorderCommand {
    pub fn new(id: Uuid, to: ZOrder) -> Self {
        Self { id, to }
    }
}

impl Command for ReorderCommand {
    fn apply(&self, timeline: &mut Timeline, _config: &EditorConfig) -> Result<()> {
        let z_index = match self.to {
            ZOrder::Front => timeline.max_z_index().map_or(0, |z| z + 1),
            ZOrder::Back => timeline.min_z_index().map_or(0, |z| z - 1),
        };
        timeline.modify_element(self.id, |element| {
            element.placement_mut().z_index = z_index;
            Ok(())
        })
    }

    fn description(&self) -> &str {
        match self.to {
            ZOrder::Front => "Bring to front",
            ZOrder::Back => "Send to back",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::preset_shorts;
    use crate::sanitize::is_valid;

    fn make_source(kind: MediaKind, duration: f64) -> MediaSource {
        MediaSource {
            kind,
            source_locator: "s3://lessons/cell.mp4".to_string(),
            source_duration: duration,
            content_kind: "video/mp4".to_string(),
        }
    }

    fn make_timeline() -> (Timeline, EditorConfig) {
        let config = EditorConfig::default();
        (Timeline::new(preset_shorts(), config.zoom.initial), config)
    }

    fn add_video(tl: &mut Timeline, config: &EditorConfig, start: f64, end: f64) -> Uuid {
        let mut spec = MediaSpec::new(make_source(MediaKind::Video, 60.0));
        spec.position_start = Some(start);
        spec.position_end = Some(end);
        spec.start_time = Some(0.0);
        spec.end_time = Some(end - start);
        let cmd = AddMediaCommand::new(spec);
        cmd.apply(tl, config).unwrap();
        cmd.id()
    }

    // -----------------------------------------------------------------------
    // add media
    // -----------------------------------------------------------------------

    #[test]
    fn add_media_defaults_to_playhead_and_fallback_length() {
        let (mut tl, config) = make_timeline();
        add_video(&mut tl, &config, 0.0, 10.0);
        tl.set_current_time(4.0);

        let cmd = AddMediaCommand::new(MediaSpec::new(make_source(MediaKind::Video, 60.0)));
        cmd.apply(&mut tl, &config).unwrap();

        let e = tl.element(cmd.id()).unwrap();
        assert_eq!(e.position_start(), 4.0);
        assert_eq!(e.position_end(), 9.0);
        assert_eq!(e.source().unwrap().start_time, 0.0);
        assert_eq!(e.source().unwrap().end_time, 5.0);
    }

    #[test]
    fn add_media_short_source_limits_length() {
        let (mut tl, config) = make_timeline();
        let cmd = AddMediaCommand::new(MediaSpec::new(make_source(MediaKind::Audio, 2.0)));
        cmd.apply(&mut tl, &config).unwrap();
        let e = tl.element(cmd.id()).unwrap();
        assert_eq!(e.placement().length(), 2.0);
        assert_eq!(e.source().unwrap().end_time, 2.0);
        assert_eq!(e.kind(), ElementKind::Audio);
    }

    #[test]
    fn add_media_clamps_malformed_numbers() {
        let (mut tl, config) = make_timeline();
        let mut spec = MediaSpec::new(make_source(MediaKind::Video, f64::NAN));
        spec.position_start = Some(-3.0);
        spec.start_time = Some(f64::NAN);
        spec.playback_speed = Some(-1.0);
        spec.volume = Some(500.0);
        let cmd = AddMediaCommand::new(spec);
        cmd.apply(&mut tl, &config).unwrap();

        let e = tl.element(cmd.id()).unwrap();
        assert!(is_valid(e));
        assert_eq!(e.position_start(), 0.0);
        assert_eq!(e.volume(), Some(100.0));
        assert!(e.source().unwrap().playback_speed > 0.0);
    }

    #[test]
    fn add_media_unusable_trim_end_follows_placement() {
        let (mut tl, config) = make_timeline();
        let mut spec = MediaSpec::new(make_source(MediaKind::Video, 60.0));
        spec.position_start = Some(0.0);
        spec.end_time = Some(f64::NAN);
        let cmd = AddMediaCommand::new(spec);
        cmd.apply(&mut tl, &config).unwrap();
        let e = tl.element(cmd.id()).unwrap();
        assert_eq!(e.placement().length(), 5.0);
        assert_eq!(e.source().unwrap().end_time, 5.0);

        let mut spec = MediaSpec::new(make_source(MediaKind::Video, 60.0));
        spec.position_start = Some(0.0);
        spec.start_time = Some(10.0);
        spec.end_time = Some(3.0);
        let cmd = AddMediaCommand::new(spec);
        cmd.apply(&mut tl, &config).unwrap();
        let trim = tl.element(cmd.id()).unwrap().source().unwrap();
        assert_eq!((trim.start_time, trim.end_time), (10.0, 15.0));
    }

    #[test]
    fn add_media_stacks_on_top() {
        let (mut tl, config) = make_timeline();
        let a = add_video(&mut tl, &config, 0.0, 1.0);
        let b = add_video(&mut tl, &config, 0.0, 1.0);
        assert_eq!(tl.element(a).unwrap().z_index(), 0);
        assert_eq!(tl.element(b).unwrap().z_index(), 1);
    }

    #[test]
    fn add_image_uses_fallback_length() {
        let (mut tl, config) = make_timeline();
        let cmd = AddMediaCommand::new(MediaSpec::new(make_source(MediaKind::Image, 0.0)));
        cmd.apply(&mut tl, &config).unwrap();
        let e = tl.element(cmd.id()).unwrap();
        assert_eq!(e.kind(), ElementKind::Image);
        assert_eq!(e.placement().length(), config.default_media_duration);
        assert!(is_valid(e));
    }

    // -----------------------------------------------------------------------
    // add text
    // -----------------------------------------------------------------------

    #[test]
    fn add_text_defaults() {
        let (mut tl, config) = make_timeline();
        let mut spec = TextSpec::new("Mitochondria make ATP");
        spec.animation = Some(TextAnimation::Typewriter);
        let cmd = AddTextCommand::new(spec);
        cmd.apply(&mut tl, &config).unwrap();

        match tl.element(cmd.id()).unwrap() {
            Element::Text {
                placement,
                animation,
                animation_duration,
                style,
                ..
            } => {
                assert_eq!(placement.position_start, 0.0);
                assert_eq!(placement.position_end, 3.0);
                assert_eq!(*animation, TextAnimation::Typewriter);
                assert_eq!(*animation_duration, DEFAULT_ANIMATION_DURATION);
                assert_eq!(style, &TextStyle::default());
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn add_blank_text_fails() {
        let (mut tl, config) = make_timeline();
        let cmd = AddTextCommand::new(TextSpec::new("   "));
        assert!(cmd.apply(&mut tl, &config).is_err());
        assert!(tl.elements().is_empty());
    }

    // -----------------------------------------------------------------------
    // update
    // -----------------------------------------------------------------------

    #[test]
    fn update_media_clamps_trim() {
        let (mut tl, config) = make_timeline();
        let id = add_video(&mut tl, &config, 0.0, 5.0);
        let patch = MediaPatch {
            start_time: Some(-2.0),
            end_time: Some(500.0),
            position_end: Some(-1.0),
            ..MediaPatch::default()
        };
        UpdateMediaCommand::new(id, patch).apply(&mut tl, &config).unwrap();

        let e = tl.element(id).unwrap();
        assert!(is_valid(e));
        assert_eq!(e.source().unwrap().start_time, 0.0);
        assert_eq!(e.source().unwrap().end_time, 60.0);
        assert!(e.position_end() > e.position_start());
    }

    #[test]
    fn update_media_on_text_is_not_found() {
        let (mut tl, config) = make_timeline();
        let cmd = AddTextCommand::new(TextSpec::new("Title"));
        cmd.apply(&mut tl, &config).unwrap();
        let result = UpdateMediaCommand::new(cmd.id(), MediaPatch::default()).apply(&mut tl, &config);
        assert!(matches!(result.unwrap_err(), CoreError::ElementNotFound(_)));
    }

    #[test]
    fn update_text_changes_style() {
        let (mut tl, config) = make_timeline();
        let cmd = AddTextCommand::new(TextSpec::new("Title"));
        cmd.apply(&mut tl, &config).unwrap();

        let patch = TextPatch {
            text: Some("New title".to_string()),
            color: Some("#ff0000".to_string()),
            background_color: Some("#000000".to_string()),
            animation: Some(TextAnimation::SlideUp),
            animation_duration: Some(-1.0),
            ..TextPatch::default()
        };
        UpdateTextCommand::new(cmd.id(), patch).apply(&mut tl, &config).unwrap();

        match tl.element(cmd.id()).unwrap() {
            Element::Text {
                text,
                style,
                animation,
                animation_duration,
                ..
            } => {
                assert_eq!(text, "New title");
                assert_eq!(style.color, "#ff0000");
                assert_eq!(style.background_color.as_deref(), Some("#000000"));
                assert_eq!(*animation, TextAnimation::SlideUp);
                assert_eq!(*animation_duration, 0.0);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn update_text_with_blank_text_fails() {
        let (mut tl, config) = make_timeline();
        let cmd = AddTextCommand::new(TextSpec::new("Title"));
        cmd.apply(&mut tl, &config).unwrap();
        let patch = TextPatch {
            text: Some(String::new()),
            ..TextPatch::default()
        };
        assert!(UpdateTextCommand::new(cmd.id(), patch).apply(&mut tl, &config).is_err());
    }

    // -----------------------------------------------------------------------
    // split
    // -----------------------------------------------------------------------

    #[test]
    fn split_requires_single_selection() {
        let (mut tl, config) = make_timeline();
        let id = add_video(&mut tl, &config, 0.0, 5.0);
        let cmd = SplitCommand::new(id, 2.0);
        assert!(cmd.apply(&mut tl, &config).is_err());

        tl.select(id, false).unwrap();
        cmd.apply(&mut tl, &config).unwrap();
        assert_eq!(tl.elements().len(), 2);
        assert_eq!(tl.elements()[1].id(), cmd.right_id());
    }

    // -----------------------------------------------------------------------
    // paste
    // -----------------------------------------------------------------------

    #[test]
    fn paste_anchors_at_playhead_and_keeps_offsets() {
        let (mut tl, config) = make_timeline();
        let a = add_video(&mut tl, &config, 1.0, 3.0);
        let b = add_video(&mut tl, &config, 3.0, 4.0);
        let clipboard = vec![
            tl.element(a).unwrap().clone(),
            tl.element(b).unwrap().clone(),
        ];
        tl.set_current_time(4.0);

        let cmd = PasteCommand::new(clipboard);
        cmd.apply(&mut tl, &config).unwrap();

        let pasted: Vec<&Element> = cmd.new_ids().iter().map(|id| tl.element(*id).unwrap()).collect();
        assert_eq!(pasted[0].position_start(), 4.0);
        assert_eq!(pasted[1].position_start(), 6.0);
        assert!(pasted[0].z_index() > tl.element(b).unwrap().z_index());
        assert!(pasted[1].z_index() > pasted[0].z_index());
        assert_eq!(tl.selected_ids().len(), 2);
    }

    #[test]
    fn paste_empty_clipboard_fails() {
        let (mut tl, config) = make_timeline();
        assert!(PasteCommand::new(vec![]).apply(&mut tl, &config).is_err());
    }

    // -----------------------------------------------------------------------
    // move
    // -----------------------------------------------------------------------

    #[test]
    fn move_element_keeps_length_and_snaps() {
        let (mut tl, config) = make_timeline();
        add_video(&mut tl, &config, 0.0, 5.0);
        let b = add_video(&mut tl, &config, 8.0, 10.0);

        MoveElementCommand::new(b, 5.04, true).apply(&mut tl, &config).unwrap();
        let e = tl.element(b).unwrap();
        assert_eq!(e.position_start(), 5.0);
        assert_eq!(e.position_end(), 7.0);

        MoveElementCommand::new(b, 6.5, false).apply(&mut tl, &config).unwrap();
        assert_eq!(tl.element(b).unwrap().position_start(), 6.5);
    }

    #[test]
    fn move_selected_stops_at_zero() {
        let (mut tl, config) = make_timeline();
        let a = add_video(&mut tl, &config, 1.0, 2.0);
        let b = add_video(&mut tl, &config, 3.0, 4.0);
        tl.select_all();

        MoveSelectedCommand::new(-5.0).apply(&mut tl, &config).unwrap();
        assert_eq!(tl.element(a).unwrap().position_start(), 0.0);
        assert_eq!(tl.element(b).unwrap().position_start(), 2.0);

        assert!(MoveSelectedCommand::new(-1.0).apply(&mut tl, &config).is_err());
    }

    // -----------------------------------------------------------------------
    // reorder
    // -----------------------------------------------------------------------

    #[test]
    fn reorder_front_and_back() {
        let (mut tl, config) = make_timeline();
        let a = add_video(&mut tl, &config, 0.0, 1.0);
        let b = add_video(&mut tl, &config, 0.0, 1.0);

        ReorderCommand::new(a, ZOrder::Front).apply(&mut tl, &config).unwrap();
        assert!(tl.element(a).unwrap().z_index() > tl.element(b).unwrap().z_index());

        ReorderCommand::new(a, ZOrder::Back).apply(&mut tl, &config).unwrap();
        assert!(tl.element(a).unwrap().z_index() < tl.element(b).unwrap().z_index());
        assert_eq!(
            ReorderCommand::new(a, ZOrder::Back).description(),
            "Send to back"
        );
    }
}
