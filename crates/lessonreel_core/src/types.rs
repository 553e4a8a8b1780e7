use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Smallest timeline or trim span an element may have, in seconds.
pub const MIN_SPAN: f64 = 0.001;

/// Latest instant any element or source trim may reach, in seconds. Below
/// it `t + MIN_SPAN > t` holds for every representable `t`.
pub const MAX_TIMELINE_SECONDS: f64 = 1.0e9;

// ---------------------------------------------------------------------------
// Frames and timecode
// ---------------------------------------------------------------------------

/// Quantize seconds to a frame index: `round(seconds * fps)`.
pub fn seconds_to_frame(seconds: f64, fps: u32) -> i64 {
    (seconds * fps as f64).round() as i64
}

pub fn frame_to_seconds(frame: i64, fps: u32) -> f64 {
    frame as f64 / fps.max(1) as f64
}

/// A frame position displayed as `HH:MM:SS:FF`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Timecode {
    pub frame: i64,
    pub fps: u32,
}

impl Timecode {
    pub fn from_seconds(seconds: f64, fps: u32) -> Self {
        Self {
            frame: seconds_to_frame(seconds, fps),
            fps,
        }
    }

    pub fn as_seconds(&self) -> f64 {
        frame_to_seconds(self.frame, self.fps)
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.fps.max(1) as u64;
        let total_frames = self.frame.unsigned_abs();
        let frames = total_frames % fps;
        let total_secs = total_frames / fps;
        let secs = total_secs % 60;
        let total_mins = total_secs / 60;
        let mins = total_mins % 60;
        let hours = total_mins / 60;
        let sign = if self.frame < 0 { "-" } else { "" };
        write!(
            f,
            "{}{:02}:{:02}:{:02}:{:02}",
            sign, hours, mins, secs, frames
        )
    }
}

// ---------------------------------------------------------------------------
// CompositionSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositionSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

// ---------------------------------------------------------------------------
// Media descriptors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

/// An opaque media reference handed over by the asset browser.
/// The locator is never resolved here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaSource {
    pub kind: MediaKind,
    pub source_locator: String,
    pub source_duration: f64,
    #[serde(default)]
    pub content_kind: String,
}

// ---------------------------------------------------------------------------
// Element building blocks
// ---------------------------------------------------------------------------

/// Where an element sits on the shared clock and in the draw stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Placement {
    pub position_start: f64,
    pub position_end: f64,
    pub z_index: i64,
    /// 0..=100
    pub opacity: f64,
}

impl Placement {
    pub fn length(&self) -> f64 {
        self.position_end - self.position_start
    }

    /// True when `t` lies strictly inside `(position_start, position_end)`.
    pub fn strictly_contains(&self, t: f64) -> bool {
        t > self.position_start && t < self.position_end
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Degrees.
    pub rotation: f64,
}

/// The slice of a media source that is actually played.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceTrim {
    pub source_locator: String,
    pub content_kind: String,
    pub source_duration: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub playback_speed: f64,
}

impl SourceTrim {
    pub fn length(&self) -> f64 {
        self.end_time - self.start_time
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TextAnimation {
    #[default]
    None,
    FadeIn,
    SlideUp,
    SlideLeft,
    Zoom,
    Typewriter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    /// CSS numeric weight (400 normal, 700 bold).
    pub font_weight: u16,
    pub font_style: FontStyle,
    pub color: String,
    pub background_color: Option<String>,
    pub text_align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            font_size: 48.0,
            font_weight: 400,
            font_style: FontStyle::Normal,
            color: "#ffffff".to_string(),
            background_color: None,
            text_align: TextAlign::Center,
        }
    }
}

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Video,
    Audio,
    Image,
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Video {
        id: Uuid,
        placement: Placement,
        transform: Transform,
        source: SourceTrim,
        /// 0..=100
        volume: f64,
    },
    Audio {
        id: Uuid,
        placement: Placement,
        source: SourceTrim,
        volume: f64,
    },
    Image {
        id: Uuid,
        placement: Placement,
        transform: Transform,
        source: SourceTrim,
    },
    Text {
        id: Uuid,
        placement: Placement,
        transform: Transform,
        text: String,
        style: TextStyle,
        animation: TextAnimation,
        /// Seconds, >= 0.
        animation_duration: f64,
    },
}

impl Element {
    pub fn id(&self) -> Uuid {
        match self {
            Element::Video { id, .. } => *id,
            Element::Audio { id, .. } => *id,
            Element::Image { id, .. } => *id,
            Element::Text { id, .. } => *id,
        }
    }

    pub(crate) fn set_id(&mut self, new_id: Uuid) {
        match self {
            Element::Video { id, .. }
            | Element::Audio { id, .. }
            | Element::Image { id, .. }
            | Element::Text { id, .. } => *id = new_id,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Video { .. } => ElementKind::Video,
            Element::Audio { .. } => ElementKind::Audio,
            Element::Image { .. } => ElementKind::Image,
            Element::Text { .. } => ElementKind::Text,
        }
    }

    pub fn is_media(&self) -> bool {
        !matches!(self, Element::Text { .. })
    }

    pub fn placement(&self) -> &Placement {
        match self {
            Element::Video { placement, .. }
            | Element::Audio { placement, .. }
            | Element::Image { placement, .. }
            | Element::Text { placement, .. } => placement,
        }
    }

    pub fn placement_mut(&mut self) -> &mut Placement {
        match self {
            Element::Video { placement, .. }
            | Element::Audio { placement, .. }
            | Element::Image { placement, .. }
            | Element::Text { placement, .. } => placement,
        }
    }

    pub fn position_start(&self) -> f64 {
        self.placement().position_start
    }

    pub fn position_end(&self) -> f64 {
        self.placement().position_end
    }

    pub fn z_index(&self) -> i64 {
        self.placement().z_index
    }

    /// Visual transform; `None` for audio.
    pub fn transform(&self) -> Option<&Transform> {
        match self {
            Element::Video { transform, .. }
            | Element::Image { transform, .. }
            | Element::Text { transform, .. } => Some(transform),
            Element::Audio { .. } => None,
        }
    }

    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        match self {
            Element::Video { transform, .. }
            | Element::Image { transform, .. }
            | Element::Text { transform, .. } => Some(transform),
            Element::Audio { .. } => None,
        }
    }

    /// Source trim window; `None` for text.
    pub fn source(&self) -> Option<&SourceTrim> {
        match self {
            Element::Video { source, .. }
            | Element::Audio { source, .. }
            | Element::Image { source, .. } => Some(source),
            Element::Text { .. } => None,
        }
    }

    pub fn source_mut(&mut self) -> Option<&mut SourceTrim> {
        match self {
            Element::Video { source, .. }
            | Element::Audio { source, .. }
            | Element::Image { source, .. } => Some(source),
            Element::Text { .. } => None,
        }
    }

    /// Volume for audio and video.
    pub fn volume(&self) -> Option<f64> {
        match self {
            Element::Video { volume, .. } | Element::Audio { volume, .. } => Some(*volume),
            Element::Image { .. } | Element::Text { .. } => None,
        }
    }

    pub(crate) fn volume_mut(&mut self) -> Option<&mut f64> {
        match self {
            Element::Video { volume, .. } | Element::Audio { volume, .. } => Some(volume),
            Element::Image { .. } | Element::Text { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Creation specs and patches
// ---------------------------------------------------------------------------

/// Input to `add_media`. Every placement/trim field is optional and
/// falls back to playhead-anchored defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaSpec {
    pub source: MediaSource,
    #[serde(default)]
    pub position_start: Option<f64>,
    #[serde(default)]
    pub position_end: Option<f64>,
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub end_time: Option<f64>,
    #[serde(default)]
    pub playback_speed: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub transform: Option<Transform>,
}

impl MediaSpec {
    pub fn new(source: MediaSource) -> Self {
        Self {
            source,
            position_start: None,
            position_end: None,
            start_time: None,
            end_time: None,
            playback_speed: None,
            volume: None,
            opacity: None,
            transform: None,
        }
    }
}

/// Input to `add_text`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextSpec {
    pub text: String,
    pub position_start: Option<f64>,
    pub position_end: Option<f64>,
    pub style: Option<TextStyle>,
    pub animation: Option<TextAnimation>,
    pub animation_duration: Option<f64>,
    pub opacity: Option<f64>,
    pub transform: Option<Transform>,
}

impl TextSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MediaPatch {
    pub position_start: Option<f64>,
    pub position_end: Option<f64>,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub playback_speed: Option<f64>,
    pub volume: Option<f64>,
    pub opacity: Option<f64>,
    pub z_index: Option<i64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextPatch {
    pub position_start: Option<f64>,
    pub position_end: Option<f64>,
    pub opacity: Option<f64>,
    pub z_index: Option<i64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub text: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<u16>,
    pub font_style: Option<FontStyle>,
    pub color: Option<String>,
    /// An empty string clears the background.
    pub background_color: Option<String>,
    pub text_align: Option<TextAlign>,
    pub animation: Option<TextAnimation>,
    pub animation_duration: Option<f64>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
