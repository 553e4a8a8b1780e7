use crate::animation::{AnimationSample, TextAnimationCurve};
use crate::error::{RenderError, Result};
use lessonreel_core::timeline::Timeline;
use lessonreel_core::types::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// A compiled, renderer-facing description of the whole composition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderPlan {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub duration_frames: i64,
    /// Back to front: ascending z-index, ties in insertion order.
    pub descriptors: Vec<RenderDescriptor>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameRange {
    pub from_frame: i64,
    pub duration_frames: i64,
}

impl FrameRange {
    pub fn contains(&self, frame: i64) -> bool {
        frame >= self.from_frame && frame < self.from_frame + self.duration_frames
    }
}

/// Source trim of a media element, quantized to frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaFrames {
    pub source_locator: String,
    pub content_kind: String,
    pub source_in_frame: i64,
    pub source_out_frame: i64,
    pub playback_speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextRender {
    pub text: String,
    pub style: TextStyle,
    pub animation: TextAnimationCurve,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RenderDescriptor {
    Video {
        id: Uuid,
        timing: FrameRange,
        opacity: f64,
        transform: Transform,
        media: MediaFrames,
        volume: f64,
    },
    Audio {
        id: Uuid,
        timing: FrameRange,
        opacity: f64,
        media: MediaFrames,
        volume: f64,
    },
    Image {
        id: Uuid,
        timing: FrameRange,
        opacity: f64,
        transform: Transform,
        media: MediaFrames,
    },
    Text {
        id: Uuid,
        timing: FrameRange,
        opacity: f64,
        transform: Transform,
        text: TextRender,
    },
}

impl RenderDescriptor {
    pub fn id(&self) -> Uuid {
        match self {
            RenderDescriptor::Video { id, .. }
            | RenderDescriptor::Audio { id, .. }
            | RenderDescriptor::Image { id, .. }
            | RenderDescriptor::Text { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            RenderDescriptor::Video { .. } => ElementKind::Video,
            RenderDescriptor::Audio { .. } => ElementKind::Audio,
            RenderDescriptor::Image { .. } => ElementKind::Image,
            RenderDescriptor::Text { .. } => ElementKind::Text,
        }
    }

    pub fn timing(&self) -> &FrameRange {
        match self {
            RenderDescriptor::Video { timing, .. }
            | RenderDescriptor::Audio { timing, .. }
            | RenderDescriptor::Image { timing, .. }
            | RenderDescriptor::Text { timing, .. } => timing,
        }
    }

    pub fn media(&self) -> Option<&MediaFrames> {
        match self {
            RenderDescriptor::Video { media, .. }
            | RenderDescriptor::Audio { media, .. }
            | RenderDescriptor::Image { media, .. } => Some(media),
            RenderDescriptor::Text { .. } => None,
        }
    }

    /// Text animation state at an absolute composition frame.
    pub fn animation_at(&self, frame: i64) -> Option<AnimationSample> {
        match self {
            RenderDescriptor::Text { timing, text, .. } => {
                Some(text.animation.sample(frame - timing.from_frame))
            }
            _ => None,
        }
    }
}

impl RenderPlan {
    /// Descriptors visible at `frame`, back to front.
    pub fn active_at(&self, frame: i64) -> impl Iterator<Item = &RenderDescriptor> {
        self.descriptors
            .iter()
            .filter(move |d| d.timing().contains(frame))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the plan as pretty JSON. The parent directory must exist.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(RenderError::OutputDirNotFound(parent.to_path_buf()));
            }
        }
        std::fs::write(path, self.to_json()?)?;
        tracing::info!(path = %path.display(), descriptors = self.descriptors.len(), "Render plan written");
        Ok(())
    }
}

fn frame_range(placement: &Placement, fps: u32) -> FrameRange {
    FrameRange {
        from_frame: seconds_to_frame(placement.position_start, fps),
        duration_frames: seconds_to_frame(placement.length(), fps),
    }
}

fn media_frames(trim: &SourceTrim, fps: u32) -> MediaFrames {
    MediaFrames {
        source_locator: trim.source_locator.clone(),
        content_kind: trim.content_kind.clone(),
        source_in_frame: seconds_to_frame(trim.start_time, fps),
        source_out_frame: seconds_to_frame(trim.end_time, fps),
        playback_speed: trim.playback_speed,
    }
}

fn describe(element: &Element, fps: u32) -> RenderDescriptor {
    match element {
        Element::Video {
            id,
            placement,
            transform,
            source,
            volume,
        } => RenderDescriptor::Video {
            id: *id,
            timing: frame_range(placement, fps),
            opacity: placement.opacity,
            transform: transform.clone(),
            media: media_frames(source, fps),
            volume: *volume,
        },
        Element::Audio {
            id,
            placement,
            source,
            volume,
        } => RenderDescriptor::Audio {
            id: *id,
            timing: frame_range(placement, fps),
            opacity: placement.opacity,
            media: media_frames(source, fps),
            volume: *volume,
        },
        Element::Image {
            id,
            placement,
            transform,
            source,
        } => RenderDescriptor::Image {
            id: *id,
            timing: frame_range(placement, fps),
            opacity: placement.opacity,
            transform: transform.clone(),
            media: media_frames(source, fps),
        },
        Element::Text {
            id,
            placement,
            transform,
            text,
            style,
            animation,
            animation_duration,
        } => RenderDescriptor::Text {
            id: *id,
            timing: frame_range(placement, fps),
            opacity: placement.opacity,
            transform: transform.clone(),
            text: TextRender {
                text: text.clone(),
                style: style.clone(),
                animation: TextAnimationCurve::new(*animation, *animation_duration, fps, text),
            },
        },
    }
}

/// Compile the timeline into a render plan. Pure and deterministic.
pub fn compile(timeline: &Timeline) -> RenderPlan {
    let fps = timeline.fps();

    // Stable sort: equal z-indices keep insertion order.
    let mut ordered: Vec<&Element> = timeline.elements().iter().collect();
    ordered.sort_by_key(|e| e.z_index());

    let settings = timeline.settings();
    RenderPlan {
        width: settings.width,
        height: settings.height,
        fps,
        duration_frames: seconds_to_frame(timeline.duration(), fps),
        descriptors: ordered.into_iter().map(|e| describe(e, fps)).collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
