use lessonreel_core::types::{seconds_to_frame, TextAnimation};
use serde::{Deserialize, Serialize};

/// Distance a sliding text travels before it settles, in output pixels.
pub const SLIDE_DISTANCE: f64 = 50.0;
/// Scale a zooming text starts from.
pub const ZOOM_START_SCALE: f64 = 0.5;

/// Entrance animation of a text descriptor, sampled per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextAnimationCurve {
    pub kind: TextAnimation,
    pub duration_frames: i64,
    /// Characters in the text, for typewriter reveals.
    pub char_count: usize,
}

/// What the renderer applies on one frame. `opacity` multiplies the
/// element's own opacity; translations are added to its transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationSample {
    pub opacity: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    /// Characters to draw; `None` draws the whole text.
    pub visible_chars: Option<usize>,
}

impl AnimationSample {
    pub const IDENTITY: AnimationSample = AnimationSample {
        opacity: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        visible_chars: None,
    };
}

impl TextAnimationCurve {
    pub fn new(kind: TextAnimation, duration_secs: f64, fps: u32, text: &str) -> Self {
        Self {
            kind,
            duration_frames: seconds_to_frame(duration_secs, fps).max(0),
            char_count: text.chars().count(),
        }
    }

    /// Progress in `[0, 1]` at `local_frame` frames after the element starts.
    /// Clamped on both sides; a zero-length curve is already complete.
    pub fn progress(&self, local_frame: i64) -> f64 {
        if self.duration_frames <= 0 {
            return 1.0;
        }
        (local_frame as f64 / self.duration_frames as f64).clamp(0.0, 1.0)
    }

    pub fn sample(&self, local_frame: i64) -> AnimationSample {
        let p = self.progress(local_frame);
        let identity = AnimationSample::IDENTITY;
        match self.kind {
            TextAnimation::None => identity,
            TextAnimation::FadeIn => AnimationSample {
                opacity: p,
                ..identity
            },
            TextAnimation::SlideUp => AnimationSample {
                opacity: p,
                translate_y: (1.0 - p) * SLIDE_DISTANCE,
                ..identity
            },
            TextAnimation::SlideLeft => AnimationSample {
                opacity: p,
                translate_x: (1.0 - p) * SLIDE_DISTANCE,
                ..identity
            },
            TextAnimation::Zoom => AnimationSample {
                opacity: p,
                scale: ZOOM_START_SCALE + (1.0 - ZOOM_START_SCALE) * p,
                ..identity
            },
            TextAnimation::Typewriter => AnimationSample {
                visible_chars: Some((p * self.char_count as f64).floor() as usize),
                ..identity
            },
        }
    }
}
