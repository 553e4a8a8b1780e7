pub mod animation;
pub mod compile;
pub mod error;

pub use animation::{AnimationSample, TextAnimationCurve};
pub use compile::{compile, FrameRange, MediaFrames, RenderDescriptor, RenderPlan, TextRender};
pub use error::{RenderError, Result};
