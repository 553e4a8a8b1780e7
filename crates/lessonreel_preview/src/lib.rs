pub mod clock;
pub mod sync;

pub use clock::{drive_playback, FrameClock};
pub use sync::{PlaybackSync, TickOutcome};
