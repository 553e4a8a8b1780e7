use lessonreel_core::types::{frame_to_seconds, seconds_to_frame};
use lessonreel_core::{Editor, EditorConfig};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Playback is paused; the tick was dropped.
    Idle,
    /// Too close to the last dispatched time to be worth a store update.
    BelowThreshold,
    /// The playhead moved to this time.
    Dispatched(f64),
    /// The tick reached the end; the playhead sits at the duration and playback stopped.
    Ended,
}

/// Pushes frame ticks into the editor's playhead. Ticks take `&mut Editor`,
/// so one cannot arrive while another tick or command is running.
#[derive(Debug, Clone)]
pub struct PlaybackSync {
    threshold: f64,
    last_dispatched: Option<f64>,
}

impl PlaybackSync {
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_finite() && threshold >= 0.0 {
            threshold
        } else {
            EditorConfig::default().sync_threshold
        };
        Self {
            threshold,
            last_dispatched: None,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.sync_threshold)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn last_dispatched(&self) -> Option<f64> {
        self.last_dispatched
    }

    /// Start playback and return the frame the clock should count from.
    pub fn start(&mut self, editor: &mut Editor) -> i64 {
        editor.play();
        self.last_dispatched = None;
        let timeline = editor.timeline();
        seconds_to_frame(timeline.current_time(), timeline.fps())
    }

    pub fn reset(&mut self) {
        self.last_dispatched = None;
    }

    pub fn on_frame(&mut self, editor: &mut Editor, frame: i64) -> TickOutcome {
        if !editor.timeline().is_playing() {
            return TickOutcome::Idle;
        }

        let time = frame_to_seconds(frame, editor.timeline().fps());
        let duration = editor.timeline().duration();
        if time >= duration {
            editor.set_current_time(duration);
            editor.pause();
            self.last_dispatched = Some(duration);
            tracing::debug!(frame, duration, "Playback reached the end");
            return TickOutcome::Ended;
        }

        if let Some(last) = self.last_dispatched {
            if (time - last).abs() <= self.threshold {
                tracing::trace!(frame, time, last, "Tick below threshold");
                return TickOutcome::BelowThreshold;
            }
        }

        editor.set_current_time(time);
        self.last_dispatched = Some(time);
        tracing::trace!(frame, time, "Tick dispatched");
        TickOutcome::Dispatched(time)
    }

    /// User-driven seek. Skips the threshold and returns the frame the
    /// clock should resume from.
    pub fn scrub(&mut self, editor: &mut Editor, t: f64) -> i64 {
        editor.set_current_time(t);
        let timeline = editor.timeline();
        self.last_dispatched = Some(timeline.current_time());
        seconds_to_frame(timeline.current_time(), timeline.fps())
    }
}

impl Default for PlaybackSync {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}
