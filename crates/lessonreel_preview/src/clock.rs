use crate::sync::{PlaybackSync, TickOutcome};
use lessonreel_core::Editor;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

const CHANNEL_CAPACITY: usize = 4;

/// Emits frame numbers at `fps` on a background task.
///
/// Frame numbers follow elapsed time, so a slow consumer sees skipped frames
/// rather than a clock that drifts behind. Dropping the clock stops the task.
pub struct FrameClock {
    rx: mpsc::Receiver<i64>,
    task: JoinHandle<()>,
}

impl FrameClock {
    pub fn start(fps: u32, from_frame: i64) -> Self {
        let fps = fps.max(1);
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let started = Instant::now();
            let mut last_sent = None;

            loop {
                interval.tick().await;
                let elapsed = started.elapsed().as_secs_f64();
                let frame = from_frame + (elapsed * fps as f64).round() as i64;
                if last_sent == Some(frame) {
                    continue;
                }
                if tx.send(frame).await.is_err() {
                    break;
                }
                last_sent = Some(frame);
            }
            tracing::trace!("Frame clock stopped");
        });

        tracing::debug!(fps, from_frame, "Frame clock started");
        Self { rx, task }
    }

    /// Next frame, or `None` once the clock has stopped.
    pub async fn next_frame(&mut self) -> Option<i64> {
        self.rx.recv().await
    }
}

impl Drop for FrameClock {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Play `editor` from its playhead, feeding clock frames through `sync`
/// until playback stops. With `max_frames`, playback is paused after that
/// many ticks. Returns the last frame received.
pub async fn drive_playback(
    editor: &mut Editor,
    sync: &mut PlaybackSync,
    max_frames: Option<u64>,
) -> i64 {
    let from_frame = sync.start(editor);
    let mut clock = FrameClock::start(editor.timeline().fps(), from_frame);
    let mut last_frame = from_frame;
    let mut delivered: u64 = 0;

    while let Some(frame) = clock.next_frame().await {
        last_frame = frame;
        match sync.on_frame(editor, frame) {
            TickOutcome::Ended | TickOutcome::Idle => break,
            TickOutcome::Dispatched(_) | TickOutcome::BelowThreshold => {}
        }
        delivered += 1;
        if max_frames.is_some_and(|max| delivered >= max) {
            editor.pause();
            break;
        }
    }

    tracing::debug!(
        last_frame,
        time = editor.timeline().current_time(),
        "Playback loop finished"
    );
    last_frame
}
