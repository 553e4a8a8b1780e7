use lessonreel_core::history::History;
use lessonreel_core::input::{InputDispatcher, KeyEvent, Platform};
use lessonreel_core::types::{
    seconds_to_frame, Element, MediaPatch, MediaSpec, TextPatch, TextSpec, Timecode,
};
use lessonreel_core::{Editor, EditorConfig};
use lessonreel_preview::{FrameClock, PlaybackSync};
use lessonreel_render::compile;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

/// One line of input.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    AddMedia(MediaSpec),
    AddText(TextSpec),
    UpdateMedia {
        id: Uuid,
        patch: MediaPatch,
    },
    UpdateText {
        id: Uuid,
        patch: TextPatch,
    },
    Select {
        id: Uuid,
        #[serde(default)]
        additive: bool,
    },
    SelectAll,
    ClearSelection,
    Delete,
    /// Without `id`/`at`, splits the single selected element at the playhead.
    Split {
        id: Option<Uuid>,
        at: Option<f64>,
    },
    Move {
        id: Uuid,
        start: f64,
        #[serde(default)]
        snap: bool,
    },
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    ZoomToFit {
        viewport_width: f64,
    },
    Seek {
        time: f64,
    },
    Key(KeyEvent),
    /// Starts playback and answers at once; frames keep arriving between
    /// later requests. With `max_frames`, playback pauses after that many ticks.
    Play {
        max_frames: Option<u64>,
    },
    Pause,
    State,
    Compile {
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    fn ok(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(message.into()),
        }
    }
}

/// Transport and document state for the hosting surface.
#[derive(Debug, Serialize)]
struct StateView<'a> {
    current_time: f64,
    timecode: String,
    duration: f64,
    is_playing: bool,
    zoom: f64,
    scroll_offset: f64,
    can_undo: bool,
    can_redo: bool,
    undo_label: Option<&'a str>,
    redo_label: Option<&'a str>,
    selected_ids: &'a BTreeSet<Uuid>,
    elements: &'a [Element],
}

fn state_view(editor: &Editor) -> StateView<'_> {
    let timeline = editor.timeline();
    let history: &History = editor.history();
    StateView {
        current_time: timeline.current_time(),
        timecode: Timecode::from_seconds(timeline.current_time(), timeline.fps()).to_string(),
        duration: timeline.duration(),
        is_playing: timeline.is_playing(),
        zoom: timeline.zoom(),
        scroll_offset: timeline.scroll_offset(),
        can_undo: history.can_undo(),
        can_redo: history.can_redo(),
        undo_label: history.undo_description(),
        redo_label: history.redo_description(),
        selected_ids: timeline.selected_ids(),
        elements: timeline.elements(),
    }
}

pub struct Session {
    editor: Editor,
    sync: PlaybackSync,
    input: InputDispatcher,
    /// Running only while the editor is playing.
    clock: Option<FrameClock>,
    /// Playhead as of the last clock start or tick.
    clock_time: f64,
    frame_budget: Option<u64>,
}

async fn next_clock_frame(clock: &mut Option<FrameClock>) -> Option<i64> {
    match clock {
        Some(clock) => clock.next_frame().await,
        None => std::future::pending().await,
    }
}

impl Session {
    pub fn new(config: EditorConfig, viewport_width: f64) -> Self {
        let sync = PlaybackSync::from_config(&config);
        Self {
            editor: Editor::new(config),
            sync,
            input: InputDispatcher::new(Platform::current(), viewport_width),
            clock: None,
            clock_time: 0.0,
            frame_budget: None,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Serve JSON-lines requests from `reader` until it closes, writing one
    /// response per line to `writer`. Clock frames are fed to the editor
    /// between requests, so a pause or seek takes effect on the next line.
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let response = self.handle_line(line).await;
                    let mut out = serde_json::to_string(&response)?;
                    out.push('\n');
                    writer.write_all(out.as_bytes()).await?;
                    writer.flush().await?;
                }
                frame = next_clock_frame(&mut self.clock) => match frame {
                    Some(frame) => self.on_clock_frame(frame),
                    None => self.stop_clock(),
                },
            }
        }
        self.stop_clock();
        Ok(())
    }

    fn on_clock_frame(&mut self, frame: i64) {
        self.sync.on_frame(&mut self.editor, frame);
        self.clock_time = self.editor.timeline().current_time();
        if let Some(budget) = self.frame_budget.as_mut() {
            *budget = budget.saturating_sub(1);
            if *budget == 0 {
                self.editor.pause();
            }
        }
        if !self.editor.timeline().is_playing() {
            self.stop_clock();
        }
    }

    /// Start, restart or drop the clock to match the editor's transport.
    /// A playhead moved by a request restarts the clock from the new frame.
    fn reconcile_clock(&mut self) {
        let timeline = self.editor.timeline();
        if !timeline.is_playing() {
            self.stop_clock();
            return;
        }
        if self.clock.is_some() && timeline.current_time() == self.clock_time {
            return;
        }
        let from_frame = self.sync.start(&mut self.editor);
        let fps = self.editor.timeline().fps();
        self.clock = Some(FrameClock::start(fps, from_frame));
        self.clock_time = self.editor.timeline().current_time();
    }

    fn stop_clock(&mut self) {
        self.frame_budget = None;
        if self.clock.take().is_some() {
            self.sync.reset();
            tracing::debug!(
                time = self.editor.timeline().current_time(),
                "Playback clock stopped"
            );
        }
    }

    /// Parse and handle one input line. Never fails; problems become error responses.
    pub async fn handle_line(&mut self, line: &str) -> Response {
        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected malformed request");
                return Response::error(format!("invalid request: {e}"));
            }
        };
        let response = match self.handle(request).await {
            Ok(result) => Response::ok(result),
            Err(e) => Response::error(e.to_string()),
        };
        self.reconcile_clock();
        response
    }

    pub async fn handle(&mut self, request: Request) -> anyhow::Result<Value> {
        tracing::debug!(?request, "Handling request");
        let editor = &mut self.editor;
        let result = match request {
            Request::AddMedia(spec) => json!({ "id": editor.add_media(spec) }),
            Request::AddText(spec) => json!({ "id": editor.add_text(spec) }),
            Request::UpdateMedia { id, patch } => json!({ "applied": editor.update_media(id, patch) }),
            Request::UpdateText { id, patch } => json!({ "applied": editor.update_text(id, patch) }),
            Request::Select { id, additive } => json!({ "applied": editor.select(id, additive) }),
            Request::SelectAll => {
                editor.select_all();
                json!({ "selected": editor.timeline().selected_ids().len() })
            }
            Request::ClearSelection => {
                editor.clear_selection();
                json!({ "selected": 0 })
            }
            Request::Delete => json!({ "applied": editor.delete_selected() }),
            Request::Split { id, at } => {
                let right = match (id, at) {
                    (Some(id), Some(at)) => editor.split_media(id, at),
                    (Some(id), None) => editor.split_media(id, editor.timeline().current_time()),
                    (None, _) => editor.split_at_playhead(),
                };
                json!({ "id": right })
            }
            Request::Move { id, start, snap } => {
                json!({ "applied": editor.move_element(id, start, snap) })
            }
            Request::Copy => json!({ "copied": editor.copy() }),
            Request::Cut => json!({ "applied": editor.cut() }),
            Request::Paste => json!({ "ids": editor.paste() }),
            Request::Undo => json!({ "applied": editor.undo() }),
            Request::Redo => json!({ "applied": editor.redo() }),
            Request::ZoomIn => {
                editor.zoom_in();
                json!({ "zoom": editor.timeline().zoom() })
            }
            Request::ZoomOut => {
                editor.zoom_out();
                json!({ "zoom": editor.timeline().zoom() })
            }
            Request::ZoomToFit { viewport_width } => {
                self.input.set_viewport_width(viewport_width);
                editor.zoom_to_fit(viewport_width);
                json!({ "zoom": editor.timeline().zoom() })
            }
            Request::Seek { time } => {
                let frame = self.sync.scrub(editor, time);
                json!({ "current_time": editor.timeline().current_time(), "frame": frame })
            }
            Request::Key(event) => {
                let action = self.input.dispatch(editor, &event);
                json!({ "action": action })
            }
            Request::Play { max_frames } => {
                editor.play();
                self.frame_budget = max_frames.filter(|n| *n > 0);
                let timeline = editor.timeline();
                json!({
                    "frame": seconds_to_frame(timeline.current_time(), timeline.fps()),
                    "current_time": timeline.current_time(),
                    "is_playing": true,
                })
            }
            Request::Pause => {
                editor.pause();
                json!({
                    "current_time": editor.timeline().current_time(),
                    "is_playing": false,
                })
            }
            Request::State => serde_json::to_value(state_view(editor))?,
            Request::Compile { output } => {
                let plan = compile(editor.timeline());
                match output {
                    Some(path) => {
                        plan.write_json(&path)?;
                        json!({ "written": path, "descriptors": plan.descriptors.len() })
                    }
                    None => serde_json::to_value(&plan)?,
                }
            }
        };
        Ok(result)
    }
}
