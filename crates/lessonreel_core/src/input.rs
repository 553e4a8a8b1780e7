use crate::editor::Editor;
use serde::{Deserialize, Serialize};

/// Small arrow-key scrub step, in seconds.
pub const SCRUB_STEP: f64 = 0.1;
/// Arrow-key scrub step with shift held.
pub const SCRUB_STEP_LARGE: f64 = 1.0;
/// J/L scrub step.
pub const SHUTTLE_STEP: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Space,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Delete,
    Backspace,
    /// A printable key, as produced by the keyboard layout.
    Char(char),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
        alt: false,
        shift: false,
    };

    fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    /// Whether the platform's primary shortcut modifier is held
    /// (Cmd on macOS, Ctrl elsewhere).
    pub fn primary_held(&self, modifiers: &Modifiers) -> bool {
        match self {
            Platform::MacOs => modifiers.meta,
            Platform::Windows | Platform::Linux => modifiers.ctrl,
        }
    }
}

/// Where the key event was aimed. Text fields keep their keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusTarget {
    #[default]
    Timeline,
    TextInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub target: FocusTarget,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            target: FocusTarget::Timeline,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn in_text_input(mut self) -> Self {
        self.target = FocusTarget::TextInput;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    TogglePlayPause,
    ScrubBy { delta: f64 },
    JumpToStart,
    JumpToEnd,
    DeleteSelection,
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    SelectAll,
    SplitAtPlayhead,
    Pause,
    ZoomIn,
    ZoomOut,
    ZoomToFit,
}

/// Maps key events to editor actions. `resolve` touches no state;
/// `dispatch` also runs the action against an [`Editor`].
#[derive(Debug, Clone)]
pub struct InputDispatcher {
    platform: Platform,
    viewport_width: f64,
}

impl InputDispatcher {
    pub fn new(platform: Platform, viewport_width: f64) -> Self {
        Self {
            platform,
            viewport_width,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Width used by the zoom-to-fit binding, in pixels.
    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    pub fn resolve(&self, event: &KeyEvent) -> Option<Action> {
        if event.target == FocusTarget::TextInput {
            return None;
        }
        let mods = &event.modifiers;
        let primary = self.platform.primary_held(mods);

        match event.key {
            Key::Space if !primary => Some(Action::TogglePlayPause),
            Key::ArrowLeft | Key::ArrowRight if !primary => {
                let step = if mods.shift {
                    SCRUB_STEP_LARGE
                } else {
                    SCRUB_STEP
                };
                let delta = if event.key == Key::ArrowLeft { -step } else { step };
                Some(Action::ScrubBy { delta })
            }
            Key::Home => Some(Action::JumpToStart),
            Key::End => Some(Action::JumpToEnd),
            Key::Delete | Key::Backspace => Some(Action::DeleteSelection),
            Key::Char(c) if primary => match c.to_ascii_lowercase() {
                'z' if mods.shift => Some(Action::Redo),
                'z' => Some(Action::Undo),
                'c' => Some(Action::Copy),
                'x' => Some(Action::Cut),
                'v' => Some(Action::Paste),
                'a' => Some(Action::SelectAll),
                '=' | '+' => Some(Action::ZoomIn),
                '-' | '_' => Some(Action::ZoomOut),
                '0' => Some(Action::ZoomToFit),
                _ => None,
            },
            Key::Char(c) if mods.is_empty() => match c.to_ascii_lowercase() {
                'c' => Some(Action::SplitAtPlayhead),
                'j' => Some(Action::ScrubBy {
                    delta: -SHUTTLE_STEP,
                }),
                'k' => Some(Action::Pause),
                'l' => Some(Action::ScrubBy {
                    delta: SHUTTLE_STEP,
                }),
                _ => None,
            },
            _ => None,
        }
    }

    /// Resolve `event` and run the action. Returns the action when the key
    /// was consumed.
    pub fn dispatch(&self, editor: &mut Editor, event: &KeyEvent) -> Option<Action> {
        let action = self.resolve(event)?;
        match action {
            Action::TogglePlayPause => editor.toggle_play_pause(),
            Action::ScrubBy { delta } => editor.seek_by(delta),
            Action::JumpToStart => editor.jump_to_start(),
            Action::JumpToEnd => editor.jump_to_end(),
            Action::DeleteSelection => {
                editor.delete_selected();
            }
            Action::Undo => {
                editor.undo();
            }
            Action::Redo => {
                editor.redo();
            }
            Action::Copy => {
                editor.copy();
            }
            Action::Cut => {
                editor.cut();
            }
            Action::Paste => {
                editor.paste();
            }
            Action::SelectAll => editor.select_all(),
            Action::SplitAtPlayhead => {
                // Bare C only splits a single selected element; otherwise the key passes through.
                editor.timeline().single_selection()?;
                editor.split_at_playhead();
            }
            Action::Pause => editor.pause(),
            Action::ZoomIn => editor.zoom_in(),
            Action::ZoomOut => editor.zoom_out(),
            Action::ZoomToFit => {
                editor.zoom_to_fit(self.viewport_width);
            }
        }
        tracing::debug!(?action, key = ?event.key, "Key dispatched");
        Some(action)
    }
}

impl Default for InputDispatcher {
    fn default() -> Self {
        Self::new(Platform::current(), 1000.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
