pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod history;
pub mod input;
pub mod logging;
pub mod sanitize;
pub mod snapping;
pub mod timeline;
pub mod types;

pub use config::EditorConfig;
pub use editor::Editor;
pub use error::{CoreError, Result};
pub use input::{Action, InputDispatcher, Key, KeyEvent, Modifiers, Platform};
pub use timeline::Timeline;
pub use types::*;
