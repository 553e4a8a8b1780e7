use crate::error::Result;
use crate::types::CompositionSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Session-wide editor configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// Output canvas and the session fps.
    pub composition: CompositionSettings,

    pub zoom: ZoomConfig,

    /// Placement length for media added without an explicit end (seconds).
    pub default_media_duration: f64,

    /// Placement length for text added without an explicit end (seconds).
    pub default_text_duration: f64,

    /// Maximum number of history snapshots retained.
    pub history_limit: usize,

    /// Minimum time delta before a playback tick is pushed into the store (seconds).
    pub sync_threshold: f64,

    /// Distance within which moved elements snap to edges (seconds).
    pub snap_threshold: f64,

    pub logging: LoggingConfig,
}

/// Timeline zoom, in pixels per second.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZoomConfig {
    pub initial: f64,
    pub step: f64,
    pub min: f64,
    pub max: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "lessonreel_core=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            composition: preset_shorts(),
            zoom: ZoomConfig::default(),
            default_media_duration: 5.0,
            default_text_duration: 3.0,
            history_limit: 200,
            sync_threshold: 0.05,
            snap_threshold: 0.1,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            initial: 50.0,
            step: 1.25,
            min: 5.0,
            max: 1000.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl EditorConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: EditorConfig = serde_json::from_str(&data)?;
        Ok(config)
    }

    /// Load a JSON config file, falling back to defaults when it is missing or malformed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// 1080x1920 30fps (vertical/shorts) preset.
pub fn preset_shorts() -> CompositionSettings {
    CompositionSettings {
        width: 1080,
        height: 1920,
        fps: 30,
    }
}

/// 1920x1080 30fps preset.
pub fn preset_1080p() -> CompositionSettings {
    CompositionSettings {
        width: 1920,
        height: 1080,
        fps: 30,
    }
}

/// 1280x720 30fps preset.
pub fn preset_720p() -> CompositionSettings {
    CompositionSettings {
        width: 1280,
        height: 720,
        fps: 30,
    }
}

/// 1080x1080 30fps preset.
pub fn preset_square() -> CompositionSettings {
    CompositionSettings {
        width: 1080,
        height: 1080,
        fps: 30,
    }
}

/// 1920x1080 60fps preset.
pub fn preset_1080p_60() -> CompositionSettings {
    CompositionSettings {
        width: 1920,
        height: 1080,
        fps: 60,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("editor.json");

        let config = EditorConfig {
            composition: preset_1080p_60(),
            history_limit: 42,
            ..EditorConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = EditorConfig::load(&path).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{"history_limit": 10, "zoom": {"step": 2.0}}"#).unwrap();

        let loaded = EditorConfig::load(&path).unwrap();
        assert_eq!(loaded.history_limit, 10);
        assert_eq!(loaded.zoom.step, 2.0);
        assert_eq!(loaded.zoom.max, ZoomConfig::default().max);
        assert_eq!(loaded.composition, preset_shorts());
    }

    #[test]
    fn load_nonexistent_file_returns_error() {
        let result = EditorConfig::load("/tmp/does_not_exist_lessonreel_config.json");
        assert!(result.is_err());
    }

    #[test]
    fn malformed_file_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(EditorConfig::load_or_default(&path), EditorConfig::default());
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        EditorConfig::default().save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn preset_values_are_correct() {
        let shorts = preset_shorts();
        assert_eq!((shorts.width, shorts.height, shorts.fps), (1080, 1920, 30));

        let p1080 = preset_1080p();
        assert_eq!((p1080.width, p1080.height, p1080.fps), (1920, 1080, 30));

        let p720 = preset_720p();
        assert_eq!((p720.width, p720.height, p720.fps), (1280, 720, 30));

        let square = preset_square();
        assert_eq!((square.width, square.height, square.fps), (1080, 1080, 30));

        let p60 = preset_1080p_60();
        assert_eq!((p60.width, p60.height, p60.fps), (1920, 1080, 60));
    }
}
