//! Application configuration, loaded from `lienzo.toml` with
//! environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use lienzo_core::Color;

use crate::error::{Result, SceneError};

/// Top level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Window settings
    pub window: WindowConfig,
    /// Scene and render loop settings
    pub scene: SceneConfig,
    /// Debugging aids
    pub debug: DebugConfig,
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial window width in pixels
    pub width: u32,
    /// Initial window height in pixels
    pub height: u32,
}

/// Scene and render loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Logical screen height; the coordinate space scales so this many
    /// units always span the window vertically
    pub logical_screen_height: f32,
    /// Frame rate cap for the update loop
    pub frames_per_second: f32,
    /// Clear color as `[r, g, b]` channels in `0..=1`
    pub background_color: [f32; 3],
}

/// Debugging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Overlay every node's final bounding box
    pub show_bounding_boxes: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "lienzo".into(),
            width: 1280,
            height: 720,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            logical_screen_height: 1000.0,
            frames_per_second: 60.0,
            background_color: [0.0, 0.0, 0.0],
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_bounding_boxes: false,
        }
    }
}

impl SceneConfig {
    pub fn background(&self) -> Color {
        let [red, green, blue] = self.background_color;
        Color::rgb(red, green, blue)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SceneError::Config(format!("failed to read config file: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| SceneError::Config(format!("failed to parse config file: {e}")))
    }

    /// Load configuration from `lienzo.toml` in the current directory,
    /// falling back to defaults when the file doesn't exist.
    pub fn load_or_default() -> Self {
        match Self::load_from_file("lienzo.toml") {
            Ok(config) => config,
            Err(error) => {
                log::debug!("using default configuration: {error}");
                Self::default()
            }
        }
    }

    /// Environment variables take precedence over configuration file
    /// values, allowing temporary overrides without editing the file.
    pub fn merge_with_env(&mut self) {
        if let Ok(title) = std::env::var("LIENZO_WINDOW_TITLE") {
            self.window.title = title;
        }
        if let Ok(val) = std::env::var("LIENZO_WINDOW_WIDTH") {
            if let Ok(width) = val.parse::<u32>() {
                self.window.width = width;
            }
        }
        if let Ok(val) = std::env::var("LIENZO_WINDOW_HEIGHT") {
            if let Ok(height) = val.parse::<u32>() {
                self.window.height = height;
            }
        }
        if let Ok(val) = std::env::var("LIENZO_LOGICAL_SCREEN_HEIGHT") {
            if let Ok(height) = val.parse::<f32>() {
                self.scene.logical_screen_height = height;
            }
        }
        if let Ok(val) = std::env::var("LIENZO_FPS") {
            if let Ok(fps) = val.parse::<f32>() {
                self.scene.frames_per_second = fps;
            }
        }
        if let Ok(val) = std::env::var("LIENZO_SHOW_BOUNDING_BOXES") {
            self.debug.show_bounding_boxes = val == "1" || val.eq_ignore_ascii_case("true");
        }
    }

    /// Load from `lienzo.toml` (or defaults) and apply environment
    /// overrides.
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
