//! # Lesson Configuration
//!
//! Every lesson runs from a [`LessonConfig`]. The built-in constructors carry
//! the constants each lesson was written against; a `.toml` or `.ron` file
//! can override any of them.
//!
//! ```toml
//! tile_size = 40
//! present_delay_ms = 2000
//!
//! [window]
//! title = "Lesson 3"
//! x = 100
//! y = 100
//! width = 640
//! height = 480
//!
//! [renderer]
//! application_name = "lesson_03"
//! vsync = true
//! clear_color = [0, 0, 0, 255]
//!
//! [assets]
//! background = "resources/img/lesson_03/background.png"
//! image = "resources/img/lesson_03/image.png"
//! ```

use serde::{Serialize, Deserialize};
use std::path::PathBuf;

pub use crate::config::{Config, ConfigError};

/// Window placement and size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Screen x of the top-left corner
    pub x: i32,
    /// Screen y of the top-left corner
    pub y: i32,
    /// Client area width in pixels
    pub width: u32,
    /// Client area height in pixels
    pub height: u32,
}

impl WindowConfig {
    /// Create a window config at the default position
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Lesson".to_string(),
            x: 100,
            y: 100,
            width: 640,
            height: 480,
        }
    }
}

/// Rendering context settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Application name for Vulkan instance creation
    pub application_name: String,
    /// Present in step with the display refresh
    pub vsync: bool,
    /// Whether to enable Vulkan validation layers, `None` follows the build type
    pub enable_validation: Option<bool>,
    /// RGBA color used by `clear`
    pub clear_color: [u8; 4],
}

impl RendererConfig {
    /// Create a renderer config for the named application
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            application_name: app_name.into(),
            ..Self::default()
        }
    }

    /// Whether validation layers should be requested
    pub fn validation_enabled(&self) -> bool {
        self.enable_validation.unwrap_or(cfg!(debug_assertions))
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            application_name: "lesson".to_string(),
            vsync: true,
            enable_validation: None,
            clear_color: [0, 0, 0, 255],
        }
    }
}

/// Image files a lesson draws
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AssetPaths {
    /// Background texture, tiled across the window
    pub background: Option<PathBuf>,
    /// Foreground texture
    pub image: PathBuf,
}

/// Everything a single lesson run needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonConfig {
    /// Window settings
    pub window: WindowConfig,
    /// Renderer settings
    pub renderer: RendererConfig,
    /// Edge length of one background tile
    pub tile_size: u32,
    /// How long a single-frame lesson keeps its frame on screen
    pub present_delay_ms: u64,
    /// Image files
    pub assets: AssetPaths,
}

impl Default for LessonConfig {
    fn default() -> Self {
        Self::lesson_03()
    }
}

impl Config for LessonConfig {}

impl LessonConfig {
    /// Bitmap background drawn 2x2 at native size with a centered bitmap on top
    pub fn lesson_02() -> Self {
        Self {
            window: WindowConfig::new("Lesson 2", 640, 480),
            renderer: RendererConfig::new("lesson_02"),
            tile_size: 0,
            present_delay_ms: 2000,
            assets: AssetPaths {
                background: Some(PathBuf::from("resources/img/lesson_02/background.bmp")),
                image: PathBuf::from("resources/img/lesson_02/image.bmp"),
            },
        }
    }

    /// PNG background tiled in 40px squares with a centered PNG on top
    pub fn lesson_03() -> Self {
        Self {
            window: WindowConfig::new("Lesson 3", 640, 480),
            renderer: RendererConfig::new("lesson_03"),
            tile_size: 40,
            present_delay_ms: 2000,
            assets: AssetPaths {
                background: Some(PathBuf::from("resources/img/lesson_03/background.png")),
                image: PathBuf::from("resources/img/lesson_03/image.png"),
            },
        }
    }

    /// One PNG redrawn every frame until the user quits
    pub fn lesson_04() -> Self {
        Self {
            window: WindowConfig::new("Lesson 4", 640, 480),
            renderer: RendererConfig::new("lesson_04"),
            tile_size: 40,
            present_delay_ms: 0,
            assets: AssetPaths {
                background: None,
                image: PathBuf::from("resources/img/lesson_04/image.png"),
            },
        }
    }

    /// `defaults`, overridden by the file named in the first command-line argument
    pub fn from_args_or(
        mut args: impl Iterator<Item = String>,
        defaults: fn() -> Self,
    ) -> Result<Self, ConfigError> {
        match args.nth(1) {
            Some(path) => {
                log::info!("Loading lesson config from {}", path);
                defaults().overlay_file(path)
            }
            None => Ok(defaults()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lesson_engine_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_lesson_constants() {
        let lesson = LessonConfig::lesson_03();
        assert_eq!(lesson.window.width, 640);
        assert_eq!(lesson.window.height, 480);
        assert_eq!((lesson.window.x, lesson.window.y), (100, 100));
        assert_eq!(lesson.tile_size, 40);
        assert!(lesson.renderer.vsync);

        assert_eq!(LessonConfig::lesson_02().window.title, "Lesson 2");
        assert!(LessonConfig::lesson_04().assets.background.is_none());
    }

    #[test]
    fn test_toml_round_trip_and_partial_file() {
        let path = temp_path("partial.toml");
        std::fs::write(&path, "tile_size = 32\n[window]\nwidth = 800\n").unwrap();

        let loaded = LessonConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.tile_size, 32);
        assert_eq!(loaded.window.width, 800);
        // Missing keys fall back to defaults
        assert_eq!(loaded.window.height, 480);
        assert_eq!(loaded.renderer.clear_color, [0, 0, 0, 255]);

        let saved = temp_path("saved.toml");
        loaded.save_to_file(&saved).unwrap();
        assert_eq!(LessonConfig::load_from_file(&saved).unwrap(), loaded);

        let _ = std::fs::remove_file(path);
        let _ = std::fs::remove_file(saved);
    }

    #[test]
    fn test_ron_overlay_keeps_missing_background() {
        let path = temp_path("tweak.ron");
        std::fs::write(&path, "(window: (title: \"Slow\"), present_delay_ms: 5)").unwrap();

        let config = LessonConfig::lesson_04().overlay_file(&path).unwrap();
        assert_eq!(config.window.title, "Slow");
        assert_eq!(config.window.width, 640);
        assert_eq!(config.present_delay_ms, 5);
        assert_eq!(config.assets, LessonConfig::lesson_04().assets);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_ron_file() {
        let path = temp_path("lesson.ron");
        let config = LessonConfig::lesson_04();
        config.save_to_file(&path).unwrap();
        assert_eq!(LessonConfig::load_from_file(&path).unwrap(), config);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_from_args() {
        let args = vec!["lesson_02".to_string()];
        let config = LessonConfig::from_args_or(args.into_iter(), LessonConfig::lesson_02).unwrap();
        assert_eq!(config, LessonConfig::lesson_02());

        let path = temp_path("tweak.toml");
        std::fs::write(&path, "[window]\nwidth = 800\n").unwrap();
        let args = vec!["lesson_02".to_string(), path.display().to_string()];
        let config = LessonConfig::from_args_or(args.into_iter(), LessonConfig::lesson_02).unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 480);
        assert_eq!(config.window.title, "Lesson 2");
        assert_eq!(config.tile_size, 0);
        assert_eq!(config.assets, LessonConfig::lesson_02().assets);
        let _ = std::fs::remove_file(path);

        let args = vec!["lesson_02".to_string(), "/definitely/not/here.toml".to_string()];
        let result = LessonConfig::from_args_or(args.into_iter(), LessonConfig::lesson_02);
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
