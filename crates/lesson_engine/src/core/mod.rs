//! Core configuration shared by every lesson

pub mod config;

pub use config::{AssetPaths, Config, ConfigError, LessonConfig, RendererConfig, WindowConfig};
