//! Helpers shared by the integration tests

#![allow(dead_code)]

use lesson_engine::core::{AssetPaths, LessonConfig};
use lesson_engine::render::headless::{BackendCall, Journal};
use std::path::PathBuf;

/// Write a solid-color image into the temp directory and return its path
pub fn solid_image(name: &str, width: u32, height: u32, color: [u8; 4], format: image::ImageFormat) -> PathBuf {
    let path = std::env::temp_dir().join(format!("lesson_engine_it_{}_{}", std::process::id(), name));
    image::RgbaImage::from_pixel(width, height, image::Rgba(color))
        .save_with_format(&path, format)
        .unwrap();
    path
}

/// Path that is guaranteed not to exist
pub fn missing_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("lesson_engine_it_{}_missing_{}", std::process::id(), name))
}

/// Lesson config pointing at the given files, with no on-screen delay
pub fn config_with(mut config: LessonConfig, background: Option<PathBuf>, image: PathBuf) -> LessonConfig {
    config.assets = AssetPaths { background, image };
    config.present_delay_ms = 0;
    config
}

/// Only the calls that create or destroy something
pub fn lifecycle(journal: &Journal) -> Vec<BackendCall> {
    journal
        .calls()
        .into_iter()
        .filter(|call| {
            !matches!(
                call,
                BackendCall::Clear | BackendCall::Copy { .. } | BackendCall::Present
            )
        })
        .collect()
}

/// Everything written to a reporter sink
pub fn lines(out: &[u8]) -> Vec<String> {
    String::from_utf8(out.to_vec())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
