//! Lesson 4: one image redrawn every frame until a key, click or close

mod common;

use lesson_engine::core::LessonConfig;
use lesson_engine::lessons::lesson_04;
use lesson_engine::render::VulkanBackend;
use std::process::ExitCode;

fn main() -> ExitCode {
    common::run(LessonConfig::lesson_04, |config, out| {
        let stats = lesson_04(VulkanBackend::new, config, out)?;
        log::info!("Drew {} frames at {:.1} fps", stats.frames, stats.average_fps);
        Ok(stats)
    })
}
