//! Lesson 3: a tiled PNG background with a PNG centered on top

mod common;

use lesson_engine::core::LessonConfig;
use lesson_engine::lessons::lesson_03;
use lesson_engine::render::VulkanBackend;
use std::process::ExitCode;

fn main() -> ExitCode {
    common::run(LessonConfig::lesson_03, |config, out| {
        lesson_03(VulkanBackend::new, config, out)
    })
}
