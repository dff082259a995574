//! Lesson 2: a bitmap background repeated four times with a bitmap centered on top

mod common;

use lesson_engine::core::LessonConfig;
use lesson_engine::lessons::lesson_02;
use lesson_engine::render::VulkanBackend;
use std::process::ExitCode;

fn main() -> ExitCode {
    common::run(LessonConfig::lesson_02, |config, out| {
        lesson_02(VulkanBackend::new, config, out)
    })
}
