//! # Lesson Engine
//!
//! The shared pieces behind the texture lessons: open a window, decode BMP
//! and PNG files into GPU textures, draw them at native size, stretched or
//! tiled, and run a frame loop until the user quits.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lesson_engine::prelude::*;
//!
//! fn main() -> Result<(), LessonError> {
//!     let config = LessonConfig::lesson_04();
//!     let platform = Platform::init(VulkanBackend::new)?;
//!     let images = platform.init_images(ImageFormats::PNG)?;
//!     let window = platform.create_window(&config.window)?;
//!     let renderer = window.create_renderer(&config.renderer)?;
//!     let image = renderer.load_texture(&images, &config.assets.image)?;
//!
//!     run_until_quit(&platform, || {
//!         renderer.clear()?;
//!         renderer.render_texture(&image, 0, 0)?;
//!         renderer.present()
//!     })?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod foundation;
pub mod lessons;
pub mod platform;
pub mod render;

pub use error::LessonError;

/// Common imports for lessons
pub mod prelude {
    pub use crate::{
        assets::{ImageContext, ImageData, ImageFormats},
        core::{AssetPaths, Config, LessonConfig, RendererConfig, WindowConfig},
        error::LessonError,
        events::{run_until_quit, Event, FrameStats},
        foundation::{
            geometry::Rect,
            logging::{self, report_error},
        },
        platform::Platform,
        render::{
            load_texture,
            scene::{centered_position, draw_centered, draw_native_quad, draw_tiled_background},
            Backend, HeadlessBackend, Renderer, Texture, TileGrid, VulkanBackend, Window,
        },
    };
}
