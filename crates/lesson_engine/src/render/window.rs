//! The lesson window

use crate::core::{RendererConfig, WindowConfig};
use crate::error::LessonError;
use crate::platform::Platform;
use crate::render::backend::{Backend, BackendResult};
use crate::render::renderer::Renderer;

/// An open window; closed when dropped
pub struct Window<'p, B: Backend> {
    platform: &'p Platform<B>,
    title: String,
    width: u32,
    height: u32,
}

impl<'p, B: Backend> Window<'p, B> {
    pub(crate) fn open(platform: &'p Platform<B>, config: &WindowConfig) -> BackendResult<Self> {
        platform.with_backend(|backend| backend.create_window(config))?;
        log::info!(
            "Opened window '{}' {}x{} at ({}, {})",
            config.title,
            config.width,
            config.height,
            config.x,
            config.y
        );
        Ok(Self {
            platform,
            title: config.title.clone(),
            width: config.width,
            height: config.height,
        })
    }

    /// Create the rendering context for this window
    pub fn create_renderer(&self, config: &RendererConfig) -> Result<Renderer<'_, B>, LessonError> {
        Renderer::create(self.platform, config).map_err(LessonError::CreateRenderer)
    }

    /// Requested client area size
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl<B: Backend> Drop for Window<'_, B> {
    fn drop(&mut self) {
        self.platform.with_backend(B::destroy_window);
        log::debug!("Closed window '{}'", self.title);
    }
}
