//! Rendering context bound to the window

use crate::assets::{ImageContext, ImageData};
use crate::core::RendererConfig;
use crate::error::LessonError;
use crate::foundation::geometry::Rect;
use crate::platform::Platform;
use crate::render::backend::{Backend, BackendResult};
use crate::render::texture::Texture;
use std::path::Path;

/// GPU context for the window it was created from; destroyed when dropped
///
/// Draw calls accumulate into the current frame until [`Renderer::present`].
pub struct Renderer<'w, B: Backend> {
    platform: &'w Platform<B>,
}

impl<'w, B: Backend> Renderer<'w, B> {
    pub(crate) fn create(platform: &'w Platform<B>, config: &RendererConfig) -> BackendResult<Self> {
        platform.with_backend(|backend| backend.create_renderer(config))?;
        log::info!(
            "Renderer created for '{}' (vsync: {})",
            config.application_name,
            config.vsync
        );
        Ok(Self { platform })
    }

    /// Upload already decoded pixels
    pub fn create_texture(&self, image: &ImageData) -> Result<Texture<'_, B>, LessonError> {
        Texture::upload(self.platform, image).map_err(LessonError::Render)
    }

    /// Decode an image file and upload it
    ///
    /// The image subsystem must be running and started with the file's
    /// format.
    pub fn load_texture<P: AsRef<Path>>(
        &self,
        images: &ImageContext<'_, B>,
        path: P,
    ) -> Result<Texture<'_, B>, LessonError> {
        let path = path.as_ref();
        let image = ImageData::from_file_with(path, images.formats()).map_err(|source| {
            LessonError::DecodeTexture {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Texture::upload(self.platform, &image).map_err(|source| LessonError::UploadTexture {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fill the frame with the clear color
    pub fn clear(&self) -> Result<(), LessonError> {
        self.platform
            .with_backend(B::clear)
            .map_err(LessonError::Render)
    }

    /// Copy the whole texture into `dst`, scaling it to fit
    pub fn copy(&self, texture: &Texture<'_, B>, dst: Rect) -> Result<(), LessonError> {
        self.platform
            .with_backend(|backend| backend.copy(texture.id(), dst))
            .map_err(LessonError::Render)
    }

    /// Draw `texture` with its top-left corner at `(x, y)`, scaled to `w`x`h`
    pub fn render_texture_scaled(
        &self,
        texture: &Texture<'_, B>,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
    ) -> Result<(), LessonError> {
        self.copy(texture, Rect::new(x, y, w, h))
    }

    /// Draw `texture` at its own size with its top-left corner at `(x, y)`
    pub fn render_texture(&self, texture: &Texture<'_, B>, x: i32, y: i32) -> Result<(), LessonError> {
        let (w, h) = texture.size();
        self.render_texture_scaled(texture, x, y, w, h)
    }

    /// Show everything drawn since the last present
    pub fn present(&self) -> Result<(), LessonError> {
        self.platform
            .with_backend(B::present)
            .map_err(LessonError::Render)
    }
}

impl<B: Backend> Drop for Renderer<'_, B> {
    fn drop(&mut self) {
        self.platform.with_backend(B::destroy_renderer);
        log::debug!("Renderer destroyed");
    }
}
