//! GPU textures and the reporting texture loader

use crate::assets::{ImageContext, ImageData};
use crate::foundation::logging::report_error;
use crate::platform::Platform;
use crate::render::backend::{Backend, BackendResult, TextureId};
use crate::render::renderer::Renderer;
use std::io::Write;
use std::path::Path;

/// Label used when [`load_texture`] reports a failure
pub const LOAD_TEXTURE_LABEL: &str = "LoadTexture";

/// Image uploaded to the renderer it was created from; released when dropped
pub struct Texture<'r, B: Backend> {
    platform: &'r Platform<B>,
    id: TextureId,
    width: u32,
    height: u32,
}

impl<'r, B: Backend> Texture<'r, B> {
    pub(crate) fn upload(platform: &'r Platform<B>, image: &ImageData) -> BackendResult<Self> {
        let id = platform.with_backend(|backend| backend.create_texture(image))?;
        log::debug!("Uploaded {}x{} texture {:?}", image.width, image.height, id);
        Ok(Self {
            platform,
            id,
            width: image.width,
            height: image.height,
        })
    }

    /// Backend handle
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Intrinsic width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Intrinsic height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Intrinsic `(width, height)` in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl<B: Backend> Drop for Texture<'_, B> {
    fn drop(&mut self) {
        let id = self.id;
        self.platform.with_backend(|backend| backend.destroy_texture(id));
        log::trace!("Released texture {:?}", id);
    }
}

/// Load an image file into a texture, reporting failure instead of returning it
///
/// Any decode or upload failure writes exactly one `LoadTexture error: ...`
/// line to `sink` and yields `None`. Nothing is retried.
pub fn load_texture<'r, B: Backend>(
    renderer: &'r Renderer<'_, B>,
    images: &ImageContext<'_, B>,
    path: impl AsRef<Path>,
    sink: &mut dyn Write,
) -> Option<Texture<'r, B>> {
    match renderer.load_texture(images, path) {
        Ok(texture) => Some(texture),
        Err(error) => {
            report_error(sink, LOAD_TEXTURE_LABEL, &error);
            None
        }
    }
}
