//! The lesson programs, generic over the backend
//!
//! Each function runs one lesson start to finish. Resources are locals
//! declared in creation order, so any early return releases exactly what
//! was created, newest first. Errors come back unreported except
//! [`LessonError::MissingTextures`], whose causes were reported as they
//! happened; see [`LessonError::report`].

use crate::assets::{ImageContext, ImageFormats};
use crate::core::{AssetPaths, LessonConfig};
use crate::error::LessonError;
use crate::events::{run_until_quit, FrameStats};
use crate::platform::Platform;
use crate::render::backend::{Backend, BackendResult};
use crate::render::renderer::Renderer;
use crate::render::scene::{draw_centered, draw_native_quad, draw_tiled_background};
use crate::render::texture::{load_texture, Texture};
use crate::render::tiling::TileGrid;
use std::io::Write;

/// Bitmap background four times at native size, bitmap centered on top, one frame
pub fn lesson_02<B, F>(create: F, config: &LessonConfig, out: &mut dyn Write) -> Result<(), LessonError>
where
    B: Backend,
    F: FnOnce() -> BackendResult<B>,
{
    let platform = Platform::init(create)?;
    let images = platform.init_images(ImageFormats::BMP)?;
    let window = platform.create_window(&config.window)?;
    let renderer = window.create_renderer(&config.renderer)?;
    let (background, image) = load_lesson_textures(&renderer, &images, &config.assets, out)?;
    let (width, height) = window.size();

    renderer.clear()?;
    if let Some(background) = &background {
        draw_native_quad(&renderer, background)?;
    }
    draw_centered(&renderer, &image, width, height)?;
    renderer.present()?;

    platform.delay(config.present_delay_ms);
    Ok(())
}

/// PNG background tiled across the window, PNG centered on top, one frame
pub fn lesson_03<B, F>(create: F, config: &LessonConfig, out: &mut dyn Write) -> Result<(), LessonError>
where
    B: Backend,
    F: FnOnce() -> BackendResult<B>,
{
    let platform = Platform::init(create)?;
    let images = platform.init_images(ImageFormats::PNG)?;
    let window = platform.create_window(&config.window)?;
    let renderer = window.create_renderer(&config.renderer)?;
    let (background, image) = load_lesson_textures(&renderer, &images, &config.assets, out)?;
    let (width, height) = window.size();

    renderer.clear()?;
    if let Some(background) = &background {
        let grid = TileGrid::new(width, height, config.tile_size);
        let tiles = draw_tiled_background(&renderer, background, &grid)?;
        log::debug!("Drew {} background tiles ({}x{})", tiles, grid.columns(), grid.rows());
    }
    draw_centered(&renderer, &image, width, height)?;
    renderer.present()?;

    platform.delay(config.present_delay_ms);
    Ok(())
}

/// One PNG at the window origin, redrawn every frame until the user quits
pub fn lesson_04<B, F>(create: F, config: &LessonConfig, out: &mut dyn Write) -> Result<FrameStats, LessonError>
where
    B: Backend,
    F: FnOnce() -> BackendResult<B>,
{
    let platform = Platform::init(create)?;
    let images = platform.init_images(ImageFormats::PNG)?;
    let window = platform.create_window(&config.window)?;
    let renderer = window.create_renderer(&config.renderer)?;
    let (_, image) = load_lesson_textures(&renderer, &images, &config.assets, out)?;

    let stats = run_until_quit(&platform, || {
        renderer.clear()?;
        renderer.render_texture(&image, 0, 0)?;
        renderer.present()
    })?;
    Ok(stats)
}

/// Load the optional background and the foreground image
///
/// Both loads are attempted and every failure reported, then a single
/// failure aborts the lesson; textures that did load are released here.
fn load_lesson_textures<'r, B: Backend>(
    renderer: &'r Renderer<'_, B>,
    images: &ImageContext<'_, B>,
    assets: &AssetPaths,
    out: &mut dyn Write,
) -> Result<(Option<Texture<'r, B>>, Texture<'r, B>), LessonError> {
    let background = assets
        .background
        .as_ref()
        .map(|path| load_texture(renderer, images, path, &mut *out));
    let image = load_texture(renderer, images, &assets.image, out);

    match (background, image) {
        (None, Some(image)) => Ok((None, image)),
        (Some(Some(background)), Some(image)) => Ok((Some(background), image)),
        (background, image) => {
            let failed = usize::from(matches!(background, Some(None))) + usize::from(image.is_none());
            Err(LessonError::MissingTextures(failed))
        }
    }
}
