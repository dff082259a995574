//! Layouts the lessons draw

use crate::error::LessonError;
use crate::render::backend::Backend;
use crate::render::renderer::Renderer;
use crate::render::texture::Texture;
use crate::render::tiling::TileGrid;

/// Draw `background` four times at native size in a 2x2 block from the origin
pub fn draw_native_quad<B: Backend>(
    renderer: &Renderer<'_, B>,
    background: &Texture<'_, B>,
) -> Result<(), LessonError> {
    let (w, h) = background.size();
    let (w, h) = (w as i32, h as i32);
    for (x, y) in [(0, 0), (w, 0), (0, h), (w, h)] {
        renderer.render_texture(background, x, y)?;
    }
    Ok(())
}

/// Stretch `background` into every tile of `grid`, returning the tile count
pub fn draw_tiled_background<B: Backend>(
    renderer: &Renderer<'_, B>,
    background: &Texture<'_, B>,
    grid: &TileGrid,
) -> Result<usize, LessonError> {
    let size = grid.tile_size();
    for (x, y) in grid.origins() {
        renderer.render_texture_scaled(background, x, y, size, size)?;
    }
    Ok(grid.len())
}

/// Top-left corner that centers an `image_w` x `image_h` image on the screen
///
/// Both halves are truncated separately, so odd sizes lean up and left.
pub fn centered_position(screen_w: u32, screen_h: u32, image_w: u32, image_h: u32) -> (i32, i32) {
    let half = |n: u32| (n / 2) as i32;
    (half(screen_w) - half(image_w), half(screen_h) - half(image_h))
}

/// Draw `image` at native size centered on a `screen_w` x `screen_h` screen
pub fn draw_centered<B: Backend>(
    renderer: &Renderer<'_, B>,
    image: &Texture<'_, B>,
    screen_w: u32,
    screen_h: u32,
) -> Result<(), LessonError> {
    let (x, y) = centered_position(screen_w, screen_h, image.width(), image.height());
    renderer.render_texture(image, x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_position() {
        assert_eq!(centered_position(640, 480, 100, 50), (270, 215));
        assert_eq!(centered_position(640, 480, 101, 51), (270, 215));
        assert_eq!(centered_position(640, 480, 800, 600), (-80, -60));
    }
}
