//! Texture loading and drawing through the public handles

mod common;

use common::{lines, missing_path, solid_image};
use image::ImageFormat;
use lesson_engine::assets::ImageFormats;
use lesson_engine::core::{RendererConfig, WindowConfig};
use lesson_engine::foundation::geometry::Rect;
use lesson_engine::platform::Platform;
use lesson_engine::render::headless::HeadlessBackend;
use lesson_engine::render::load_texture;
use lesson_engine::render::scene::{draw_centered, draw_tiled_background};
use lesson_engine::render::TileGrid;

const BLACK: [u8; 4] = [0, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

fn renderer_config() -> RendererConfig {
    let mut config = RendererConfig::new("texture_pipeline");
    config.clear_color = BLACK;
    config
}

#[test]
fn test_load_texture_reports_missing_file() {
    let platform = Platform::from_backend(HeadlessBackend::new());
    let images = platform.init_images(ImageFormats::PNG).unwrap();
    let window = platform.create_window(&WindowConfig::new("load", 64, 48)).unwrap();
    let renderer = window.create_renderer(&renderer_config()).unwrap();
    let mut out = Vec::new();

    let good = solid_image("load_good.png", 5, 7, RED, ImageFormat::Png);
    let texture = load_texture(&renderer, &images, &good, &mut out).unwrap();
    assert_eq!(texture.size(), (5, 7));
    assert!(out.is_empty());

    assert!(load_texture(&renderer, &images, missing_path("load.png"), &mut out).is_none());
    let reported = lines(&out);
    assert_eq!(reported.len(), 1);
    assert!(reported[0].starts_with("LoadTexture error: "));
    assert!(reported[0].contains("load.png"));

    assert_eq!(platform.with_backend(|backend| backend.live_textures()), 1);
}

#[test]
fn test_position_only_matches_explicit_size() {
    let platform = Platform::from_backend(HeadlessBackend::new());
    let journal = platform.with_backend(|backend| backend.journal());
    let images = platform.init_images(ImageFormats::PNG).unwrap();
    let window = platform.create_window(&WindowConfig::new("rects", 64, 48)).unwrap();
    let renderer = window.create_renderer(&renderer_config()).unwrap();
    let path = solid_image("rects.png", 12, 9, RED, ImageFormat::Png);
    let texture = renderer.load_texture(&images, &path).unwrap();

    renderer.clear().unwrap();
    renderer.render_texture(&texture, -3, 20).unwrap();
    renderer.render_texture_scaled(&texture, -3, 20, 12, 9).unwrap();

    let copies = journal.copies();
    assert_eq!(copies.len(), 2);
    assert_eq!(copies[0], copies[1]);
    assert_eq!(copies[0].1, Rect::new(-3, 20, 12, 9));
}

#[test]
fn test_tiles_and_centered_image_land_in_frame() {
    let platform = Platform::from_backend(HeadlessBackend::new());
    let images = platform.init_images(ImageFormats::PNG).unwrap();
    let window = platform.create_window(&WindowConfig::new("frame", 100, 60)).unwrap();
    let renderer = window.create_renderer(&renderer_config()).unwrap();
    let background = renderer
        .load_texture(&images, solid_image("frame_bg.png", 2, 2, BLUE, ImageFormat::Png))
        .unwrap();
    let image = renderer
        .load_texture(&images, solid_image("frame_fg.png", 10, 10, RED, ImageFormat::Png))
        .unwrap();

    renderer.clear().unwrap();
    let grid = TileGrid::new(100, 60, 30);
    assert_eq!(draw_tiled_background(&renderer, &background, &grid).unwrap(), 6);
    draw_centered(&renderer, &image, 100, 60).unwrap();
    renderer.present().unwrap();

    platform.with_backend(|backend| {
        // Tiles cover 90x60, the last 10 columns keep the clear color
        assert_eq!(backend.pixel(0, 0), Some(BLUE));
        assert_eq!(backend.pixel(89, 59), Some(BLUE));
        assert_eq!(backend.pixel(95, 30), Some(BLACK));
        assert_eq!(backend.pixel(45, 25), Some(RED));
        assert_eq!(backend.pixel(54, 34), Some(RED));
        assert_eq!(backend.pixel(44, 25), Some(BLUE));

        let shown = backend.last_presented().unwrap();
        assert_eq!((shown.width, shown.height), (100, 60));
        assert_eq!(shown.pixel(50, 30), Some(RED));
    });
}

#[test]
fn test_offscreen_copy_is_clipped() {
    let platform = Platform::from_backend(HeadlessBackend::new());
    let images = platform.init_images(ImageFormats::PNG).unwrap();
    let window = platform.create_window(&WindowConfig::new("clip", 20, 20)).unwrap();
    let renderer = window.create_renderer(&renderer_config()).unwrap();
    let image = renderer
        .load_texture(&images, solid_image("clip.png", 8, 8, RED, ImageFormat::Png))
        .unwrap();

    renderer.clear().unwrap();
    renderer.render_texture(&image, 16, -4).unwrap();
    renderer.render_texture(&image, 100, 100).unwrap();
    renderer.present().unwrap();

    platform.with_backend(|backend| {
        assert_eq!(backend.pixel(19, 0), Some(RED));
        assert_eq!(backend.pixel(16, 3), Some(RED));
        assert_eq!(backend.pixel(16, 4), Some(BLACK));
        assert_eq!(backend.pixel(15, 0), Some(BLACK));
    });
}
