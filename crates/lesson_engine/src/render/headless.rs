//! CPU backend with no window
//!
//! Draws into an RGBA8 frame buffer, records every call it receives in a
//! shared [`Journal`], and replays scripted input. Tests run every lesson
//! path through it without a display or GPU.

use crate::assets::{ImageData, ImageFormats};
use crate::core::{RendererConfig, WindowConfig};
use crate::events::Event;
use crate::foundation::geometry::Rect;
use crate::render::backend::{Backend, BackendError, BackendResult, TextureId};
use slotmap::SlotMap;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// One call received by a [`HeadlessBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    /// Image subsystem started
    ImageSubsystemStarted(ImageFormats),
    /// Image subsystem stopped
    ImageSubsystemStopped,
    /// Window opened
    CreateWindow {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// Window closed
    DestroyWindow,
    /// Renderer created
    CreateRenderer,
    /// Renderer destroyed
    DestroyRenderer,
    /// Texture uploaded
    CreateTexture {
        /// Handle given out
        id: TextureId,
        /// Texture width
        width: u32,
        /// Texture height
        height: u32,
    },
    /// Texture released
    DestroyTexture(TextureId),
    /// Frame cleared
    Clear,
    /// Texture copied into a destination rectangle
    Copy {
        /// Source texture
        texture: TextureId,
        /// Requested destination, before clipping
        dst: Rect,
    },
    /// Frame shown
    Present,
    /// Windowing system shut down
    Shutdown,
}

/// Step a [`HeadlessBackend`] can be told to refuse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    /// `create_window`
    Window,
    /// `create_renderer`
    Renderer,
    /// `create_texture`
    TextureUpload,
}

/// Shared, cloneable view of the calls a backend received
///
/// Outlives the backend, so teardown can be inspected after the platform
/// is gone.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<BackendCall>>>);

impl Journal {
    /// Every call so far, oldest first
    pub fn calls(&self) -> Vec<BackendCall> {
        self.0.borrow().clone()
    }

    /// Copies recorded so far
    pub fn copies(&self) -> Vec<(TextureId, Rect)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|call| match call {
                BackendCall::Copy { texture, dst } => Some((*texture, *dst)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: BackendCall) {
        self.0.borrow_mut().push(call);
    }
}

/// Backend that renders into memory
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    journal: Journal,
    window: Option<(u32, u32)>,
    renderer: Option<[u8; 4]>,
    textures: SlotMap<TextureId, ImageData>,
    frame: Vec<u8>,
    presented: Option<ImageData>,
    events: VecDeque<Vec<Event>>,
    failures: Vec<FailPoint>,
}

impl HeadlessBackend {
    /// Backend with no scripted input and no failures
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one batch of events per poll
    ///
    /// A quit event is appended to the final batch, as if the user closed
    /// the window once the script ran out. With no batches at all the first
    /// poll quits.
    pub fn with_event_batches(mut self, batches: Vec<Vec<Event>>) -> Self {
        self.events = batches.into();
        self
    }

    /// Refuse the given step
    pub fn with_failure(mut self, point: FailPoint) -> Self {
        self.failures.push(point);
        self
    }

    /// Handle to this backend's call journal
    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    /// Pixel in the frame being drawn
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let (width, height) = self.window?;
        if x >= width || y >= height {
            return None;
        }
        let offset = (y as usize * width as usize + x as usize) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(self.frame.get(offset..offset + 4)?);
        Some(rgba)
    }

    /// Frame captured by the last `present`
    pub fn last_presented(&self) -> Option<&ImageData> {
        self.presented.as_ref()
    }

    /// Number of textures currently alive
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    fn fails(&self, point: FailPoint) -> bool {
        self.failures.contains(&point)
    }

    fn output_size(&self) -> (u32, u32) {
        self.window.unwrap_or((0, 0))
    }

    fn require_renderer(&self) -> BackendResult<[u8; 4]> {
        self.renderer.ok_or(BackendError::NoRenderer)
    }
}

impl Backend for HeadlessBackend {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn image_subsystem_started(&mut self, formats: ImageFormats) {
        self.journal.record(BackendCall::ImageSubsystemStarted(formats));
    }

    fn image_subsystem_stopped(&mut self) {
        self.journal.record(BackendCall::ImageSubsystemStopped);
    }

    fn create_window(&mut self, config: &WindowConfig) -> BackendResult<()> {
        if self.fails(FailPoint::Window) {
            return Err(BackendError::WindowCreationFailed("refused by headless backend".into()));
        }
        if config.width == 0 || config.height == 0 {
            return Err(BackendError::WindowCreationFailed(format!(
                "invalid size {}x{}",
                config.width, config.height
            )));
        }

        self.window = Some((config.width, config.height));
        self.frame = vec![0; config.width as usize * config.height as usize * 4];
        self.journal.record(BackendCall::CreateWindow {
            width: config.width,
            height: config.height,
        });
        Ok(())
    }

    fn destroy_window(&mut self) {
        self.window = None;
        self.frame.clear();
        self.journal.record(BackendCall::DestroyWindow);
    }

    fn create_renderer(&mut self, config: &RendererConfig) -> BackendResult<()> {
        if self.window.is_none() {
            return Err(BackendError::NoWindow);
        }
        if self.fails(FailPoint::Renderer) {
            return Err(BackendError::RendererCreationFailed("refused by headless backend".into()));
        }

        self.renderer = Some(config.clear_color);
        self.journal.record(BackendCall::CreateRenderer);
        Ok(())
    }

    fn destroy_renderer(&mut self) {
        self.renderer = None;
        self.textures.clear();
        self.journal.record(BackendCall::DestroyRenderer);
    }

    fn create_texture(&mut self, image: &ImageData) -> BackendResult<TextureId> {
        self.require_renderer()?;
        if self.fails(FailPoint::TextureUpload) {
            return Err(BackendError::TextureUploadFailed("refused by headless backend".into()));
        }
        let expected = image.width as usize * image.height as usize * 4;
        if image.data.len() != expected {
            return Err(BackendError::TextureUploadFailed(format!(
                "{}x{} image carries {} bytes, expected {}",
                image.width,
                image.height,
                image.data.len(),
                expected
            )));
        }

        let id = self.textures.insert(image.clone());
        self.journal.record(BackendCall::CreateTexture {
            id,
            width: image.width,
            height: image.height,
        });
        Ok(id)
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.textures.remove(texture);
        self.journal.record(BackendCall::DestroyTexture(texture));
    }

    fn clear(&mut self) -> BackendResult<()> {
        let color = self.require_renderer()?;
        for pixel in self.frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
        self.journal.record(BackendCall::Clear);
        Ok(())
    }

    fn copy(&mut self, texture: TextureId, dst: Rect) -> BackendResult<()> {
        self.require_renderer()?;
        let source = self
            .textures
            .get(texture)
            .ok_or(BackendError::UnknownTexture(texture))?;
        self.journal.record(BackendCall::Copy { texture, dst });

        let (width, height) = self.output_size();
        let Some(visible) = dst.intersection(&Rect::from_size(width, height)) else {
            return Ok(());
        };

        // Nearest texel for every visible destination pixel
        for py in visible.y..visible.y + visible.h as i32 {
            let sy = (i64::from(py - dst.y) * i64::from(source.height) / i64::from(dst.h)) as u32;
            for px in visible.x..visible.x + visible.w as i32 {
                let sx = (i64::from(px - dst.x) * i64::from(source.width) / i64::from(dst.w)) as u32;
                if let Some(rgba) = source.pixel(sx, sy) {
                    let offset = (py as usize * width as usize + px as usize) * 4;
                    self.frame[offset..offset + 4].copy_from_slice(&rgba);
                }
            }
        }
        Ok(())
    }

    fn present(&mut self) -> BackendResult<()> {
        self.require_renderer()?;
        let (width, height) = self.output_size();
        self.presented = Some(ImageData {
            data: self.frame.clone(),
            width,
            height,
            channels: 4,
        });
        self.journal.record(BackendCall::Present);
        Ok(())
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) {
        if let Some(batch) = self.events.pop_front() {
            events.extend(batch);
        }
        if self.events.is_empty() {
            events.push(Event::Quit);
        }
    }

    fn shutdown(&mut self) {
        self.journal.record(BackendCall::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawing_backend() -> HeadlessBackend {
        let mut backend = HeadlessBackend::new();
        backend.create_window(&WindowConfig::new("test", 8, 4)).unwrap();
        backend.create_renderer(&RendererConfig::default()).unwrap();
        backend
    }

    #[test]
    fn test_renderer_needs_window() {
        let mut backend = HeadlessBackend::new();
        let result = backend.create_renderer(&RendererConfig::default());
        assert!(matches!(result, Err(BackendError::NoWindow)));
    }

    #[test]
    fn test_clear_uses_configured_color() {
        let mut backend = HeadlessBackend::new();
        backend.create_window(&WindowConfig::new("test", 2, 2)).unwrap();
        let mut config = RendererConfig::default();
        config.clear_color = [1, 2, 3, 4];
        backend.create_renderer(&config).unwrap();
        backend.clear().unwrap();
        assert_eq!(backend.pixel(1, 1), Some([1, 2, 3, 4]));
    }

    #[test]
    fn test_scaled_copy_with_clipping() {
        let mut backend = drawing_backend();
        let mut image = ImageData::solid_color(2, 1, [255, 0, 0, 255]);
        image.data[4..8].copy_from_slice(&[0, 255, 0, 255]);
        let id = backend.create_texture(&image).unwrap();

        backend.clear().unwrap();
        // 2x1 texture stretched to 8x4, shifted so its left half is off screen
        backend.copy(id, Rect::new(-4, 0, 8, 4)).unwrap();

        assert_eq!(backend.pixel(0, 0), Some([0, 255, 0, 255]));
        assert_eq!(backend.pixel(3, 3), Some([0, 255, 0, 255]));
        assert_eq!(backend.pixel(4, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_copy_of_released_texture_fails() {
        let mut backend = drawing_backend();
        let id = backend.create_texture(&ImageData::solid_color(1, 1, [0; 4])).unwrap();
        backend.destroy_texture(id);
        assert!(matches!(
            backend.copy(id, Rect::new(0, 0, 1, 1)),
            Err(BackendError::UnknownTexture(_))
        ));
    }

    #[test]
    fn test_malformed_pixels_rejected() {
        let mut backend = drawing_backend();
        let mut image = ImageData::solid_color(2, 2, [0; 4]);
        image.data.pop();
        assert!(matches!(
            backend.create_texture(&image),
            Err(BackendError::TextureUploadFailed(_))
        ));
    }

    #[test]
    fn test_present_captures_frame() {
        let mut backend = drawing_backend();
        backend.clear().unwrap();
        backend.present().unwrap();
        let frame = backend.last_presented().unwrap();
        assert_eq!((frame.width, frame.height), (8, 4));
        assert_eq!(frame.pixel(7, 3), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_script_ends_with_quit() {
        let mut backend = HeadlessBackend::new().with_event_batches(vec![vec![Event::FocusGained], vec![]]);
        let mut events = Vec::new();
        backend.poll_events(&mut events);
        assert_eq!(events, vec![Event::FocusGained]);
        events.clear();
        backend.poll_events(&mut events);
        assert_eq!(events, vec![Event::Quit]);
    }
}
