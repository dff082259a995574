//! GLFW window plus Vulkan transfer-only renderer
//!
//! Textures live in device-local images. A frame is built from
//! `vkCmdClearColorImage` and nearest-filtered `vkCmdBlitImage` calls
//! straight into the swapchain image, so no shaders or pipelines are needed.

pub mod context;
pub mod frame;
pub mod swapchain;
pub mod texture;
pub mod window;

use crate::assets::ImageData;
use crate::core::{RendererConfig, WindowConfig};
use crate::events::Event;
use crate::foundation::geometry::Rect;
use crate::render::backend::{Backend, BackendError, BackendResult, TextureId};
use ash::vk;
use context::VulkanContext;
use frame::{FrameSync, PresentOutcome};
use slotmap::SlotMap;
use swapchain::Swapchain;
use texture::GpuTexture;
use thiserror::Error;
use window::GlfwWindow;

/// Vulkan-specific error types
#[derive(Error, Debug)]
pub enum VulkanError {
    /// General Vulkan API error with result code
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),

    /// GLFW refused a request
    #[error("GLFW error: {0}")]
    Glfw(String),

    /// Vulkan context initialization failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// The GPU or surface lacks a required capability
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Invalid operation attempted
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// No suitable memory type found for allocation
    #[error("No suitable memory type found")]
    NoSuitableMemoryType,

    /// The surface has no area, e.g. the window is minimized
    #[error("Surface has zero extent")]
    ZeroExtent,
}

/// Result type for Vulkan operations
pub type VulkanResult<T> = Result<T, VulkanError>;

/// How many times a frame retries after rebuilding a stale swapchain
const SWAPCHAIN_RETRIES: usize = 2;

/// Backend that draws into a real window
pub struct VulkanBackend {
    renderer: Option<VulkanRenderer>,
    window: Option<GlfwWindow>,
    glfw: glfw::Glfw,
}

impl VulkanBackend {
    /// Start GLFW and check that a Vulkan loader is present
    pub fn new() -> BackendResult<Self> {
        let glfw = glfw::init(glfw::log_errors)
            .map_err(|e| BackendError::InitializationFailed(format!("GLFW: {:?}", e)))?;

        if !glfw.vulkan_supported() {
            return Err(BackendError::InitializationFailed("no Vulkan loader found".into()));
        }

        Ok(Self {
            renderer: None,
            window: None,
            glfw,
        })
    }

    fn renderer_mut(&mut self) -> BackendResult<&mut VulkanRenderer> {
        self.renderer.as_mut().ok_or(BackendError::NoRenderer)
    }
}

impl Backend for VulkanBackend {
    fn name(&self) -> &'static str {
        "vulkan"
    }

    fn create_window(&mut self, config: &WindowConfig) -> BackendResult<()> {
        if self.window.is_some() {
            return Err(BackendError::WindowCreationFailed("a window is already open".into()));
        }
        let window = GlfwWindow::new(&mut self.glfw, config)
            .map_err(|e| BackendError::WindowCreationFailed(e.to_string()))?;
        self.window = Some(window);
        Ok(())
    }

    fn destroy_window(&mut self) {
        self.window = None;
    }

    fn create_renderer(&mut self, config: &RendererConfig) -> BackendResult<()> {
        let extensions = self
            .glfw
            .get_required_instance_extensions()
            .ok_or_else(|| BackendError::RendererCreationFailed("GLFW cannot present with Vulkan".into()))?;
        let window = self.window.as_mut().ok_or(BackendError::NoWindow)?;

        let renderer = VulkanRenderer::new(window, &extensions, config)
            .map_err(|e| BackendError::RendererCreationFailed(e.to_string()))?;
        self.renderer = Some(renderer);
        Ok(())
    }

    fn destroy_renderer(&mut self) {
        self.renderer = None;
    }

    fn create_texture(&mut self, image: &ImageData) -> BackendResult<TextureId> {
        let renderer = self.renderer_mut()?;
        let texture = GpuTexture::from_image_data(&renderer.context, image)
            .map_err(|e| BackendError::TextureUploadFailed(e.to_string()))?;
        Ok(renderer.textures.insert(texture))
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.context.wait_idle();
            renderer.textures.remove(texture);
        }
    }

    fn clear(&mut self) -> BackendResult<()> {
        let window_extent = self.window_extent();
        let renderer = self.renderer_mut()?;
        if !renderer.begin_frame(window_extent).map_err(draw_failed)? {
            return Ok(());
        }
        renderer
            .frame
            .clear(&renderer.swapchain, renderer.clear_color)
            .map_err(draw_failed)
    }

    fn copy(&mut self, texture: TextureId, dst: Rect) -> BackendResult<()> {
        let window_extent = self.window_extent();
        let renderer = self.renderer_mut()?;
        if !renderer.textures.contains_key(texture) {
            return Err(BackendError::UnknownTexture(texture));
        }
        if !renderer.begin_frame(window_extent).map_err(draw_failed)? {
            return Ok(());
        }

        let gpu_texture = &renderer.textures[texture];
        renderer
            .frame
            .blit(&renderer.swapchain, gpu_texture, dst)
            .map_err(draw_failed)
    }

    fn present(&mut self) -> BackendResult<()> {
        let window_extent = self.window_extent();
        let renderer = self.renderer_mut()?;
        if !renderer.begin_frame(window_extent).map_err(draw_failed)? {
            return Ok(());
        }

        let outcome = renderer
            .frame
            .present(&renderer.context, &renderer.swapchain)
            .map_err(draw_failed)?;
        if outcome == PresentOutcome::Stale {
            renderer.stale = true;
        }
        Ok(())
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) {
        self.glfw.poll_events();
        if let Some(window) = self.window.as_mut() {
            window.drain_events(events);
        }
    }

    fn shutdown(&mut self) {
        log::debug!("Terminating GLFW");
    }
}

impl VulkanBackend {
    fn window_extent(&self) -> vk::Extent2D {
        let (width, height) = self.window.as_ref().map_or((0, 0), GlfwWindow::framebuffer_size);
        vk::Extent2D { width, height }
    }
}

/// A minimized window has a 0x0 framebuffer
fn is_drawable(extent: vk::Extent2D) -> bool {
    extent.width > 0 && extent.height > 0
}

fn draw_failed(error: VulkanError) -> BackendError {
    BackendError::DrawFailed(error.to_string())
}

/// GPU state for one window
///
/// Field order is drop order: textures and frame objects go before the
/// swapchain, and everything before the context.
struct VulkanRenderer {
    textures: SlotMap<TextureId, GpuTexture>,
    frame: FrameSync,
    swapchain: Swapchain,
    context: VulkanContext,
    clear_color: [u8; 4],
    vsync: bool,
    stale: bool,
}

impl VulkanRenderer {
    fn new(window: &mut GlfwWindow, extensions: &[String], config: &RendererConfig) -> VulkanResult<Self> {
        let context = VulkanContext::new(
            &config.application_name,
            extensions,
            config.validation_enabled(),
            |instance| window.create_surface(instance),
        )?;

        let (width, height) = window.framebuffer_size();
        let swapchain = Swapchain::new(
            &context,
            vk::Extent2D { width, height },
            config.vsync,
            vk::SwapchainKHR::null(),
        )?;
        let frame = FrameSync::new(&context)?;

        Ok(Self {
            textures: SlotMap::with_key(),
            frame,
            swapchain,
            context,
            clear_color: config.clear_color,
            vsync: config.vsync,
            stale: false,
        })
    }

    /// Make sure a swapchain image is acquired and being recorded
    ///
    /// Returns `false` when there is nothing to draw into because the window
    /// has no area; the frame is then skipped and the swapchain rebuilt once
    /// the window is restored.
    fn begin_frame(&mut self, window_extent: vk::Extent2D) -> VulkanResult<bool> {
        if self.frame.is_recording() {
            return Ok(true);
        }
        if !is_drawable(window_extent) {
            return Ok(false);
        }
        if self.stale && !self.recreate_swapchain(window_extent)? {
            return Ok(false);
        }

        for _ in 0..SWAPCHAIN_RETRIES {
            match self.frame.begin(&self.swapchain)? {
                PresentOutcome::Presented => return Ok(true),
                PresentOutcome::Stale => {
                    if !self.recreate_swapchain(window_extent)? {
                        return Ok(false);
                    }
                }
            }
        }
        Err(VulkanError::InvalidOperation(
            "swapchain stayed out of date after recreation".to_string(),
        ))
    }

    /// Rebuild the swapchain; `false` while the surface has no area
    fn recreate_swapchain(&mut self, window_extent: vk::Extent2D) -> VulkanResult<bool> {
        self.context.wait_idle();
        match Swapchain::new(&self.context, window_extent, self.vsync, self.swapchain.handle()) {
            Ok(swapchain) => {
                self.swapchain = swapchain;
                self.stale = false;
                log::debug!("Swapchain recreated");
                Ok(true)
            }
            Err(VulkanError::ZeroExtent) => {
                self.stale = true;
                log::trace!("Surface has no area, skipping frame");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

impl Drop for VulkanRenderer {
    fn drop(&mut self) {
        self.context.wait_idle();
        self.textures.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimized_window_is_not_drawable() {
        assert!(is_drawable(vk::Extent2D { width: 640, height: 480 }));
        assert!(!is_drawable(vk::Extent2D { width: 0, height: 0 }));
        assert!(!is_drawable(vk::Extent2D { width: 640, height: 0 }));
    }
}
