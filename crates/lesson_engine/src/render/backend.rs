//! Backend-agnostic rendering contract
//!
//! The scoped wrappers in [`crate::platform`] and [`crate::render`] only ever
//! talk to the windowing and GPU libraries through [`Backend`]. Two
//! implementations exist: [`crate::render::vulkan::VulkanBackend`] for real
//! windows and [`crate::render::headless::HeadlessBackend`], a CPU frame
//! buffer used by tests.

use crate::assets::{ImageData, ImageFormats};
use crate::core::{RendererConfig, WindowConfig};
use crate::events::Event;
use crate::foundation::geometry::Rect;
use thiserror::Error;

slotmap::new_key_type! {
    /// Backend handle for one uploaded texture
    pub struct TextureId;
}

/// Failures reported by a windowing or rendering backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// The windowing library could not start
    #[error("windowing system initialization failed: {0}")]
    InitializationFailed(String),

    /// Window creation was refused
    #[error("window creation failed: {0}")]
    WindowCreationFailed(String),

    /// The GPU context could not be created
    #[error("renderer creation failed: {0}")]
    RendererCreationFailed(String),

    /// An operation needed a window that does not exist
    #[error("no window has been created")]
    NoWindow,

    /// An operation needed a renderer that does not exist
    #[error("no renderer has been created")]
    NoRenderer,

    /// The texture handle does not belong to the live renderer
    #[error("unknown texture {0:?}")]
    UnknownTexture(TextureId),

    /// Texture upload failed
    #[error("texture upload failed: {0}")]
    TextureUploadFailed(String),

    /// Drawing or presenting failed
    #[error("draw failed: {0}")]
    DrawFailed(String),
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Internal contract every windowing/rendering backend implements
///
/// Calls arrive in the order the scoped wrappers enforce: one window, then
/// one renderer for it, then textures; teardown runs in reverse.
pub trait Backend {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Called when the image subsystem starts with the formats it decodes
    fn image_subsystem_started(&mut self, _formats: ImageFormats) {}

    /// Called when the image subsystem shuts down
    fn image_subsystem_stopped(&mut self) {}

    /// Open the window
    fn create_window(&mut self, config: &WindowConfig) -> BackendResult<()>;

    /// Close the window
    fn destroy_window(&mut self);

    /// Create the rendering context for the open window
    fn create_renderer(&mut self, config: &RendererConfig) -> BackendResult<()>;

    /// Destroy the rendering context
    fn destroy_renderer(&mut self);

    /// Upload decoded RGBA8 pixels and return a handle to the GPU copy
    fn create_texture(&mut self, image: &ImageData) -> BackendResult<TextureId>;

    /// Release a texture
    fn destroy_texture(&mut self, texture: TextureId);

    /// Fill the frame with the clear color
    fn clear(&mut self) -> BackendResult<()>;

    /// Copy the whole texture into `dst`, scaling to fit
    fn copy(&mut self, texture: TextureId, dst: Rect) -> BackendResult<()>;

    /// Show the frame
    fn present(&mut self) -> BackendResult<()>;

    /// Append every pending input event to `events`
    fn poll_events(&mut self, events: &mut Vec<Event>);

    /// Shut the windowing system down; no other call follows
    fn shutdown(&mut self) {}
}
