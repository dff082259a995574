//! Rendering module
//!
//! Scoped wrappers over the active [`Backend`]:
//! [`Window`] borrows the [`crate::platform::Platform`], [`Renderer`] borrows
//! the window and every [`Texture`] borrows the renderer. Dropping them
//! releases the backend objects in the only order the borrows allow.

pub mod backend;
pub mod headless;
pub mod renderer;
pub mod scene;
pub mod texture;
pub mod tiling;
pub mod vulkan;
pub mod window;

pub use backend::{Backend, BackendError, BackendResult, TextureId};
pub use headless::HeadlessBackend;
pub use renderer::Renderer;
pub use texture::{load_texture, Texture, LOAD_TEXTURE_LABEL};
pub use tiling::TileGrid;
pub use vulkan::VulkanBackend;
pub use window::Window;
