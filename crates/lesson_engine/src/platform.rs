//! The running windowing system
//!
//! [`Platform`] owns the backend. Everything created from it borrows it, so
//! the compiler rejects any teardown order other than textures, renderer,
//! window, image subsystem, core.

use crate::assets::{ImageContext, ImageFormats};
use crate::core::WindowConfig;
use crate::error::LessonError;
use crate::events::Event;
use crate::render::backend::{Backend, BackendResult};
use crate::render::window::Window;
use std::cell::RefCell;
use std::time::Duration;

/// Core windowing subsystem; shut down when dropped
pub struct Platform<B: Backend> {
    backend: RefCell<B>,
}

impl<B: Backend> Platform<B> {
    /// Start the core subsystem with a backend built by `create`
    pub fn init<F>(create: F) -> Result<Self, LessonError>
    where
        F: FnOnce() -> BackendResult<B>,
    {
        let backend = create().map_err(LessonError::Init)?;
        Ok(Self::from_backend(backend))
    }

    /// Wrap an already running backend
    pub fn from_backend(backend: B) -> Self {
        log::info!("Platform started on {} backend", backend.name());
        Self {
            backend: RefCell::new(backend),
        }
    }

    /// Start the image subsystem for `formats`
    pub fn init_images(&self, formats: ImageFormats) -> Result<ImageContext<'_, B>, LessonError> {
        ImageContext::init(self, formats).map_err(LessonError::ImageInit)
    }

    /// Open the lesson window
    pub fn create_window(&self, config: &WindowConfig) -> Result<Window<'_, B>, LessonError> {
        Window::open(self, config).map_err(LessonError::CreateWindow)
    }

    /// Append every pending input event to `events`
    pub fn poll_events(&self, events: &mut Vec<Event>) {
        self.with_backend(|backend| backend.poll_events(events));
    }

    /// Block the calling thread for `ms` milliseconds
    pub fn delay(&self, ms: u64) {
        if ms > 0 {
            log::debug!("Holding frame for {}ms", ms);
            std::thread::sleep(Duration::from_millis(ms));
        }
    }

    /// Run `f` with exclusive access to the backend
    ///
    /// Calls never nest, so the borrow cannot already be held.
    pub fn with_backend<R>(&self, f: impl FnOnce(&mut B) -> R) -> R {
        f(&mut self.backend.borrow_mut())
    }
}

impl<B: Backend> Drop for Platform<B> {
    fn drop(&mut self) {
        let backend = self.backend.get_mut();
        backend.shutdown();
        log::info!("Platform on {} backend shut down", backend.name());
    }
}
