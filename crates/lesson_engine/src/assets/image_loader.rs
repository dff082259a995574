//! Image loading utilities for texture data
//!
//! Provides BMP and PNG loading for use with the texture system.

use std::path::Path;
use image::ImageReader;
use crate::assets::{AssetError, ImageFormats};

/// Loaded image data ready for GPU upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of color channels (always 4 for RGBA)
    pub channels: u8,
}

impl ImageData {
    /// Load an image from a file path, accepting any format this build decodes
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        Self::from_file_with(path, ImageFormats::available())
    }

    /// Load an image from a file path, accepting only `formats`
    ///
    /// The format is detected from the file contents, not the extension.
    pub fn from_file_with<P: AsRef<Path>>(path: P, formats: ImageFormats) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();
        let shown = path_ref.display().to_string();

        log::debug!("Loading image from: {:?}", path_ref);

        let io_error = |source| AssetError::Io { path: shown.clone(), source };
        let reader = ImageReader::open(path_ref)
            .map_err(io_error)?
            .with_guessed_format()
            .map_err(io_error)?;

        let format = reader
            .format()
            .ok_or_else(|| AssetError::UnknownFormat(shown.clone()))?;
        if !ImageFormats::from_image_format(format).is_some_and(|f| formats.contains(f)) {
            return Err(AssetError::FormatDisabled { path: shown, format });
        }

        let img = reader
            .decode()
            .map_err(|e| AssetError::LoadFailed(format!("{}: {}", shown, e)))?;

        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        log::info!("Loaded {:?} image {}x{} from {:?}", format, width, height, path_ref);

        Ok(Self {
            data: rgba_img.into_raw(),
            width,
            height,
            channels: 4,
        })
    }

    /// Create a solid color image (useful for testing and defaults)
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * 4);

        for _ in 0..pixel_count {
            data.extend_from_slice(&color);
        }

        Self {
            data,
            width,
            height,
            channels: 4,
        }
    }

    /// RGBA value of one pixel, `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(self.data.get(offset..offset + 4)?);
        Some(rgba)
    }
}
