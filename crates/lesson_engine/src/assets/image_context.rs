//! The image subsystem
//!
//! Decoding itself is stateless; the context records which formats a lesson
//! asked for, fails up front if this build cannot decode one of them, and
//! tells the backend when it starts and stops.

use crate::assets::AssetError;
use crate::platform::Platform;
use crate::render::backend::Backend;
use bitflags::bitflags;
use image::ImageFormat;

bitflags! {
    /// Image file formats the image subsystem can be asked to decode
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ImageFormats: u32 {
        /// Windows bitmap, always available
        const BMP = 1 << 0;
        /// Portable network graphics
        const PNG = 1 << 1;
        /// JPEG
        const JPG = 1 << 2;
    }
}

impl ImageFormats {
    /// Formats this build can decode
    pub fn available() -> Self {
        Self::all()
            .iter()
            .filter(|format| format.image_format().is_some_and(|f| f.reading_enabled()))
            .collect()
    }

    /// Map a decoder format onto a flag, `None` for formats lessons never use
    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Bmp => Some(Self::BMP),
            ImageFormat::Png => Some(Self::PNG),
            ImageFormat::Jpeg => Some(Self::JPG),
            _ => None,
        }
    }

    fn image_format(self) -> Option<ImageFormat> {
        if self == Self::BMP {
            Some(ImageFormat::Bmp)
        } else if self == Self::PNG {
            Some(ImageFormat::Png)
        } else if self == Self::JPG {
            Some(ImageFormat::Jpeg)
        } else {
            None
        }
    }
}

/// Running image subsystem
///
/// Borrowed from the [`Platform`], so it always shuts down before the core
/// subsystem does.
pub struct ImageContext<'p, B: Backend> {
    platform: &'p Platform<B>,
    formats: ImageFormats,
}

impl<'p, B: Backend> ImageContext<'p, B> {
    pub(crate) fn init(platform: &'p Platform<B>, requested: ImageFormats) -> Result<Self, AssetError> {
        let requested = requested | ImageFormats::BMP;
        let missing = requested - ImageFormats::available();
        if !missing.is_empty() {
            return Err(AssetError::UnsupportedFormats(missing));
        }

        platform.with_backend(|backend| backend.image_subsystem_started(requested));
        log::info!("Image subsystem started with {:?}", requested);

        Ok(Self {
            platform,
            formats: requested,
        })
    }

    /// Formats files may be decoded from
    pub fn formats(&self) -> ImageFormats {
        self.formats
    }
}

impl<B: Backend> Drop for ImageContext<'_, B> {
    fn drop(&mut self) {
        self.platform.with_backend(B::image_subsystem_stopped);
        log::debug!("Image subsystem stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_decodes_bmp_and_png() {
        let available = ImageFormats::available();
        assert!(available.contains(ImageFormats::BMP | ImageFormats::PNG));
        assert!(!available.contains(ImageFormats::JPG));
    }

    #[test]
    fn test_format_mapping() {
        assert_eq!(ImageFormats::from_image_format(ImageFormat::Png), Some(ImageFormats::PNG));
        assert_eq!(ImageFormats::from_image_format(ImageFormat::Bmp), Some(ImageFormats::BMP));
        assert_eq!(ImageFormats::from_image_format(ImageFormat::Gif), None);
    }
}
