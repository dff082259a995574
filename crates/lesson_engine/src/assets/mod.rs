//! Image decoding
//!
//! [`ImageData`] turns files into RGBA8 pixels ready for upload.
//! [`ImageContext`] is the image subsystem: it decides which formats may be
//! decoded and must be alive while textures are loaded from files.

pub mod image_loader;
pub mod image_context;

pub use image_loader::ImageData;
pub use image_context::{ImageContext, ImageFormats};

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// The file could not be opened or read
    #[error("{path}: {source}")]
    Io {
        /// File that failed
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file contents are not a recognizable image
    #[error("{0}: unrecognized image format")]
    UnknownFormat(String),

    /// The format is recognized but the image subsystem was not started with it
    #[error("{path}: {format:?} decoding is not enabled")]
    FormatDisabled {
        /// File that failed
        path: String,
        /// Detected format
        format: image::ImageFormat,
    },

    /// The decoder rejected the file
    #[error("Failed to load image: {0}")]
    LoadFailed(String),

    /// The requested formats cannot be decoded by this build
    #[error("unsupported image formats requested: {0:?}")]
    UnsupportedFormats(ImageFormats),
}
