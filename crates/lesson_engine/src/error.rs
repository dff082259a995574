//! Lesson-level errors and their process exit codes

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::foundation::logging::report_error;
use crate::render::backend::BackendError;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Every way a lesson can fail, tagged with the step that failed
///
/// All of them are terminal: the lesson reports the error once and exits
/// with [`LessonError::exit_code`].
#[derive(Error, Debug)]
pub enum LessonError {
    /// The windowing system could not start
    #[error("{0}")]
    Init(#[source] BackendError),

    /// The image subsystem could not start
    #[error("{0}")]
    ImageInit(#[source] AssetError),

    /// The config file could not be loaded
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// The window could not be created
    #[error("{0}")]
    CreateWindow(#[source] BackendError),

    /// The rendering context could not be created
    #[error("{0}")]
    CreateRenderer(#[source] BackendError),

    /// An image file could not be decoded
    #[error("{source}")]
    DecodeTexture {
        /// File that failed
        path: PathBuf,
        /// Decoder error
        source: AssetError,
    },

    /// Decoded pixels could not be uploaded
    #[error("{}: {source}", .path.display())]
    UploadTexture {
        /// File that failed
        path: PathBuf,
        /// Backend error
        source: BackendError,
    },

    /// One or more textures failed to load and were already reported
    #[error("{0} texture(s) failed to load")]
    MissingTextures(usize),

    /// Clearing, copying or presenting failed
    #[error("{0}")]
    Render(#[source] BackendError),
}

impl LessonError {
    /// Label printed before `error:` by the reporter
    pub fn label(&self) -> &'static str {
        match self {
            Self::Init(_) => "Init",
            Self::ImageInit(_) => "IMG_Init",
            Self::Config(_) => "Config",
            Self::CreateWindow(_) => "CreateWindow",
            Self::CreateRenderer(_) => "CreateRenderer",
            Self::DecodeTexture { .. } | Self::UploadTexture { .. } | Self::MissingTextures(_) => {
                "LoadTexture"
            }
            Self::Render(_) => "Render",
        }
    }

    /// Process exit status for this failure
    ///
    /// 1: subsystem init or config, 2: window, 3: renderer or drawing,
    /// 4: textures.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Init(_) | Self::ImageInit(_) | Self::Config(_) => 1,
            Self::CreateWindow(_) => 2,
            Self::CreateRenderer(_) | Self::Render(_) => 3,
            Self::DecodeTexture { .. } | Self::UploadTexture { .. } | Self::MissingTextures(_) => 4,
        }
    }

    /// Whether the reporter already printed this failure
    pub fn already_reported(&self) -> bool {
        matches!(self, Self::MissingTextures(_))
    }

    /// Write `"{label} error: {self}"` to `sink` unless that already happened
    pub fn report(&self, sink: &mut dyn Write) {
        if !self.already_reported() {
            report_error(sink, self.label(), self);
        }
    }
}

impl From<&LessonError> for ExitCode {
    fn from(error: &LessonError) -> Self {
        Self::from(error.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let init = LessonError::Init(BackendError::InitializationFailed("no display".into()));
        let images = LessonError::ImageInit(AssetError::UnsupportedFormats(crate::assets::ImageFormats::JPG));
        let window = LessonError::CreateWindow(BackendError::WindowCreationFailed("refused".into()));
        let renderer = LessonError::CreateRenderer(BackendError::RendererCreationFailed("no gpu".into()));
        let texture = LessonError::DecodeTexture {
            path: PathBuf::from("missing.png"),
            source: AssetError::UnknownFormat("missing.png".into()),
        };

        assert_eq!(init.exit_code(), 1);
        assert_eq!(images.exit_code(), 1);
        assert_eq!(window.exit_code(), 2);
        assert_eq!(renderer.exit_code(), 3);
        assert_eq!(texture.exit_code(), 4);
        assert_eq!(LessonError::MissingTextures(2).exit_code(), 4);
    }

    #[test]
    fn test_labels_and_messages() {
        let window = LessonError::CreateWindow(BackendError::WindowCreationFailed("refused".into()));
        assert_eq!(window.label(), "CreateWindow");
        assert_eq!(window.to_string(), "window creation failed: refused");

        let upload = LessonError::UploadTexture {
            path: PathBuf::from("a.png"),
            source: BackendError::NoRenderer,
        };
        assert_eq!(upload.label(), "LoadTexture");
        assert_eq!(upload.to_string(), "a.png: no renderer has been created");
    }

    #[test]
    fn test_only_missing_textures_is_pre_reported() {
        assert!(LessonError::MissingTextures(1).already_reported());
        assert!(!LessonError::Render(BackendError::NoWindow).already_reported());

        let mut out = Vec::new();
        LessonError::MissingTextures(2).report(&mut out);
        assert!(out.is_empty());

        LessonError::Render(BackendError::NoWindow).report(&mut out);
        assert_eq!(String::from_utf8(out).unwrap(), "Render error: no window has been created\n");
    }
}
