//! Studio Errors
//!
//! One error type for every failure the studio can surface. Nothing here is
//! fatal: callers log, turn the error into a notice, and keep prior state.

use thiserror::Error;

pub type StudioResult<T> = Result<T, StudioError>;

/// Coarse classification used to decide how a failure is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input (wrong file type, oversize file, bad colour).
    Validation,
    /// A decode, GPU or capture step failed.
    Resource,
    /// The placeholder generation service refused the request.
    FeatureLimit,
}

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Please upload an image file (PNG or JPG), got `{mime}`")]
    UnsupportedType { mime: String },

    #[error("File is too large ({size} bytes). Please upload an image less than {limit_mb}MB")]
    FileTooLarge {
        size: u64,
        limit: u64,
        limit_mb: u64,
    },

    #[error("invalid colour `{0}`")]
    InvalidColor(String),

    #[error("could not decode `{name}`: {reason}")]
    Decode { name: String, reason: String },

    #[error("Image is too large ({width}x{height} pixels). Please upload an image at most {limit} pixels on each side")]
    ImageTooLarge { width: u32, height: u32, limit: u32 },

    #[error("image `{0}` has no pixels")]
    EmptyImage(String),

    #[error("nothing has been rendered yet")]
    NoFrame,

    #[error("snapshot capture is not supported on this platform")]
    CaptureUnsupported,

    #[error("snapshot capture failed: {0}")]
    Capture(String),

    #[error("snapshot encoding failed: {0}")]
    Encode(String),

    #[error("AI generation limit exceeded. Please try again later.")]
    GenerationLimit,

    #[error("mesh error: {0}")]
    Mesh(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("gpu error: {0}")]
    Gpu(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StudioError {
    pub fn decode(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    pub fn mesh(msg: impl Into<String>) -> Self {
        Self::Mesh(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn gpu(msg: impl Into<String>) -> Self {
        Self::Gpu(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedType { .. } | Self::FileTooLarge { .. } | Self::InvalidColor(_) => {
                ErrorKind::Validation
            }
            Self::GenerationLimit => ErrorKind::FeatureLimit,
            _ => ErrorKind::Resource,
        }
    }
}
