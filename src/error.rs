// src/error.rs
//
// Error type for pixmap.
//
// Pixel transforms are total; only file access, codecs, decode limits and
// argument validation produce errors. Each error maps to an ErrorCategory
// so callers can tell their own mistakes from bad input files.

use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Coarse classification of a `PixmapError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The caller passed something unusable (bad argument, missing file)
    Usage,
    /// The bytes could not be decoded or encoded
    Codec,
    /// A size limit or the file system refused the request
    Resource,
    /// A dependency panicked
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Usage => "usage",
            ErrorCategory::Codec => "codec",
            ErrorCategory::Resource => "resource",
            ErrorCategory::Internal => "internal",
        }
    }
}

/// The file system step an I/O error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Open,
    Map,
    Write,
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileAction::Open => "open",
            FileAction::Map => "memory-map",
            FileAction::Write => "write",
        })
    }
}

#[derive(Debug, Error)]
pub enum PixmapError {
    #[error("no such image file: {path}")]
    FileNotFound { path: Cow<'static, str> },

    #[error("cannot {action} '{path}': {source}")]
    File {
        action: FileAction,
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported format '{format}'")]
    UnsupportedFormat { format: Cow<'static, str> },

    #[error("decode error: {message}")]
    DecodeFailed { message: Cow<'static, str> },

    #[error("image data is empty or corrupted")]
    CorruptedImage,

    #[error("{format} encode error: {message}")]
    EncodeFailed {
        format: Cow<'static, str>,
        message: Cow<'static, str>,
    },

    #[error("side of {dimension}px is over the {max}px limit")]
    DimensionExceedsLimit { dimension: u32, max: u32 },

    #[error("{pixels} pixels is over the {max} pixel limit")]
    PixelCountExceedsLimit { pixels: u64, max: u64 },

    #[error("bad {name} '{value}': {reason}")]
    InvalidArgument {
        name: Cow<'static, str>,
        value: Cow<'static, str>,
        reason: Cow<'static, str>,
    },

    #[error("kernel of size {size} needs an odd size and size*size weights, got {len}")]
    InvalidKernel { size: usize, len: usize },

    #[error("image dimensions {actual_width}x{actual_height} do not match {expected_width}x{expected_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("cannot resize to {width}x{height}")]
    InvalidResizeDimensions { width: u32, height: u32 },

    #[error("panic inside {message}")]
    InternalPanic { message: Cow<'static, str> },
}

impl PixmapError {
    pub fn file_not_found(path: impl Into<Cow<'static, str>>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn file(
        action: FileAction,
        path: impl Into<Cow<'static, str>>,
        source: std::io::Error,
    ) -> Self {
        Self::File {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn unsupported_format(format: impl Into<Cow<'static, str>>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn decode_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn corrupted_image() -> Self {
        Self::CorruptedImage
    }

    pub fn encode_failed(
        format: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn dimension_exceeds_limit(dimension: u32, max: u32) -> Self {
        Self::DimensionExceedsLimit { dimension, max }
    }

    pub fn pixel_count_exceeds_limit(pixels: u64, max: u64) -> Self {
        Self::PixelCountExceedsLimit { pixels, max }
    }

    pub fn invalid_argument(
        name: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_kernel(size: usize, len: usize) -> Self {
        Self::InvalidKernel { size, len }
    }

    pub fn dimension_mismatch(expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            expected_width: expected.0,
            expected_height: expected.1,
            actual_width: actual.0,
            actual_height: actual.1,
        }
    }

    pub fn invalid_resize_dimensions(width: u32, height: u32) -> Self {
        Self::InvalidResizeDimensions { width, height }
    }

    pub fn internal_panic(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InternalPanic {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        use PixmapError::*;
        match self {
            FileNotFound { .. }
            | InvalidArgument { .. }
            | InvalidKernel { .. }
            | DimensionMismatch { .. }
            | InvalidResizeDimensions { .. } => ErrorCategory::Usage,
            UnsupportedFormat { .. } | DecodeFailed { .. } | CorruptedImage | EncodeFailed { .. } => {
                ErrorCategory::Codec
            }
            File { .. } | DimensionExceedsLimit { .. } | PixelCountExceedsLimit { .. } => {
                ErrorCategory::Resource
            }
            InternalPanic { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether retrying with different input or arguments can succeed.
    /// Codec failures and panics are properties of the data or the library.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Usage | ErrorCategory::Resource
        )
    }
}

pub type Result<T> = std::result::Result<T, PixmapError>;
